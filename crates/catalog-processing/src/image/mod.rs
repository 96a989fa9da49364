mod error;
mod format;
mod resize;
mod transformer;

pub use error::ImageError;
pub use format::OutputFormat;
pub use resize::{encode_resized, resize_image, target_dimensions};
pub use transformer::{HttpImageTransformer, ImageTransformer};
