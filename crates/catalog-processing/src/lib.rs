//! Image transform stage: fetch a source image, resize it to the target box and
//! write the encoded result next to the other derived images.

pub mod image;

pub use crate::image::{
    encode_resized, target_dimensions, HttpImageTransformer, ImageError, ImageTransformer,
    OutputFormat,
};
