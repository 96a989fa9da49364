use catalog_core::AppError;
use std::io;
use std::path::PathBuf;

/// Failure modes of a single image transform. None are retried here.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("failed to create {path}: {source}")]
    FileCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("fetching {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("fetching {url} timed out")]
    Timeout { url: String },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("unsupported output format: {0:?}")]
    UnsupportedFormat(String),

    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("image task failed: {0}")]
    Task(String),
}

impl ImageError {
    pub fn fetch(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            ImageError::Timeout {
                url: url.to_string(),
            }
        } else {
            ImageError::Fetch {
                url: url.to_string(),
                source,
            }
        }
    }
}

impl From<ImageError> for AppError {
    fn from(err: ImageError) -> Self {
        AppError::Image(err.to_string())
    }
}
