use catalog_core::{AppError, ProductError};
use catalog_processing::ImageError;
use std::io;
use std::path::PathBuf;

use crate::broker::BrokerError;

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("broker transport failed: {0}")]
    Transport(#[from] BrokerError),

    #[error("invalid event payload: {0}")]
    Decode(String),

    #[error("product store failed: {0}")]
    Store(#[from] ProductError),

    #[error("image {index} of product {product_id} failed: {source}")]
    Image {
        product_id: i64,
        index: usize,
        #[source]
        source: ImageError,
    },

    #[error("failed to prepare output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl WorkerError {
    /// Errors that end the consume loop rather than just the current event
    pub fn is_fatal(&self) -> bool {
        matches!(self, WorkerError::Transport(_) | WorkerError::Decode(_))
    }
}

impl From<WorkerError> for AppError {
    fn from(err: WorkerError) -> Self {
        let message = err.to_string();
        match err {
            WorkerError::Transport(e) => e.into(),
            WorkerError::Decode(msg) => AppError::Validation(msg),
            WorkerError::Store(e) => e.error,
            WorkerError::Image { source, .. } => source.into(),
            WorkerError::OutputDir { .. } => AppError::Internal(message),
        }
    }
}
