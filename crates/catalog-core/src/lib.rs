//! Catalog Core Library
//!
//! Domain models, error types and configuration shared by every catalog crate:
//! the HTTP ingress, the product store, the event pipeline and the image worker.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{BrokerBackend, BrokerConfig, Config, DatabaseConfig, ImageConfig, LogFormat};
pub use error::{AppError, ErrorClass, ErrorMetadata, LogLevel, ProductError};
pub use models::{NewProduct, NewUser, ProductEvent, TraceId};
