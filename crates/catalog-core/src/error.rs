//! Error types module
//!
//! All catalog errors are unified under [`AppError`]. Each variant describes its own
//! HTTP presentation and logging through [`ErrorMetadata`], and belongs to one of two
//! classes: bad input supplied by the caller, or an internal failure.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the `sqlx` feature.

use std::io;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

use crate::models::TraceId;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected errors like validation failures
    Debug,
    /// Recoverable issues like conflicts
    Warn,
    /// Unexpected failures
    Error,
}

/// Who is at fault for an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The caller supplied data that was rejected.
    BadInput,
    /// Something failed on our side.
    Internal,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "CONFLICT")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;

    /// Bad input vs internal failure
    fn classification(&self) -> ErrorClass;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON parsing error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// (http_status, error_code, recoverable, suggested_action, sensitive, log_level, class)
type StaticMetadata = (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
    ErrorClass,
);

fn app_error_static_metadata(err: &AppError) -> StaticMetadata {
    match err {
        AppError::Validation(_) => (
            400,
            "VALIDATION_ERROR",
            false,
            Some("Check request parameters and try again"),
            false,
            LogLevel::Debug,
            ErrorClass::BadInput,
        ),
        AppError::Conflict(_) => (
            409,
            "CONFLICT",
            false,
            Some("Check that the owner exists and the resource was not already added"),
            false,
            LogLevel::Warn,
            ErrorClass::BadInput,
        ),
        AppError::NotFound(_) => (
            404,
            "NOT_FOUND",
            false,
            Some("Verify the resource ID exists"),
            false,
            LogLevel::Debug,
            ErrorClass::BadInput,
        ),
        #[cfg(feature = "sqlx")]
        AppError::Database(_) => (
            500,
            "DATABASE_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
            ErrorClass::Internal,
        ),
        AppError::Storage(_) => (
            500,
            "STORAGE_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
            ErrorClass::Internal,
        ),
        AppError::Transport(_) => (
            503,
            "TRANSPORT_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
            ErrorClass::Internal,
        ),
        AppError::Image(_) => (
            500,
            "IMAGE_ERROR",
            false,
            Some("Check that the image URL serves a JPEG or PNG"),
            false,
            LogLevel::Warn,
            ErrorClass::Internal,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
            ErrorClass::Internal,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Validation(_) => "Validation",
            AppError::Conflict(_) => "Conflict",
            AppError::NotFound(_) => "NotFound",
            #[cfg(feature = "sqlx")]
            AppError::Database(_) => "Database",
            AppError::Storage(_) => "Storage",
            AppError::Transport(_) => "Transport",
            AppError::Image(_) => "Image",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Attach the caller's trace token.
    pub fn with_trace(self, trace: &TraceId) -> ProductError {
        ProductError {
            error: self,
            trace: trace.clone(),
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn classification(&self) -> ErrorClass {
        app_error_static_metadata(self).6
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Validation(ref msg)
            | AppError::Conflict(ref msg)
            | AppError::NotFound(ref msg)
            | AppError::Image(ref msg) => msg.clone(),
            #[cfg(feature = "sqlx")]
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::Storage(_) => "Failed to access database".to_string(),
            AppError::Transport(_) => "Message broker unavailable".to_string(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
        }
    }
}

/// An [`AppError`] tagged with the trace token of the request that caused it.
///
/// Every product store operation returns this so the caller can correlate a
/// failure with its request logs.
#[derive(Debug, thiserror::Error)]
#[error("{error} (trace {trace})")]
pub struct ProductError {
    #[source]
    pub error: AppError,
    pub trace: TraceId,
}

impl ProductError {
    pub fn new(error: AppError, trace: TraceId) -> Self {
        Self { error, trace }
    }

    pub fn classification(&self) -> ErrorClass {
        self.error.classification()
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self.error, AppError::Conflict(_))
    }
}

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        err.error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_conflict() {
        let err = AppError::Conflict("product already added".to_string());
        assert_eq!(err.http_status_code(), 409);
        assert_eq!(err.error_code(), "CONFLICT");
        assert!(!err.is_recoverable());
        assert_eq!(err.client_message(), "product already added");
        assert_eq!(err.classification(), ErrorClass::BadInput);
        assert_eq!(err.log_level(), LogLevel::Warn);
    }

    #[cfg(feature = "sqlx")]
    #[test]
    fn test_error_metadata_database() {
        let err = AppError::from(sqlx::Error::PoolClosed);
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "DATABASE_ERROR");
        assert!(err.is_sensitive());
        assert_eq!(err.client_message(), "Failed to access database");
        assert_eq!(err.classification(), ErrorClass::Internal);
    }

    #[test]
    fn test_transport_is_internal() {
        let err = AppError::Transport("broker down".to_string());
        assert_eq!(err.http_status_code(), 503);
        assert_eq!(err.classification(), ErrorClass::Internal);
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_product_error_carries_trace() {
        let trace = TraceId::from("trace-123");
        let err = AppError::Conflict("user id is not found".to_string()).with_trace(&trace);
        assert_eq!(err.trace.as_str(), "trace-123");
        assert!(err.is_conflict());
        assert_eq!(err.classification(), ErrorClass::BadInput);
        assert!(err.to_string().contains("trace-123"));
    }

    #[test]
    fn test_detailed_message_includes_chain() {
        let err = AppError::from(anyhow::anyhow!("root cause").context("outer"));
        let details = err.detailed_message();
        assert!(details.contains("Caused by"));
    }
}
