//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Anything that
//! converts into [`AppError`] or [`ProductError`] renders the same way.

use axum::{
    extract::rejection::JsonRejection,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use catalog_core::{AppError, ErrorMetadata, LogLevel, ProductError, TraceId};
use serde::{de::DeserializeOwned, Serialize};
use validator::Validate;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether the request can be retried as-is
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper so `IntoResponse` can be implemented for the core error type.
#[derive(Debug)]
pub struct HttpAppError {
    pub error: AppError,
    pub trace: Option<TraceId>,
}

impl HttpAppError {
    pub fn new(error: AppError) -> Self {
        Self { error, trace: None }
    }

    /// Attach the request's trace unless one is already set.
    pub fn traced(mut self, trace: Option<TraceId>) -> Self {
        if self.trace.is_none() {
            self.trace = trace;
        }
        self
    }
}

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError::new(err)
    }
}

impl From<ProductError> for HttpAppError {
    fn from(err: ProductError) -> Self {
        HttpAppError {
            error: err.error,
            trace: Some(err.trace),
        }
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError::new(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

/// Malformed or mistyped JSON bodies become a 400 in the usual error shape.
impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError::new(AppError::Validation(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

/// JSON body extractor that also runs the body's `validator` rules.
///
/// Both deserialization failures and rule violations are rejected with a 400
/// carrying the request's [`TraceId`] when the trace-id middleware set one.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let trace = req.extensions().get::<TraceId>().cloned();

        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| HttpAppError::from(rejection).traced(trace.clone()))?;
        inner
            .validate()
            .map_err(|e| HttpAppError::from(AppError::from(e)).traced(trace))?;
        Ok(ValidatedJson(inner))
    }
}

fn log_error(error: &AppError, trace: Option<&TraceId>) {
    let error_type = error.error_type();
    let trace_id = trace.map(TraceId::as_str).unwrap_or("-");
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type, trace_id, "Request failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type, trace_id, "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(
                error = %error.detailed_message(),
                error_type,
                trace_id,
                "Request failed"
            );
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| matches!(env.to_lowercase().as_str(), "production" | "prod"))
        .unwrap_or(false)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.error;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error, self.trace.as_ref());

        let mut body = ErrorResponse {
            error: app_error.client_message(),
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            trace_id: self.trace.as_ref().map(|t| t.as_str().to_string()),
            details: None,
            error_type: None,
            suggested_action: app_error.suggested_action().map(String::from),
        };

        // Never leak internals in production or for sensitive errors.
        if !is_production_env() && !app_error.is_sensitive() {
            body.details = Some(app_error.detailed_message());
            body.error_type = Some(app_error.error_type().to_string());
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn conflict_renders_409_with_trace() {
        let err: HttpAppError = AppError::Conflict("product already added".into())
            .with_trace(&TraceId::from("abc"))
            .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let json = body_json(response).await;
        assert_eq!(json["error"], "product already added");
        assert_eq!(json["trace_id"], "abc");
        assert_eq!(json["recoverable"], false);
    }

    #[tokio::test]
    async fn internal_error_hides_details() {
        let err = HttpAppError::new(AppError::Internal("pool exhausted".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Internal server error");
        assert!(json.get("details").is_none());
        assert!(json.get("trace_id").is_none());
    }

    #[test]
    fn product_error_keeps_its_trace() {
        let err: HttpAppError = AppError::NotFound("missing".into())
            .with_trace(&TraceId::from("t-1"))
            .into();
        assert!(matches!(err.error, AppError::NotFound(_)));
        assert_eq!(err.trace.unwrap().as_str(), "t-1");
    }

    #[test]
    fn error_response_shape() {
        let response = ErrorResponse {
            error: "Not found".to_string(),
            code: "NOT_FOUND".to_string(),
            recoverable: false,
            trace_id: None,
            details: Some("Resource not found".to_string()),
            error_type: Some("NotFound".to_string()),
            suggested_action: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert!(json.get("trace_id").is_none());
        assert!(json["recoverable"].is_boolean());
    }
}
