use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// 503 once the image worker has exited; new products would never get images.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    if state.worker.is_running() {
        (StatusCode::OK, Json(json!({ "status": "ok" })))
    } else {
        tracing::warn!("Health check failed: image worker stopped");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "degraded", "image_worker": "stopped" })),
        )
    }
}
