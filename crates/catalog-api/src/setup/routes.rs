//! Route configuration and setup

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Setup all application routes
pub fn setup_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/v1/product/create", post(handlers::product::create_product))
        .route("/v1/user/create", post(handlers::user::create_user))
        .layer(axum::middleware::from_fn(catalog_infra::trace_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}
