//! Application setup and initialization

pub mod database;
pub mod pipeline;
pub mod routes;
pub mod server;

use crate::services::ProductService;
use crate::state::AppState;
use anyhow::{Context, Result};
use catalog_core::Config;
use catalog_db::{ProductRepository, UserRepository};
use catalog_worker::PipelineHandle;
use std::sync::Arc;

/// Everything `main` needs to serve and later shut down.
pub struct Application {
    pub router: axum::Router,
    pub state: AppState,
    pub pipeline: PipelineHandle,
}

/// Initialize the entire application
pub async fn initialize_app(config: &Config) -> Result<Application> {
    config.validate().context("Configuration validation failed")?;

    catalog_infra::init_telemetry(config.log_format)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment,
        broker = ?config.broker.backend,
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(config).await?;
    let products = Arc::new(ProductRepository::new(pool.clone()));
    let users = Arc::new(UserRepository::new(pool));

    let (queue, pipeline) = pipeline::start_pipeline(config, products.clone())?;

    let state = AppState {
        products: ProductService::new(products, queue),
        users,
        worker: pipeline.worker_status(),
    };
    let router = routes::setup_routes(state.clone());

    Ok(Application {
        router,
        state,
        pipeline,
    })
}
