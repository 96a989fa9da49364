use catalog_api::setup;
use catalog_core::Config;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    let app = setup::initialize_app(&config).await?;

    setup::server::start_server(&config, app.router).await?;

    // The router is gone; dropping the state drops the last event queue sender
    // so the producer can drain and stop.
    drop(app.state);
    app.pipeline.shutdown(config.shutdown_drain_timeout).await?;

    catalog_infra::shutdown_telemetry().await;
    Ok(())
}
