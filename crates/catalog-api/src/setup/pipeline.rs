//! Event queue, broker and background tasks

use anyhow::{Context, Result};
use catalog_core::{BrokerBackend, Config};
use catalog_db::ProductStore;
use catalog_processing::HttpImageTransformer;
use catalog_worker::{
    event_queue, EventProducer, EventQueue, ImageWorker, InMemoryBroker, MessageBroker, Pipeline,
    PipelineHandle, WorkerSettings,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub fn build_broker(config: &Config) -> Result<Arc<dyn MessageBroker>> {
    match config.broker.backend {
        BrokerBackend::Memory => {
            tracing::warn!("Using in-memory broker; events do not survive a restart");
            Ok(Arc::new(InMemoryBroker::new(config.broker.topic.clone())))
        }
        #[cfg(feature = "kafka")]
        BrokerBackend::Kafka => {
            let broker = catalog_worker::KafkaBroker::new(&config.broker)
                .context("Failed to initialize Kafka broker")?;
            Ok(Arc::new(broker))
        }
        #[cfg(not(feature = "kafka"))]
        BrokerBackend::Kafka => Err(anyhow::anyhow!(
            "BROKER_BACKEND=kafka requires the `kafka` feature"
        )),
    }
}

/// Create the event queue and spawn the producer and image worker.
pub fn start_pipeline(
    config: &Config,
    store: Arc<dyn ProductStore>,
) -> Result<(EventQueue, PipelineHandle)> {
    let broker = build_broker(config)?;
    let transformer = HttpImageTransformer::new(config.image.fetch_timeout)
        .context("Failed to build image transformer")?;

    let (queue, queue_rx) = event_queue(config.broker.queue_capacity);
    let producer = EventProducer::new(
        broker.clone(),
        config.broker.topic.clone(),
        config.broker.publish_timeout,
    );
    let worker = ImageWorker::new(
        broker,
        store,
        Arc::new(transformer),
        WorkerSettings::from_config(&config.image, config.broker.consume_timeout),
    );

    let handle = Pipeline::spawn(producer, worker, queue_rx, CancellationToken::new());
    tracing::info!(
        topic = %config.broker.topic,
        queue_capacity = queue.capacity(),
        "Image pipeline started"
    );

    Ok((queue, handle))
}
