//! Event consumer / image worker.
//!
//! A broker transport failure or an undecodable payload ends the loop with an
//! error. Any failure while processing a decoded event only abandons that event:
//! images already written stay on disk, the store is not updated and the
//! message is not redelivered.

use catalog_core::{ImageConfig, ProductEvent, TraceId};
use catalog_db::ProductStore;
use catalog_processing::ImageTransformer;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::broker::{BrokerError, BrokerMessage, MessageBroker};
use crate::error::WorkerError;

#[derive(Debug, Clone)]
pub struct WorkerSettings {
    pub output_dir: PathBuf,
    pub target_width: u32,
    pub target_height: u32,
    /// Extension of derived files; selects the encoder
    pub output_extension: String,
    pub consume_timeout: Option<Duration>,
}

impl WorkerSettings {
    pub fn from_config(image: &ImageConfig, consume_timeout: Option<Duration>) -> Self {
        Self {
            output_dir: PathBuf::from(&image.output_dir),
            target_width: image.target_width,
            target_height: image.target_height,
            output_extension: image.output_extension.clone(),
            consume_timeout,
        }
    }
}

pub struct ImageWorker {
    broker: Arc<dyn MessageBroker>,
    store: Arc<dyn ProductStore>,
    transformer: Arc<dyn ImageTransformer>,
    settings: WorkerSettings,
}

impl ImageWorker {
    pub fn new(
        broker: Arc<dyn MessageBroker>,
        store: Arc<dyn ProductStore>,
        transformer: Arc<dyn ImageTransformer>,
        settings: WorkerSettings,
    ) -> Self {
        Self {
            broker,
            store,
            transformer,
            settings,
        }
    }

    /// Consume until cancelled or a fatal error occurs.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), WorkerError> {
        tracing::info!(
            output_dir = %self.settings.output_dir.display(),
            "Image worker started"
        );

        loop {
            let message = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                message = self.next_message() => message,
            };

            let message = match message {
                Ok(message) => message,
                Err(e) => {
                    tracing::error!(error = %e, "Broker consume failed, stopping image worker");
                    return Err(e.into());
                }
            };

            let event = match decode_event(&message) {
                Ok(event) => event,
                Err(e) => {
                    tracing::error!(key = ?message.key, error = %e, "Undecodable product event, stopping image worker");
                    return Err(e);
                }
            };

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                result = self.process_event(&event) => match result {
                    Ok(paths) => tracing::info!(
                        product_id = %event.product_id,
                        trace_id = ?event.trace_id,
                        images = paths.len(),
                        "Product images processed"
                    ),
                    Err(e) => tracing::error!(
                        product_id = %event.product_id,
                        trace_id = ?event.trace_id,
                        error = %e,
                        "Product image processing failed, event discarded"
                    ),
                },
            }
        }

        tracing::info!("Image worker stopped");
        Ok(())
    }

    async fn next_message(&self) -> Result<BrokerMessage, BrokerError> {
        match self.settings.consume_timeout {
            Some(limit) => tokio::time::timeout(limit, self.broker.consume())
                .await
                .map_err(|_| BrokerError::Timeout {
                    operation: "consume",
                })?,
            None => self.broker.consume().await,
        }
    }

    /// Derive every source image of the event's product, in stored order, then
    /// record the output paths. Stops at the first image that fails.
    #[tracing::instrument(skip(self, event), fields(product_id = %event.product_id))]
    pub async fn process_event(&self, event: &ProductEvent) -> Result<Vec<String>, WorkerError> {
        let product_id = event
            .product_id()
            .map_err(|e| WorkerError::Decode(e.to_string()))?;
        let trace = event.trace_id.clone().unwrap_or_else(TraceId::generate);

        let urls = self
            .store
            .fetch_source_image_urls(product_id, &trace)
            .await?;

        tokio::fs::create_dir_all(&self.settings.output_dir)
            .await
            .map_err(|source| WorkerError::OutputDir {
                path: self.settings.output_dir.clone(),
                source,
            })?;

        let mut paths = Vec::with_capacity(urls.len());
        for (i, url) in urls.iter().enumerate() {
            let index = i + 1;
            let output = self.output_path(product_id, index);
            self.transformer
                .transform(
                    url,
                    &output,
                    self.settings.target_width,
                    self.settings.target_height,
                )
                .await
                .map_err(|source| WorkerError::Image {
                    product_id,
                    index,
                    source,
                })?;
            tracing::debug!(url = %url, index, output = %output.display(), "Image derived");
            paths.push(output.to_string_lossy().into_owned());
        }

        self.store
            .update_derived_images(product_id, &paths, &trace)
            .await?;

        Ok(paths)
    }

    /// `product_{id}_{index}.{ext}` inside the output directory, index from 1
    pub fn output_path(&self, product_id: i64, index: usize) -> PathBuf {
        self.settings.output_dir.join(format!(
            "product_{}_{}.{}",
            product_id, index, self.settings.output_extension
        ))
    }
}

fn decode_event(message: &BrokerMessage) -> Result<ProductEvent, WorkerError> {
    let event = ProductEvent::from_bytes(&message.payload)
        .map_err(|e| WorkerError::Decode(e.to_string()))?;
    event
        .product_id()
        .map_err(|e| WorkerError::Decode(e.to_string()))?;
    Ok(event)
}
