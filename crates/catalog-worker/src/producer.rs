//! Event producer: drains the hand-off queue onto the broker.
//!
//! Each event gets exactly one publish attempt. A failed publish is logged and
//! the loop moves on; the event is not requeued. Cancellation also interrupts a
//! publish in flight, so a cancelled producer stops without waiting out the
//! publish deadline.

use catalog_core::ProductEvent;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::broker::{BrokerError, MessageBroker};
use crate::queue::EventQueueReceiver;

/// Counts for one producer run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProducerStats {
    pub published: usize,
    pub failed: usize,
}

pub struct EventProducer {
    broker: Arc<dyn MessageBroker>,
    topic: String,
    publish_timeout: Duration,
}

impl EventProducer {
    pub fn new(broker: Arc<dyn MessageBroker>, topic: impl Into<String>, publish_timeout: Duration) -> Self {
        Self {
            broker,
            topic: topic.into(),
            publish_timeout,
        }
    }

    /// Run until the queue is closed and drained, or `cancel` fires.
    #[tracing::instrument(skip_all, fields(topic = %self.topic))]
    pub async fn run(self, mut queue: EventQueueReceiver, cancel: CancellationToken) -> ProducerStats {
        tracing::info!("Event producer started");
        let mut stats = ProducerStats::default();

        loop {
            let event = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!("Cancellation received, stopping event producer");
                    break;
                }
                event = queue.recv() => match event {
                    Some(event) => event,
                    None => break,
                },
            };

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    stats.failed += 1;
                    tracing::warn!(
                        product_id = %event.product_id,
                        trace_id = ?event.trace_id,
                        "Cancelled while publishing product event"
                    );
                    break;
                }
                result = self.publish(&event) => result,
            };

            match result {
                Ok(()) => {
                    stats.published += 1;
                    tracing::info!(
                        product_id = %event.product_id,
                        trace_id = ?event.trace_id,
                        "Published product event"
                    );
                }
                Err(e) => {
                    stats.failed += 1;
                    tracing::error!(
                        product_id = %event.product_id,
                        trace_id = ?event.trace_id,
                        error = %e,
                        "Failed to publish product event"
                    );
                }
            }
        }

        tracing::info!(
            published = stats.published,
            failed = stats.failed,
            "Event producer stopped"
        );
        stats
    }

    /// Serialize and publish one event keyed by its product id
    pub async fn publish(&self, event: &ProductEvent) -> Result<(), BrokerError> {
        let payload = event
            .to_bytes()
            .map_err(|e| BrokerError::Encode(e.to_string()))?;

        tokio::time::timeout(
            self.publish_timeout,
            self.broker.publish(&self.topic, event.key(), &payload),
        )
        .await
        .map_err(|_| BrokerError::Timeout {
            operation: "publish",
        })?
    }
}
