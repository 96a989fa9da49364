//! Message broker seam between the event producer and the image worker.

#[cfg(feature = "kafka")]
mod kafka;
mod memory;

use async_trait::async_trait;
use catalog_core::AppError;

#[cfg(feature = "kafka")]
pub use kafka::KafkaBroker;
pub use memory::InMemoryBroker;

/// One consumed record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerMessage {
    pub key: Option<String>,
    pub payload: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum BrokerError {
    #[error("publish failed: {0}")]
    Publish(String),

    #[error("consume failed: {0}")]
    Consume(String),

    #[error("{operation} timed out")]
    Timeout { operation: &'static str },

    #[error("broker is closed")]
    Closed,

    #[error("unknown topic: {0}")]
    UnknownTopic(String),

    #[error("failed to encode event: {0}")]
    Encode(String),

    #[error("broker configuration error: {0}")]
    Config(String),
}

impl From<BrokerError> for AppError {
    fn from(err: BrokerError) -> Self {
        AppError::Transport(err.to_string())
    }
}

/// Publish/consume primitives over a single logical topic.
///
/// `consume` waits until a record is available. Delivery is at-least-once;
/// consumer-group bookkeeping belongs to the broker.
#[async_trait]
pub trait MessageBroker: Send + Sync {
    async fn publish(&self, topic: &str, key: &str, payload: &[u8]) -> Result<(), BrokerError>;

    async fn consume(&self) -> Result<BrokerMessage, BrokerError>;
}
