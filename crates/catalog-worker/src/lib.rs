//! Asynchronous image-onboarding pipeline.
//!
//! The orchestrator pushes a [`ProductEvent`](catalog_core::ProductEvent) into the
//! bounded [`EventQueue`]; the [`EventProducer`] republishes it on the broker and the
//! [`ImageWorker`] consumes it, derives the product's images and records them.

pub mod broker;
pub mod consumer;
pub mod error;
pub mod pipeline;
pub mod producer;
pub mod queue;

pub use broker::{BrokerError, BrokerMessage, InMemoryBroker, MessageBroker};
#[cfg(feature = "kafka")]
pub use broker::KafkaBroker;
pub use consumer::{ImageWorker, WorkerSettings};
pub use error::WorkerError;
pub use pipeline::{Pipeline, PipelineHandle, WorkerStatus};
pub use producer::{EventProducer, ProducerStats};
pub use queue::{event_queue, EventQueue, EventQueueReceiver, QueueClosed};
