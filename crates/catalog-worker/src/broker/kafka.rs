use async_trait::async_trait;
use catalog_core::BrokerConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::message::Message;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::ClientConfig;
use std::time::Duration;
use tracing::info;

use super::{BrokerError, BrokerMessage, MessageBroker};

/// Kafka-backed broker. One producer and one consumer subscribed to the
/// configured topic within the configured group.
pub struct KafkaBroker {
    producer: FutureProducer,
    consumer: StreamConsumer,
    delivery_timeout: Duration,
}

impl KafkaBroker {
    pub fn new(config: &BrokerConfig) -> Result<Self, BrokerError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("enable.idempotence", "true")
            .set("acks", "all")
            .set(
                "message.timeout.ms",
                config.publish_timeout.as_millis().to_string(),
            )
            .create()
            .map_err(|e| BrokerError::Config(format!("Failed to create Kafka producer: {e}")))?;

        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("group.id", &config.group_id)
            .set("enable.auto.commit", "true")
            .set("auto.commit.interval.ms", "5000")
            .set("auto.offset.reset", "earliest")
            .set("session.timeout.ms", "45000")
            .create()
            .map_err(|e| BrokerError::Config(format!("Failed to create Kafka consumer: {e}")))?;

        consumer
            .subscribe(&[&config.topic])
            .map_err(|e| BrokerError::Config(format!("Failed to subscribe to topic: {e}")))?;

        info!(
            brokers = %config.brokers,
            topic = %config.topic,
            group_id = %config.group_id,
            "Kafka broker initialized"
        );

        Ok(Self {
            producer,
            consumer,
            delivery_timeout: config.publish_timeout,
        })
    }
}

#[async_trait]
impl MessageBroker for KafkaBroker {
    async fn publish(&self, topic: &str, key: &str, payload: &[u8]) -> Result<(), BrokerError> {
        let record = FutureRecord::to(topic).key(key).payload(payload);

        self.producer
            .send(record, self.delivery_timeout)
            .await
            .map(|_| ())
            .map_err(|(err, _)| BrokerError::Publish(err.to_string()))
    }

    async fn consume(&self) -> Result<BrokerMessage, BrokerError> {
        let message = self
            .consumer
            .recv()
            .await
            .map_err(|e| BrokerError::Consume(e.to_string()))?;

        Ok(BrokerMessage {
            key: message
                .key()
                .map(|k| String::from_utf8_lossy(k).into_owned()),
            payload: message.payload().map(<[u8]>::to_vec).unwrap_or_default(),
        })
    }
}
