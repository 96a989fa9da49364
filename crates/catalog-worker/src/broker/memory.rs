use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

use super::{BrokerError, BrokerMessage, MessageBroker};

/// Single-process broker backed by an unbounded channel.
///
/// After [`close`](InMemoryBroker::close), records already published are still
/// delivered; once they run out `consume` fails with [`BrokerError::Closed`].
pub struct InMemoryBroker {
    topic: String,
    tx: mpsc::UnboundedSender<BrokerMessage>,
    rx: Mutex<mpsc::UnboundedReceiver<BrokerMessage>>,
    closed: CancellationToken,
    published: AtomicUsize,
}

impl InMemoryBroker {
    pub fn new(topic: impl Into<String>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            topic: topic.into(),
            tx,
            rx: Mutex::new(rx),
            closed: CancellationToken::new(),
            published: AtomicUsize::new(0),
        }
    }

    pub fn close(&self) {
        self.closed.cancel();
    }

    pub fn published_count(&self) -> usize {
        self.published.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageBroker for InMemoryBroker {
    async fn publish(&self, topic: &str, key: &str, payload: &[u8]) -> Result<(), BrokerError> {
        if self.closed.is_cancelled() {
            return Err(BrokerError::Closed);
        }
        if topic != self.topic {
            return Err(BrokerError::UnknownTopic(topic.to_string()));
        }
        self.tx
            .send(BrokerMessage {
                key: Some(key.to_string()),
                payload: payload.to_vec(),
            })
            .map_err(|_| BrokerError::Closed)?;
        self.published.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn consume(&self) -> Result<BrokerMessage, BrokerError> {
        let mut rx = self.rx.lock().await;
        tokio::select! {
            biased;
            message = rx.recv() => message.ok_or(BrokerError::Closed),
            _ = self.closed.cancelled() => Err(BrokerError::Closed),
        }
    }
}
