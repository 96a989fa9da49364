//! Bounded in-process hand-off between the orchestrator and the event producer.
//!
//! `send` waits while the queue is full; that wait is the pipeline's only
//! backpressure. The queue closes once every [`EventQueue`] clone is dropped, and
//! the receiver still yields everything sent before that.

use catalog_core::ProductEvent;
use tokio::sync::mpsc;

/// The producer side is gone; nothing sent now would be published.
#[derive(Debug, thiserror::Error)]
#[error("event queue is closed")]
pub struct QueueClosed(pub ProductEvent);

/// Create a queue holding at most `capacity` pending events (minimum 1).
pub fn event_queue(capacity: usize) -> (EventQueue, EventQueueReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (EventQueue { tx }, EventQueueReceiver { rx })
}

#[derive(Clone, Debug)]
pub struct EventQueue {
    tx: mpsc::Sender<ProductEvent>,
}

impl EventQueue {
    pub async fn send(&self, event: ProductEvent) -> Result<(), QueueClosed> {
        self.tx.send(event).await.map_err(|e| QueueClosed(e.0))
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Free slots right now
    pub fn capacity(&self) -> usize {
        self.tx.capacity()
    }
}

#[derive(Debug)]
pub struct EventQueueReceiver {
    rx: mpsc::Receiver<ProductEvent>,
}

impl EventQueueReceiver {
    /// Next event, or `None` once the queue is closed and drained
    pub async fn recv(&mut self) -> Option<ProductEvent> {
        self.rx.recv().await
    }

    /// Stop accepting events; already queued ones can still be received
    pub fn close(&mut self) {
        self.rx.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn drains_after_senders_drop() {
        let (queue, mut rx) = event_queue(4);
        queue.send(ProductEvent::new(1, None)).await.unwrap();
        queue.send(ProductEvent::new(2, None)).await.unwrap();
        drop(queue);

        assert_eq!(rx.recv().await.unwrap().product_id, "1");
        assert_eq!(rx.recv().await.unwrap().product_id, "2");
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn send_waits_when_full() {
        let (queue, mut rx) = event_queue(1);
        queue.send(ProductEvent::new(1, None)).await.unwrap();

        let blocked =
            tokio::time::timeout(Duration::from_millis(50), queue.send(ProductEvent::new(2, None)))
                .await;
        assert!(blocked.is_err(), "second send should wait for a free slot");

        rx.recv().await.unwrap();
        queue.send(ProductEvent::new(3, None)).await.unwrap();
    }

    #[tokio::test]
    async fn send_after_receiver_closed_fails() {
        let (queue, mut rx) = event_queue(2);
        rx.close();
        let err = queue.send(ProductEvent::new(9, None)).await.unwrap_err();
        assert_eq!(err.0.product_id, "9");
        assert!(queue.is_closed());
    }
}
