//! Product orchestrator
//!
//! Persists a new product and hands a `ProductEvent` to the event queue. The
//! caller gets the id back as soon as the event is queued; image processing
//! happens later and its outcome is never reported back to the caller.

use catalog_core::models::{NewProduct, ProductEvent, TraceId};
use catalog_core::ProductError;
use catalog_db::ProductStore;
use catalog_worker::EventQueue;
use std::sync::Arc;

/// A product descriptor whose fields have already been validated.
#[derive(Debug, Clone)]
pub struct ProductDetails {
    pub name: String,
    pub description: String,
    pub image_urls: Vec<String>,
    pub price: i64,
    pub owner_id: i64,
}

#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn ProductStore>,
    queue: EventQueue,
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductStore>, queue: EventQueue) -> Self {
        Self { store, queue }
    }

    /// Insert the product, then queue its event.
    ///
    /// A store failure is returned as-is and nothing is queued. Queueing waits
    /// while the event queue is full.
    #[tracing::instrument(skip(self, details), fields(trace_id = %trace, user_id = details.owner_id))]
    pub async fn create_product(
        &self,
        details: ProductDetails,
        trace: &TraceId,
    ) -> Result<i64, ProductError> {
        let product = NewProduct::stamped(
            details.name,
            details.description,
            details.image_urls,
            details.price,
            details.owner_id,
        );

        let product_id = self.store.insert(&product, trace).await?;
        tracing::info!(product_id, "Product created");

        let event = ProductEvent::new(product_id, Some(trace.clone()));
        if let Err(closed) = self.queue.send(event).await {
            // The product is stored; only its images will be missing.
            tracing::error!(
                product_id,
                product_event = ?closed.0,
                "Event queue closed, product images will not be processed"
            );
        }

        Ok(product_id)
    }
}
