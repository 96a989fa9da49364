//! Store abstractions consumed by the orchestrator and the image worker.
//!
//! Every error is tagged with the caller's trace token so a failure can be
//! matched to the request that caused it.

use async_trait::async_trait;
use catalog_core::models::{NewProduct, NewUser, TraceId};
use catalog_core::ProductError;

use crate::db::{ProductRepository, UserRepository};

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Insert a product, returning its new id.
    async fn insert(&self, product: &NewProduct, trace: &TraceId) -> Result<i64, ProductError>;

    /// Source image URLs in stored order.
    async fn fetch_source_image_urls(
        &self,
        product_id: i64,
        trace: &TraceId,
    ) -> Result<Vec<String>, ProductError>;

    /// Append derived image paths to the product.
    async fn update_derived_images(
        &self,
        product_id: i64,
        paths: &[String],
        trace: &TraceId,
    ) -> Result<(), ProductError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert_user(&self, user: &NewUser, trace: &TraceId) -> Result<i64, ProductError>;
}

#[async_trait]
impl ProductStore for ProductRepository {
    async fn insert(&self, product: &NewProduct, trace: &TraceId) -> Result<i64, ProductError> {
        ProductRepository::insert(self, product)
            .await
            .map_err(|e| e.with_trace(trace))
    }

    async fn fetch_source_image_urls(
        &self,
        product_id: i64,
        trace: &TraceId,
    ) -> Result<Vec<String>, ProductError> {
        ProductRepository::fetch_source_image_urls(self, product_id)
            .await
            .map_err(|e| e.with_trace(trace))
    }

    async fn update_derived_images(
        &self,
        product_id: i64,
        paths: &[String],
        trace: &TraceId,
    ) -> Result<(), ProductError> {
        ProductRepository::update_derived_images(self, product_id, paths)
            .await
            .map_err(|e| e.with_trace(trace))
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn insert_user(&self, user: &NewUser, trace: &TraceId) -> Result<i64, ProductError> {
        UserRepository::insert(self, user)
            .await
            .map_err(|e| e.with_trace(trace))
    }
}
