//! In-memory store implementations for testing
//!
//! These mimic the constraint behaviour of the Postgres schema (unique product
//! name per owner, owner must exist) without a database.

use async_trait::async_trait;
use catalog_core::models::{NewProduct, NewUser, TraceId};
use catalog_core::{AppError, ProductError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::store::{ProductStore, UserStore};

#[derive(Debug, Clone)]
pub struct StoredProduct {
    pub product: NewProduct,
    pub derived_images: Vec<String>,
}

#[derive(Default)]
struct State {
    next_product_id: i64,
    next_user_id: i64,
    products: HashMap<i64, StoredProduct>,
    users: HashMap<i64, NewUser>,
    insert_calls: usize,
    update_calls: usize,
    fail_next_insert: Option<AppError>,
    fail_updates: bool,
}

/// Mock product and user store
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an owner directly, returning its id
    pub fn add_user(&self, name: &str) -> i64 {
        let mut state = self.state.lock().unwrap();
        state.next_user_id += 1;
        let id = state.next_user_id;
        state.users.insert(
            id,
            NewUser::stamped(name.to_string(), format!("555-{id:04}"), 0.0, 0.0),
        );
        id
    }

    /// Seed a product as if it had been inserted earlier
    pub fn add_product(&self, user_id: i64, name: &str, image_urls: Vec<String>) -> i64 {
        let mut state = self.state.lock().unwrap();
        state.next_product_id += 1;
        let id = state.next_product_id;
        state.products.insert(
            id,
            StoredProduct {
                product: NewProduct::stamped(
                    name.to_string(),
                    format!("{name} description"),
                    image_urls,
                    100,
                    user_id,
                ),
                derived_images: Vec::new(),
            },
        );
        id
    }

    pub fn fail_next_insert(&self, err: AppError) {
        self.state.lock().unwrap().fail_next_insert = Some(err);
    }

    pub fn fail_updates(&self) {
        self.state.lock().unwrap().fail_updates = true;
    }

    pub fn product(&self, id: i64) -> Option<StoredProduct> {
        self.state.lock().unwrap().products.get(&id).cloned()
    }

    pub fn derived_images(&self, id: i64) -> Vec<String> {
        self.product(id)
            .map(|p| p.derived_images)
            .unwrap_or_default()
    }

    pub fn insert_calls(&self) -> usize {
        self.state.lock().unwrap().insert_calls
    }

    pub fn update_calls(&self) -> usize {
        self.state.lock().unwrap().update_calls
    }
}

#[async_trait]
impl ProductStore for InMemoryStore {
    async fn insert(&self, product: &NewProduct, trace: &TraceId) -> Result<i64, ProductError> {
        let mut state = self.state.lock().unwrap();
        state.insert_calls += 1;

        if let Some(err) = state.fail_next_insert.take() {
            return Err(err.with_trace(trace));
        }
        if !state.users.contains_key(&product.user_id) {
            return Err(AppError::Conflict("user id is not found".into()).with_trace(trace));
        }
        let duplicate = state.products.values().any(|p| {
            p.product.user_id == product.user_id && p.product.product_name == product.product_name
        });
        if duplicate {
            return Err(AppError::Conflict("product already added".into()).with_trace(trace));
        }

        state.next_product_id += 1;
        let id = state.next_product_id;
        state.products.insert(
            id,
            StoredProduct {
                product: product.clone(),
                derived_images: Vec::new(),
            },
        );
        Ok(id)
    }

    async fn fetch_source_image_urls(
        &self,
        product_id: i64,
        trace: &TraceId,
    ) -> Result<Vec<String>, ProductError> {
        self.state
            .lock()
            .unwrap()
            .products
            .get(&product_id)
            .map(|p| p.product.product_images.clone())
            .ok_or_else(|| {
                AppError::NotFound(format!("product {} not found", product_id)).with_trace(trace)
            })
    }

    async fn update_derived_images(
        &self,
        product_id: i64,
        paths: &[String],
        trace: &TraceId,
    ) -> Result<(), ProductError> {
        let mut state = self.state.lock().unwrap();
        state.update_calls += 1;
        if state.fail_updates {
            return Err(AppError::Storage("update rejected".into()).with_trace(trace));
        }
        match state.products.get_mut(&product_id) {
            Some(p) => {
                p.derived_images.extend_from_slice(paths);
                Ok(())
            }
            None => Err(
                AppError::NotFound(format!("product {} not found", product_id)).with_trace(trace),
            ),
        }
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn insert_user(&self, user: &NewUser, trace: &TraceId) -> Result<i64, ProductError> {
        let mut state = self.state.lock().unwrap();
        if state.users.values().any(|u| u.mobile == user.mobile) {
            return Err(AppError::Conflict("user already added".into()).with_trace(trace));
        }
        state.next_user_id += 1;
        let id = state.next_user_id;
        state.users.insert(id, user.clone());
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_product(user_id: i64, name: &str) -> NewProduct {
        NewProduct::stamped(
            name.into(),
            "desc".into(),
            vec!["http://img/a.png".into()],
            10,
            user_id,
        )
    }

    #[tokio::test]
    async fn insert_assigns_ids_and_rejects_duplicates() {
        let store = InMemoryStore::new();
        let trace = TraceId::from("t-1");
        let user = store.add_user("ada");

        let first = store.insert(&new_product(user, "lamp"), &trace).await.unwrap();
        let second = store.insert(&new_product(user, "desk"), &trace).await.unwrap();
        assert_ne!(first, second);

        let err = store
            .insert(&new_product(user, "lamp"), &trace)
            .await
            .unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(err.trace.as_str(), "t-1");
        assert_eq!(store.insert_calls(), 3);
    }

    #[tokio::test]
    async fn unknown_owner_is_conflict() {
        let store = InMemoryStore::new();
        let err = store
            .insert(&new_product(99, "lamp"), &TraceId::from("t"))
            .await
            .unwrap_err();
        assert!(matches!(err.error, AppError::Conflict(ref m) if m == "user id is not found"));
    }

    #[tokio::test]
    async fn update_appends() {
        let store = InMemoryStore::new();
        let trace = TraceId::generate();
        let user = store.add_user("ada");
        let id = store.add_product(user, "lamp", vec!["u1".into()]);

        store
            .update_derived_images(id, &["a".to_string()], &trace)
            .await
            .unwrap();
        store
            .update_derived_images(id, &["b".to_string()], &trace)
            .await
            .unwrap();
        assert_eq!(store.derived_images(id), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn missing_product_is_not_found() {
        let store = InMemoryStore::new();
        let err = store
            .fetch_source_image_urls(5, &TraceId::generate())
            .await
            .unwrap_err();
        assert!(matches!(err.error, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn duplicate_mobile_is_conflict() {
        let store = InMemoryStore::new();
        let trace = TraceId::generate();
        let user = NewUser::stamped("ada".into(), "123".into(), 1.0, 2.0);
        store.insert_user(&user, &trace).await.unwrap();
        let err = store.insert_user(&user, &trace).await.unwrap_err();
        assert!(err.is_conflict());
    }
}
