use catalog_db::UserStore;
use catalog_worker::WorkerStatus;
use std::sync::Arc;

use crate::services::ProductService;

/// Shared handler state.
///
/// Holds the only long-lived [`EventQueue`](catalog_worker::EventQueue) sender
/// (inside `products`); dropping every clone of the state closes the queue.
#[derive(Clone)]
pub struct AppState {
    pub products: ProductService,
    pub users: Arc<dyn UserStore>,
    pub worker: WorkerStatus,
}
