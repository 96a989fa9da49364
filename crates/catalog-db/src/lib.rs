//! Product store: Postgres repositories behind the `ProductStore` and
//! `UserStore` traits consumed by the orchestrator and the image worker.

pub mod db;
pub mod store;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use db::{ProductRepository, UserRepository};
pub use store::{ProductStore, UserStore};
