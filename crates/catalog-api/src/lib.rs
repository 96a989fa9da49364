//! Catalog API Library
//!
//! HTTP ingress and the product orchestrator for the catalog service.

pub mod error;
mod handlers;
pub mod services;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use services::{ProductDetails, ProductService};
pub use state::AppState;
