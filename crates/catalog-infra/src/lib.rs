//! Catalog Infrastructure Library
//!
//! Shared infrastructure for the catalog service:
//! - Telemetry initialization (tracing-subscriber, pretty or JSON)
//! - Trace-id middleware for the `transaction-id` header

pub mod middleware;
pub mod telemetry;

pub use middleware::trace_id_middleware;
pub use telemetry::{init_telemetry, shutdown_telemetry};
