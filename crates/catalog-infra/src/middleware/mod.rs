//! Shared HTTP middleware for the catalog service

pub mod trace_id;

pub use trace_id::trace_id_middleware;
