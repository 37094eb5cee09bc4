//! # Connector Layer
//!
//! Adapters implementing the application ports:
//! - Inference job API (HTTP, plus an in-process mock for offline use and tests)
//! - Message log (DuckDB file or in-memory)
//!
//! and the `api` module wiring them into command handlers.

pub mod adapter;
pub mod api;

pub use adapter::*;
