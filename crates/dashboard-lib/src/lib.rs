//! Core library for the Singularity dashboard view layer
//!
//! This crate provides:
//! - Wire models for request utilization snapshots
//! - A unidirectional store (immutable state, pure reducer, subscriptions)
//! - Per-request utilization indexing and per-task averages
//! - The log search filter and resource utilization view components
//! - A polling fetcher that feeds utilization snapshots into the store
//! - Logging, metrics and error types shared by the binaries

pub mod components;
pub mod error;
pub mod fetch;
pub mod format;
pub mod models;
pub mod observability;
pub mod store;
pub mod utilization;

pub use error::{DashboardError, Result};
pub use models::*;
pub use observability::{DashboardMetrics, StructuredLogger};
pub use store::{Action, AppState, Dispatch, Dispatcher, Store};
