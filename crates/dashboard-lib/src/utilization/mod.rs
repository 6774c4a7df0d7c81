//! Per-request utilization lookup and per-task math
//!
//! This module provides:
//! - A request-id keyed index over a utilization snapshot with duplicate detection
//! - Per-task averages that refuse to divide by a zero task count

mod index;
mod stats;

pub use index::UtilizationIndex;
pub use stats::{per_task, PerTaskUsage};
