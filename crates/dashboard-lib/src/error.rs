//! Error types for the dashboard library

use thiserror::Error;

/// Errors raised by the dashboard core
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DashboardError {
    /// A utilization snapshot listed the same request more than once
    #[error("duplicate utilization record for request '{0}'")]
    DuplicateRequestId(String),

    /// The upstream utilization fetch failed
    #[error("utilization fetch failed: {0}")]
    Fetch(String),

    /// A configuration value was rejected
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
