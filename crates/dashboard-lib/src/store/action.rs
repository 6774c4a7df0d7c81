//! Actions describing intended state transitions

use crate::models::ClusterUtilization;
use chrono::{DateTime, Utc};

/// Plain description of a state change, processed by [`super::reduce`]
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Replace the committed log filter
    SetCurrentSearch(String),
    /// A utilization fetch was started
    FetchUtilizationStarted,
    /// A utilization fetch completed
    FetchUtilizationSucceeded {
        utilization: ClusterUtilization,
        received_at: DateTime<Utc>,
    },
    /// A utilization fetch failed
    FetchUtilizationFailed { error: String },
}

impl Action {
    /// Stable name used for logging and metric labels
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetCurrentSearch(_) => "set_current_search",
            Action::FetchUtilizationStarted => "fetch_utilization_started",
            Action::FetchUtilizationSucceeded { .. } => "fetch_utilization_succeeded",
            Action::FetchUtilizationFailed { .. } => "fetch_utilization_failed",
        }
    }
}

/// Build the "set current search" action
pub fn set_current_search(search: impl Into<String>) -> Action {
    Action::SetCurrentSearch(search.into())
}
