//! Immutable application state snapshots

use crate::error::{DashboardError, Result};
use crate::utilization::UtilizationIndex;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Root of the application state tree
///
/// Snapshots are never mutated in place; the reducer builds a new one for
/// every action and the store publishes it as an `Arc<AppState>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    /// Committed log filter text
    pub search: String,
    pub api: ApiState,
}

/// Resources fetched from the scheduler API
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiState {
    pub utilization: ApiResource<UtilizationIndex>,
}

/// Fetch bookkeeping around one API resource
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResource<T> {
    /// True while a fetch for this resource is in flight
    pub is_fetching: bool,
    /// Last successfully fetched data (kept while a refetch is in flight)
    pub data: Arc<T>,
    /// Message of the last failed fetch, cleared on success
    pub error: Option<String>,
    /// When the current data was received
    pub received_at: Option<DateTime<Utc>>,
    /// Request ids the last snapshot listed more than once
    pub duplicate_request_ids: Vec<String>,
}

impl<T: Default> Default for ApiResource<T> {
    fn default() -> Self {
        Self {
            is_fetching: false,
            data: Arc::new(T::default()),
            error: None,
            received_at: None,
            duplicate_request_ids: Vec::new(),
        }
    }
}

impl<T> ApiResource<T> {
    /// Reject the current snapshot if it listed any request id twice
    pub fn ensure_unique_request_ids(&self) -> Result<()> {
        match self.duplicate_request_ids.first() {
            Some(request_id) => Err(DashboardError::DuplicateRequestId(request_id.clone())),
            None => Ok(()),
        }
    }
}

impl AppState {
    /// Initial state with a pre-committed search string
    pub fn with_search(search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_request_ids_check() {
        let mut resource = ApiResource::<UtilizationIndex>::default();
        assert_eq!(resource.ensure_unique_request_ids(), Ok(()));

        resource.duplicate_request_ids = vec!["req-2".to_string(), "req-7".to_string()];
        assert_eq!(
            resource.ensure_unique_request_ids(),
            Err(DashboardError::DuplicateRequestId("req-2".to_string()))
        );
    }
}
