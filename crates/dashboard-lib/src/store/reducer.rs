//! Pure state transitions

use super::action::Action;
use super::state::AppState;
use crate::utilization::UtilizationIndex;
use std::sync::Arc;

/// Compute the next state for an action.
///
/// Never touches `state`; the caller swaps in the returned snapshot.
pub fn reduce(state: &AppState, action: &Action) -> AppState {
    let mut next = state.clone();

    match action {
        Action::SetCurrentSearch(search) => {
            next.search = search.clone();
        }
        Action::FetchUtilizationStarted => {
            next.api.utilization.is_fetching = true;
        }
        Action::FetchUtilizationSucceeded {
            utilization,
            received_at,
        } => {
            let (index, duplicates) =
                UtilizationIndex::from_records(utilization.request_utilizations.clone());
            let resource = &mut next.api.utilization;
            resource.is_fetching = false;
            resource.data = Arc::new(index);
            resource.error = None;
            resource.received_at = Some(*received_at);
            resource.duplicate_request_ids = duplicates;
        }
        Action::FetchUtilizationFailed { error } => {
            let resource = &mut next.api.utilization;
            resource.is_fetching = false;
            resource.error = Some(error.clone());
        }
    }

    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClusterUtilization, RequestUtilization};
    use crate::store::action::set_current_search;
    use chrono::Utc;

    fn record(request_id: &str) -> RequestUtilization {
        RequestUtilization {
            request_id: request_id.to_string(),
            cpu_reserved: 2.0,
            cpu_used: 1.0,
            mem_bytes_reserved: 2048,
            mem_bytes_used: 1024,
            num_tasks: 1,
            min_mem_bytes_used: 1024,
            max_mem_bytes_used: 1024,
            min_cpu_used: 1.0,
            max_cpu_used: 1.0,
        }
    }

    fn succeeded(records: Vec<RequestUtilization>) -> Action {
        Action::FetchUtilizationSucceeded {
            utilization: ClusterUtilization {
                request_utilizations: records,
                timestamp: None,
            },
            received_at: Utc::now(),
        }
    }

    #[test]
    fn test_set_current_search() {
        let state = AppState::default();
        let next = reduce(&state, &set_current_search("error OR fatal"));

        assert_eq!(next.search, "error OR fatal");
        assert_eq!(state.search, "", "input snapshot must not change");
    }

    #[test]
    fn test_fetch_started_keeps_stale_data() {
        let loaded = reduce(&AppState::default(), &succeeded(vec![record("a")]));
        let refetching = reduce(&loaded, &Action::FetchUtilizationStarted);

        assert!(refetching.api.utilization.is_fetching);
        assert!(refetching.api.utilization.data.get("a").is_some());
    }

    #[test]
    fn test_fetch_succeeded_replaces_index() {
        let started = reduce(&AppState::default(), &Action::FetchUtilizationStarted);
        let loaded = reduce(&started, &succeeded(vec![record("a"), record("b")]));

        let resource = &loaded.api.utilization;
        assert!(!resource.is_fetching);
        assert_eq!(resource.data.len(), 2);
        assert!(resource.received_at.is_some());
        assert!(resource.duplicate_request_ids.is_empty());
    }

    #[test]
    fn test_fetch_succeeded_reports_duplicates() {
        let loaded = reduce(
            &AppState::default(),
            &succeeded(vec![record("a"), record("a")]),
        );

        assert_eq!(loaded.api.utilization.data.len(), 1);
        assert_eq!(loaded.api.utilization.duplicate_request_ids, vec!["a"]);
    }

    #[test]
    fn test_fetch_failed_keeps_data_and_records_error() {
        let loaded = reduce(&AppState::default(), &succeeded(vec![record("a")]));
        let started = reduce(&loaded, &Action::FetchUtilizationStarted);
        let failed = reduce(
            &started,
            &Action::FetchUtilizationFailed {
                error: "connection refused".to_string(),
            },
        );

        let resource = &failed.api.utilization;
        assert!(!resource.is_fetching);
        assert_eq!(resource.error.as_deref(), Some("connection refused"));
        assert!(resource.data.get("a").is_some());

        let recovered = reduce(&failed, &succeeded(vec![record("b")]));
        assert!(recovered.api.utilization.error.is_none());
    }

    #[test]
    fn test_search_does_not_touch_api_state() {
        let loaded = reduce(&AppState::default(), &succeeded(vec![record("a")]));
        let searched = reduce(&loaded, &set_current_search("oom"));

        assert_eq!(searched.api, loaded.api);
    }
}
