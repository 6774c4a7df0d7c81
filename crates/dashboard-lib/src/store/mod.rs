//! Unidirectional application store
//!
//! This module provides:
//! - Immutable state snapshots and the actions that transform them
//! - A pure reducer
//! - A store that publishes each reduced snapshot to subscribers
//! - Dispatch handles and projection subscriptions for components

mod action;
mod dispatcher;
mod reducer;
mod state;
mod subscription;

pub use action::{set_current_search, Action};
pub use dispatcher::{channel, ActionLog, Dispatch, Dispatcher};
pub use reducer::reduce;
pub use state::{ApiResource, ApiState, AppState};
pub use subscription::Subscription;

use crate::observability::{DashboardMetrics, StructuredLogger};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, info};

/// Single owner of the current state snapshot
pub struct Store {
    state: Arc<AppState>,
    snapshots: watch::Sender<Arc<AppState>>,
    metrics: DashboardMetrics,
    logger: StructuredLogger,
}

impl Store {
    pub fn new(initial: AppState) -> Self {
        let state = Arc::new(initial);
        let (snapshots, _) = watch::channel(state.clone());

        Self {
            state,
            snapshots,
            metrics: DashboardMetrics::new(),
            logger: StructuredLogger::new("store"),
        }
    }

    /// Current snapshot
    pub fn state(&self) -> Arc<AppState> {
        self.state.clone()
    }

    /// Receive every snapshot published after this call
    pub fn subscribe(&self) -> watch::Receiver<Arc<AppState>> {
        self.snapshots.subscribe()
    }

    /// Subscribe through a projection, yielding only when its output changes
    pub fn connect<P, F>(&self, project: F) -> Subscription<P, F>
    where
        P: Clone + PartialEq,
        F: Fn(&AppState) -> P,
    {
        Subscription::new(self.subscribe(), project)
    }

    /// Reduce an action into a new snapshot and publish it
    pub fn dispatch(&mut self, action: Action) {
        self.metrics.inc_actions_dispatched(action.name());

        let next = reduce(&self.state, &action);
        self.report(&action, &next);

        self.state = Arc::new(next);
        self.snapshots.send_replace(self.state.clone());
        debug!(action = action.name(), "state updated");
    }

    /// Drain dispatched actions until shutdown or until every dispatcher is dropped.
    ///
    /// Returns the final snapshot.
    pub async fn run(
        mut self,
        mut actions: mpsc::Receiver<Action>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Arc<AppState> {
        info!("Starting store event loop");

        loop {
            tokio::select! {
                action = actions.recv() => match action {
                    Some(action) => self.dispatch(action),
                    None => {
                        info!("All dispatchers dropped, stopping store event loop");
                        break;
                    }
                },
                _ = shutdown.recv() => {
                    info!("Shutting down store event loop");
                    break;
                }
            }
        }

        self.state
    }

    fn report(&self, action: &Action, next: &AppState) {
        match action {
            Action::SetCurrentSearch(search) => self.logger.log_search_committed(search),
            Action::FetchUtilizationSucceeded { .. } => {
                let resource = &next.api.utilization;
                self.logger.log_fetch_completed(resource.data.len());
                if !resource.duplicate_request_ids.is_empty() {
                    self.metrics
                        .inc_duplicate_request_ids(resource.duplicate_request_ids.len());
                    self.logger
                        .log_duplicate_request_ids(&resource.duplicate_request_ids);
                }
            }
            Action::FetchUtilizationFailed { error } => {
                self.metrics.inc_fetch_errors();
                self.logger.log_fetch_failed(error);
            }
            Action::FetchUtilizationStarted => {}
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClusterUtilization, RequestUtilization};
    use chrono::Utc;

    fn record(request_id: &str) -> RequestUtilization {
        RequestUtilization {
            request_id: request_id.to_string(),
            cpu_reserved: 1.0,
            cpu_used: 1.0,
            mem_bytes_reserved: 1024,
            mem_bytes_used: 1024,
            num_tasks: 1,
            min_mem_bytes_used: 1024,
            max_mem_bytes_used: 1024,
            min_cpu_used: 1.0,
            max_cpu_used: 1.0,
        }
    }

    fn loaded(records: Vec<RequestUtilization>) -> Action {
        Action::FetchUtilizationSucceeded {
            utilization: ClusterUtilization {
                request_utilizations: records,
                timestamp: None,
            },
            received_at: Utc::now(),
        }
    }

    #[test]
    fn test_dispatch_replaces_snapshot() {
        let mut store = Store::default();
        let before = store.state();

        store.dispatch(set_current_search("fatal"));

        assert_eq!(store.state().search, "fatal");
        assert_eq!(before.search, "", "old snapshots are immutable");
    }

    #[test]
    fn test_subscribers_see_latest_snapshot() {
        let mut store = Store::default();
        let mut rx = store.subscribe();

        store.dispatch(set_current_search("one"));
        store.dispatch(set_current_search("two"));

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().search, "two");
    }

    #[tokio::test]
    async fn test_connect_skips_unrelated_changes() {
        let mut store = Store::default();
        let mut search = store.connect(|state: &AppState| state.search.clone());
        assert_eq!(search.current(), "");

        store.dispatch(Action::FetchUtilizationStarted);
        store.dispatch(set_current_search("oom"));

        assert_eq!(search.changed().await.as_deref(), Some("oom"));
    }

    #[tokio::test]
    async fn test_connect_ends_when_store_dropped() {
        let store = Store::default();
        let mut search = store.connect(|state: &AppState| state.search.clone());
        drop(store);

        assert!(search.changed().await.is_none());
    }

    #[tokio::test]
    async fn test_run_drains_dispatched_actions() {
        let store = Store::default();
        let mut fetching = store.connect(|state: &AppState| state.api.utilization.is_fetching);
        let (dispatcher, rx) = channel(16);
        let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let handle = tokio::spawn(store.run(rx, shutdown_rx));

        dispatcher.dispatch(Action::FetchUtilizationStarted);
        assert_eq!(fetching.changed().await, Some(true));

        dispatcher.dispatch(loaded(vec![record("a"), record("b")]));
        assert_eq!(fetching.changed().await, Some(false));

        drop(dispatcher);
        let final_state = handle.await.unwrap();
        assert_eq!(final_state.api.utilization.data.len(), 2);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let store = Store::new(AppState::with_search("kept"));
        let (_dispatcher, rx) = channel(16);
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let handle = tokio::spawn(store.run(rx, shutdown_rx));
        shutdown_tx.send(()).unwrap();

        let final_state = handle.await.unwrap();
        assert_eq!(final_state.search, "kept");
    }

    #[test]
    fn test_duplicates_are_kept_in_state() {
        let mut store = Store::default();
        store.dispatch(loaded(vec![record("a"), record("a")]));

        let state = store.state();
        assert_eq!(state.api.utilization.duplicate_request_ids, vec!["a"]);
        assert_eq!(state.api.utilization.data.len(), 1);
    }
}
