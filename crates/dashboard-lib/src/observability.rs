//! Observability infrastructure for the dashboard
//!
//! Provides:
//! - Tracing subscriber setup (plain or JSON output, env filter)
//! - Prometheus metrics (dispatched actions, fetch latency, fetch errors, duplicate records)
//! - Structured event logging with tracing

use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Histogram, IntCounter,
    IntCounterVec,
};
use std::sync::OnceLock;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default histogram buckets for fetch latency (in seconds)
const FETCH_LATENCY_BUCKETS: &[f64] = &[0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `default_level`. Safe to call more than once; later
/// calls are ignored.
pub fn init_tracing(default_level: &str, json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let result = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<DashboardMetricsInner> = OnceLock::new();

struct DashboardMetricsInner {
    actions_dispatched: IntCounterVec,
    fetch_latency_seconds: Histogram,
    fetch_errors: IntCounter,
    duplicate_request_ids: IntCounter,
}

impl DashboardMetricsInner {
    fn new() -> Self {
        Self {
            actions_dispatched: register_int_counter_vec!(
                "dashboard_actions_dispatched_total",
                "Actions reduced by the store",
                &["action"]
            )
            .expect("Failed to register actions_dispatched"),

            fetch_latency_seconds: register_histogram!(
                "dashboard_fetch_latency_seconds",
                "Time spent fetching utilization snapshots",
                FETCH_LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register fetch_latency_seconds"),

            fetch_errors: register_int_counter!(
                "dashboard_fetch_errors_total",
                "Failed utilization fetches"
            )
            .expect("Failed to register fetch_errors"),

            duplicate_request_ids: register_int_counter!(
                "dashboard_duplicate_request_ids_total",
                "Request ids repeated within a utilization snapshot"
            )
            .expect("Failed to register duplicate_request_ids"),
        }
    }
}

/// Lightweight handle to the global dashboard metrics.
///
/// Clones share the same underlying metrics.
#[derive(Clone)]
pub struct DashboardMetrics {
    _private: (),
}

impl Default for DashboardMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(DashboardMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &DashboardMetricsInner {
        GLOBAL_METRICS.get_or_init(DashboardMetricsInner::new)
    }

    pub fn inc_actions_dispatched(&self, action: &str) {
        self.inner()
            .actions_dispatched
            .with_label_values(&[action])
            .inc();
    }

    pub fn actions_dispatched(&self, action: &str) -> u64 {
        self.inner()
            .actions_dispatched
            .with_label_values(&[action])
            .get()
    }

    pub fn observe_fetch_latency(&self, duration_secs: f64) {
        self.inner().fetch_latency_seconds.observe(duration_secs);
    }

    pub fn inc_fetch_errors(&self) {
        self.inner().fetch_errors.inc();
    }

    pub fn inc_duplicate_request_ids(&self, count: usize) {
        self.inner().duplicate_request_ids.inc_by(count as u64);
    }
}

/// Structured logger for dashboard events
#[derive(Clone)]
pub struct StructuredLogger {
    component: String,
}

impl StructuredLogger {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
        }
    }

    pub fn log_search_committed(&self, search: &str) {
        info!(
            event = "search_committed",
            component = %self.component,
            search = %search,
            active = !search.is_empty(),
            "Log search updated"
        );
    }

    pub fn log_fetch_completed(&self, requests: usize) {
        info!(
            event = "utilization_fetched",
            component = %self.component,
            requests = requests,
            "Utilization snapshot received"
        );
    }

    pub fn log_fetch_failed(&self, error: &str) {
        warn!(
            event = "utilization_fetch_failed",
            component = %self.component,
            error = %error,
            "Utilization fetch failed, keeping previous snapshot"
        );
    }

    pub fn log_duplicate_request_ids(&self, request_ids: &[String]) {
        warn!(
            event = "duplicate_request_ids",
            component = %self.component,
            count = request_ids.len(),
            request_ids = ?request_ids,
            "Utilization snapshot repeats request ids, keeping first record of each"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_metrics_counts_actions() {
        let metrics = DashboardMetrics::new();
        let before = metrics.actions_dispatched("metrics_test_action");

        metrics.inc_actions_dispatched("metrics_test_action");
        metrics.inc_actions_dispatched("metrics_test_action");

        assert_eq!(metrics.actions_dispatched("metrics_test_action"), before + 2);

        metrics.observe_fetch_latency(0.05);
        metrics.inc_fetch_errors();
        metrics.inc_duplicate_request_ids(3);
    }

    #[test]
    fn test_structured_logger_creation() {
        let logger = StructuredLogger::new("test-component");
        assert_eq!(logger.component, "test-component");
    }

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing("debug", false);
        init_tracing("info", true);
    }
}
