//! Utilization polling
//!
//! Periodically pulls a utilization snapshot from a [`UtilizationSource`] and
//! reports progress to the store as fetch actions.

use crate::models::ClusterUtilization;
use crate::observability::DashboardMetrics;
use crate::store::{Action, Dispatcher};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info};

pub use async_trait::async_trait;

/// Trait for utilization snapshot providers
#[async_trait]
pub trait UtilizationSource: Send + Sync {
    /// Fetch the current cluster utilization snapshot
    async fn fetch_utilization(&self) -> Result<ClusterUtilization>;
}

/// Configuration for the utilization poller
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Time between fetches (default: 60 seconds)
    pub interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
        }
    }
}

/// Fetches utilization snapshots on a fixed cadence
pub struct UtilizationPoller {
    source: Arc<dyn UtilizationSource>,
    dispatcher: Dispatcher,
    config: PollerConfig,
    metrics: DashboardMetrics,
}

impl UtilizationPoller {
    pub fn new(
        source: Arc<dyn UtilizationSource>,
        dispatcher: Dispatcher,
        config: PollerConfig,
    ) -> Self {
        Self {
            source,
            dispatcher,
            config,
            metrics: DashboardMetrics::new(),
        }
    }

    /// Run a single fetch, dispatching its start and outcome
    pub async fn poll_once(&self) {
        self.dispatcher.send(Action::FetchUtilizationStarted).await;

        let start = Instant::now();
        let outcome = self.source.fetch_utilization().await;
        self.metrics
            .observe_fetch_latency(start.elapsed().as_secs_f64());

        let action = match outcome {
            Ok(utilization) => {
                debug!(
                    requests = utilization.request_utilizations.len(),
                    elapsed_ms = start.elapsed().as_millis(),
                    "Fetched utilization snapshot"
                );
                Action::FetchUtilizationSucceeded {
                    utilization,
                    received_at: chrono::Utc::now(),
                }
            }
            Err(e) => Action::FetchUtilizationFailed {
                error: format!("{e:#}"),
            },
        };

        self.dispatcher.send(action).await;
    }

    /// Poll until shutdown or until the store stops receiving
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        info!(
            interval_secs = self.config.interval.as_secs(),
            "Starting utilization poller"
        );

        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if self.dispatcher.is_closed() {
                        info!("Store stopped, ending utilization poller");
                        break;
                    }
                    // an in-flight fetch must not hold up shutdown
                    tokio::select! {
                        _ = self.poll_once() => {}
                        _ = shutdown.recv() => {
                            info!("Shutting down utilization poller, abandoning in-flight fetch");
                            break;
                        }
                    }
                }
                _ = shutdown.recv() => {
                    info!("Shutting down utilization poller");
                    break;
                }
            }
        }
    }
}
