//! Wire models for the scheduler's utilization endpoint

use serde::{Deserialize, Serialize};

/// Resource usage of a single request over the reporting window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestUtilization {
    pub request_id: String,
    pub cpu_reserved: f64,
    pub cpu_used: f64,
    pub mem_bytes_reserved: u64,
    pub mem_bytes_used: u64,
    pub num_tasks: u32,
    pub min_mem_bytes_used: u64,
    pub max_mem_bytes_used: u64,
    pub min_cpu_used: f64,
    pub max_cpu_used: f64,
}

/// Cluster-wide utilization snapshot as served by `usage/cluster/utilization`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterUtilization {
    #[serde(default)]
    pub request_utilizations: Vec<RequestUtilization>,
    /// Epoch millis at which the backend computed the snapshot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}
