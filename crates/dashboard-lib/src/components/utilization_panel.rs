//! Resource utilization panel for a single request
//!
//! Shows per-task CPU and memory averages plus min/max usage across all of
//! the request's tasks over the backend's fixed reporting window.

use super::section::CollapsibleSection;
use crate::format::{
    format_fixed, format_rounded, humanize_file_size, or_not_available, NOT_AVAILABLE,
};
use crate::models::RequestUtilization;
use crate::store::AppState;
use crate::utilization::PerTaskUsage;
use serde::Serialize;

pub const SECTION_ID: &str = "request-utilization";
pub const SECTION_TITLE: &str = "Resource usage";

/// Length of the backend's reporting window
pub const REPORTING_WINDOW_HOURS: u32 = 24;

/// Props projected from the store for one request
#[derive(Debug, Clone, PartialEq)]
pub struct UtilizationPanelProps {
    pub request_id: String,
    /// True while the utilization fetch is in flight
    pub is_fetching: bool,
    /// Absent until loaded, or when the snapshot has no record for the request
    pub utilization: Option<RequestUtilization>,
}

/// Project the store snapshot into panel props for `request_id`
pub fn map_state_to_props(state: &AppState, request_id: &str) -> UtilizationPanelProps {
    let resource = &state.api.utilization;
    UtilizationPanelProps {
        request_id: request_id.to_string(),
        is_fetching: resource.is_fetching,
        utilization: resource.data.get(request_id).cloned(),
    }
}

/// Used/total indicator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageInfo {
    pub title: &'static str,
    pub used: Option<f64>,
    pub total: Option<f64>,
    /// `used / total`, absent when it cannot be computed
    pub proportion: Option<f64>,
    pub caption: String,
}

/// One labelled row of the min/max table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatRow {
    pub label: &'static str,
    pub value: String,
}

/// Loaded panel contents
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageView {
    pub cpu: UsageInfo,
    pub memory: UsageInfo,
    pub rows: Vec<StatRow>,
}

/// What the section body shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "usage", rename_all = "lowercase")]
pub enum PanelBody {
    /// Fetch in flight; numbers are suppressed even if stale data exists
    Loading,
    /// No record for the request
    Empty,
    Usage(UsageView),
}

/// Render the panel for the given props
pub fn render(props: &UtilizationPanelProps) -> CollapsibleSection<PanelBody> {
    let body = if props.is_fetching {
        PanelBody::Loading
    } else {
        match &props.utilization {
            Some(utilization) => PanelBody::Usage(usage_view(utilization)),
            None => PanelBody::Empty,
        }
    };

    CollapsibleSection {
        id: SECTION_ID,
        title: SECTION_TITLE,
        subtitle: format!("(past {REPORTING_WINDOW_HOURS} hours)"),
        body,
    }
}

fn usage_view(utilization: &RequestUtilization) -> UsageView {
    let cpu = utilization.cpu_per_task();
    let memory = utilization.memory_per_task();

    UsageView {
        cpu: usage_info(
            "CPU per task average",
            cpu,
            cpu.map(|usage| {
                format!(
                    "{} of {} CPU reserved",
                    format_fixed(usage.used, 2),
                    format_rounded(usage.reserved, 2)
                )
            }),
        ),
        memory: usage_info(
            "Memory per task average",
            memory,
            memory.map(|usage| {
                format!(
                    "{} of {} reserved",
                    humanize_file_size(usage.used),
                    humanize_file_size(usage.reserved)
                )
            }),
        ),
        rows: vec![
            StatRow {
                label: "Min memory (all tasks)",
                value: humanize_file_size(utilization.min_mem_bytes_used as f64),
            },
            StatRow {
                label: "Max memory (all tasks)",
                value: humanize_file_size(utilization.max_mem_bytes_used as f64),
            },
            StatRow {
                label: "Min CPU (all tasks)",
                value: format_rounded(utilization.min_cpu_used, 2),
            },
            StatRow {
                label: "Max CPU (all tasks)",
                value: format_rounded(utilization.max_cpu_used, 2),
            },
        ],
    }
}

fn usage_info(
    title: &'static str,
    usage: Option<PerTaskUsage>,
    caption: Option<String>,
) -> UsageInfo {
    UsageInfo {
        title,
        used: usage.map(|u| u.used),
        total: usage.map(|u| u.reserved),
        proportion: usage.and_then(|u| u.proportion()),
        caption: caption.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    }
}

impl UsageInfo {
    /// Proportion as a whole percentage, e.g. `50%`
    pub fn percent_label(&self) -> String {
        or_not_available(self.proportion, |p| format!("{}%", format_rounded(p * 100.0, 0)))
    }
}
