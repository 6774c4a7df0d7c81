//! Terminal rendering of dashboard views

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use clap::ValueEnum;
use colored::Colorize;
use dashboard_lib::components::search::SearchView;
use dashboard_lib::components::utilization_panel::{PanelBody, UsageInfo, UsageView};
use dashboard_lib::components::{ButtonStyle, CollapsibleSection};
use dashboard_lib::format::{format_fixed, humanize_file_size, or_not_available};
use dashboard_lib::RequestUtilization;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Width of the usage bar in characters
const BAR_WIDTH: usize = 20;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// Parse a configured format name, case-insensitively
    pub fn parse(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }
}

/// Print a value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Render a collapsible section holding the utilization panel
pub fn render_section(section: &CollapsibleSection<PanelBody>, expanded: bool) -> String {
    let marker = if expanded { "▾" } else { "▸" };
    let mut out = format!(
        "{} {} {}\n{}\n",
        marker,
        section.title.bold(),
        section.subtitle.dimmed(),
        "=".repeat(50)
    );

    if !expanded {
        return out;
    }

    match &section.body {
        PanelBody::Loading => out.push_str(&format!("{}\n", "Loading…".dimmed())),
        PanelBody::Empty => {}
        PanelBody::Usage(view) => out.push_str(&render_usage(view)),
    }

    out
}

fn render_usage(view: &UsageView) -> String {
    let mut out = String::new();
    out.push_str(&render_usage_info(&view.cpu));
    out.push_str(&render_usage_info(&view.memory));
    out.push('\n');

    let rows: Vec<[String; 2]> = view
        .rows
        .iter()
        .map(|row| [row.label.to_string(), row.value.clone()])
        .collect();
    let table = Table::from_iter(rows).with(Style::rounded()).to_string();
    out.push_str(&table);
    out.push('\n');

    out
}

fn render_usage_info(info: &UsageInfo) -> String {
    format!(
        "{}\n  {} {}\n  {}\n",
        info.title.bold(),
        usage_bar(info.proportion, BAR_WIDTH),
        info.percent_label(),
        info.caption
    )
}

/// Render a proportion as a fixed-width bar, colored by pressure
pub fn usage_bar(proportion: Option<f64>, width: usize) -> String {
    let Some(proportion) = proportion.filter(|p| p.is_finite()) else {
        return format!("[{}]", "·".repeat(width));
    };

    let filled = ((proportion.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    let bar = format!("{}{}", "#".repeat(filled), "-".repeat(width - filled));

    let colored = if proportion >= 0.9 {
        bar.red()
    } else if proportion >= 0.7 {
        bar.yellow()
    } else {
        bar.green()
    };
    format!("[{}]", colored)
}

/// Render the search trigger and, when open, its popover
pub fn render_search(view: &SearchView, committed: &str) -> String {
    let mut out = match view.trigger {
        ButtonStyle::Default => "[ search ▾ ]".to_string(),
        ButtonStyle::Info => format!(
            "{} filter: {}",
            "[ search ▾ ]".cyan().bold(),
            committed.cyan()
        ),
    };
    out.push('\n');

    if let Some(popover) = &view.popover {
        let field = if popover.value.is_empty() {
            popover.placeholder.dimmed().to_string()
        } else {
            popover.value.clone()
        };
        out.push_str(&format!("  ┌ > {}\n", field));
        out.push_str(&format!(
            "  └ {}\n",
            ":enter apply · :esc revert · :close".dimmed()
        ));
    }

    out
}

/// Row of the all-requests utilization table
#[derive(Tabled)]
struct RequestRow {
    #[tabled(rename = "Request")]
    request_id: String,
    #[tabled(rename = "Tasks")]
    num_tasks: u32,
    #[tabled(rename = "CPU/task")]
    cpu: String,
    #[tabled(rename = "Memory/task")]
    memory: String,
}

/// Render per-task averages for every request in a snapshot
pub fn render_request_table(records: &[RequestUtilization]) -> String {
    if records.is_empty() {
        return format!("{}\n", "No utilization records found".yellow());
    }

    let rows: Vec<RequestRow> = records
        .iter()
        .map(|record| {
            let cpu = record.cpu_per_task();
            let memory = record.memory_per_task();
            RequestRow {
                request_id: record.request_id.clone(),
                num_tasks: record.num_tasks,
                cpu: format!(
                    "{} / {}",
                    or_not_available(cpu.map(|u| u.used), |v| format_fixed(v, 2)),
                    or_not_available(cpu.map(|u| u.reserved), |v| format_fixed(v, 2))
                ),
                memory: format!(
                    "{} / {}",
                    or_not_available(memory.map(|u| u.used), humanize_file_size),
                    or_not_available(memory.map(|u| u.reserved), humanize_file_size)
                ),
            }
        })
        .collect();

    format!("{}\n", Table::new(rows).with(Style::rounded()))
}

/// Format the time of the last successful fetch for display
pub fn format_received_at(received_at: Option<DateTime<Utc>>) -> String {
    match received_at {
        Some(ts) => ts
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => "never".to_string(),
    }
}
