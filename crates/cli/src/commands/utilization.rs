//! Resource utilization commands

use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;
use dashboard_lib::components::utilization_panel::{self, PanelBody};
use dashboard_lib::components::{CollapsibleSection, SectionToggles};
use dashboard_lib::fetch::{PollerConfig, UtilizationPoller, UtilizationSource};
use dashboard_lib::store::{channel, AppState, Store};
use dashboard_lib::{DashboardError, RequestUtilization};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::info;

use crate::output::{
    format_received_at, print_info, print_json, render_request_table, render_section, OutputFormat,
};

/// What a utilization view shows, projected from the store
#[derive(Debug, Clone, PartialEq)]
enum Content {
    Panel(CollapsibleSection<PanelBody>),
    Requests {
        is_fetching: bool,
        records: Vec<RequestUtilization>,
    },
}

/// A rendered frame: content plus its freshness footer
#[derive(Debug, Clone, PartialEq)]
struct View {
    content: Content,
    received_at: Option<DateTime<Utc>>,
    error: Option<String>,
}

fn project(state: &AppState, request_id: Option<&str>) -> View {
    let resource = &state.api.utilization;
    let content = match request_id {
        Some(id) => Content::Panel(utilization_panel::render(
            &utilization_panel::map_state_to_props(state, id),
        )),
        None => Content::Requests {
            is_fetching: resource.is_fetching,
            records: resource.data.records().to_vec(),
        },
    };

    View {
        content,
        received_at: resource.received_at,
        error: resource.error.clone(),
    }
}

fn print_view(view: &View, format: OutputFormat) -> Result<()> {
    match (&view.content, format) {
        (Content::Panel(section), OutputFormat::Json) => print_json(section)?,
        (Content::Requests { records, .. }, OutputFormat::Json) => print_json(records)?,
        (Content::Panel(section), OutputFormat::Table) => {
            let toggles = SectionToggles::new();
            print!("{}", render_section(section, toggles.is_expanded(section.id)));
        }
        (Content::Requests { is_fetching, records }, OutputFormat::Table) => {
            println!("{}", "Request Utilization".bold());
            println!("{}", "=".repeat(50));
            if *is_fetching {
                println!("{}", "Loading…".dimmed());
            } else {
                print!("{}", render_request_table(records));
            }
        }
    }

    if format == OutputFormat::Table {
        if let Some(error) = &view.error {
            println!("{} {}", "Last fetch failed:".red(), error);
        }
        println!(
            "Last updated: {}",
            format_received_at(view.received_at).dimmed()
        );
    }

    Ok(())
}

/// Fetch once and print the panel for `request_id`, or all requests.
///
/// With `strict`, a snapshot that lists a request id twice is an error.
pub async fn show_utilization(
    source: Arc<dyn UtilizationSource>,
    request_id: Option<String>,
    format: OutputFormat,
    strict: bool,
) -> Result<()> {
    let mut store = Store::default();
    let (dispatcher, mut actions) = channel(8);

    let poller = UtilizationPoller::new(source, dispatcher, PollerConfig::default());
    poller.poll_once().await;
    drop(poller);

    while let Some(action) = actions.recv().await {
        store.dispatch(action);
    }

    let state = store.state();
    let resource = &state.api.utilization;
    if let Some(error) = &resource.error {
        return Err(anyhow::Error::new(DashboardError::Fetch(error.clone()))
            .context("Failed to fetch utilization"));
    }
    if strict {
        resource
            .ensure_unique_request_ids()
            .map_err(|e| anyhow::Error::new(e).context("Utilization snapshot failed strict check"))?;
    }

    print_view(&project(&state, request_id.as_deref()), format)
}

/// Poll on `interval` and re-print whenever the view changes, until Ctrl-C
pub async fn watch_utilization(
    source: Arc<dyn UtilizationSource>,
    request_id: Option<String>,
    interval: Duration,
    format: OutputFormat,
) -> Result<()> {
    if format == OutputFormat::Table {
        print_info(&format!(
            "Refreshing every {}s, press Ctrl-C to stop",
            interval.as_secs()
        ));
    }

    let stop = async {
        let _ = tokio::signal::ctrl_c().await;
        info!("Stopping utilization watch");
    };

    watch_views(source, request_id, interval, stop, |view| {
        print_view(view, format)
    })
    .await
}

/// Run the store loop and poller, handing every changed view to `render`
/// until `stop` resolves or rendering fails
async fn watch_views<S, R>(
    source: Arc<dyn UtilizationSource>,
    request_id: Option<String>,
    interval: Duration,
    stop: S,
    mut render: R,
) -> Result<()>
where
    S: Future<Output = ()>,
    R: FnMut(&View) -> Result<()>,
{
    let store = Store::default();
    let view_request = request_id.clone();
    let mut views = store.connect(move |state: &AppState| project(state, view_request.as_deref()));

    let (dispatcher, actions) = channel(64);
    let (shutdown_tx, _) = broadcast::channel(1);

    let store_handle = tokio::spawn(store.run(actions, shutdown_tx.subscribe()));
    let poller = UtilizationPoller::new(source, dispatcher, PollerConfig { interval });
    let poller_handle = tokio::spawn(poller.run(shutdown_tx.subscribe()));

    info!(
        request_id = ?request_id,
        interval_secs = interval.as_secs(),
        "Watching utilization"
    );

    tokio::pin!(stop);
    let outcome = loop {
        tokio::select! {
            changed = views.changed() => {
                let Some(view) = changed else { break Ok(()) };
                if let Err(e) = render(&view) {
                    break Err(e);
                }
            }
            _ = &mut stop => break Ok(()),
        }
    };

    let _ = shutdown_tx.send(());
    poller_handle.await?;
    store_handle.await?;

    outcome
}
