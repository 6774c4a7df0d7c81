//! Interactive log search session
//!
//! Drives the search control from line-based input. Each line is either a
//! command (`:open`, `:close`, `:enter`, `:esc`, `:quit`) or the new contents
//! of the search field.

use anyhow::{Context, Result};
use dashboard_lib::components::search::{self, Key, SearchDropdown};
use dashboard_lib::store::{channel, AppState, Store};
use serde::Serialize;
use std::io::{BufRead, Write};
use tracing::debug;

use crate::output::{print_warning, render_search, OutputFormat};

/// One parsed line of session input
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Open,
    Close,
    Key(Key),
    Quit,
    Text(String),
}

fn parse_line(line: &str) -> Input {
    match line.trim_end_matches(['\r', '\n']) {
        ":open" => Input::Open,
        ":close" => Input::Close,
        ":enter" => Input::Key(Key::Enter),
        ":esc" => Input::Key(Key::Escape),
        ":quit" | ":q" => Input::Quit,
        text => Input::Text(text.to_string()),
    }
}

#[derive(Serialize)]
struct Frame<'a> {
    committed: &'a str,
    #[serde(flatten)]
    view: search::SearchView,
}

/// Run a search session over `input`, writing a frame after every line.
///
/// Returns the final committed search.
pub fn run_session<R: BufRead, W: Write>(
    input: R,
    mut output: W,
    initial: &str,
    format: OutputFormat,
) -> Result<String> {
    let mut store = Store::new(AppState::with_search(initial));
    let (dispatcher, mut actions) = channel(16);

    let mut props = search::map_state_to_props(&store.state());
    let mut dropdown = SearchDropdown::new(&props);
    write_frame(&mut output, &dropdown, &props.search, format)?;

    for line in input.lines() {
        let line = line.context("Failed to read input")?;
        let parsed = parse_line(&line);
        debug!(input = ?parsed, "search session input");

        match parsed {
            Input::Quit => break,
            Input::Open => {
                if !dropdown.is_open() {
                    dropdown.on_trigger_click();
                }
            }
            Input::Close => dropdown.on_outside_click(),
            Input::Key(key) => dropdown.on_key_down(key, &props, &dispatcher),
            Input::Text(text) => {
                if dropdown.is_open() {
                    dropdown.on_change(text);
                } else {
                    print_warning("Search popover is closed, type :open first");
                }
            }
        }

        // cooperative loop: reduce everything dispatched by this interaction
        while let Ok(action) = actions.try_recv() {
            store.dispatch(action);
        }
        props = search::map_state_to_props(&store.state());

        write_frame(&mut output, &dropdown, &props.search, format)?;
    }

    Ok(props.search)
}

fn write_frame<W: Write>(
    output: &mut W,
    dropdown: &SearchDropdown,
    committed: &str,
    format: OutputFormat,
) -> Result<()> {
    let props = search::SearchProps {
        search: committed.to_string(),
    };
    let view = dropdown.view(&props);

    match format {
        OutputFormat::Table => write!(output, "{}", render_search(&view, committed))?,
        OutputFormat::Json => writeln!(
            output,
            "{}",
            serde_json::to_string(&Frame { committed, view })?
        )?,
    }
    output.flush()?;
    Ok(())
}
