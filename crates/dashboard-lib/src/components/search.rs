//! Log search filter control
//!
//! A trigger button opening a popover with a text field. Keystrokes only
//! update the component's pending value; Enter or the search button commits
//! it to the store, Escape throws the pending edit away.

use crate::store::{set_current_search, AppState, Dispatch};
use serde::Serialize;

pub const PLACEHOLDER: &str = "Grep logs";

/// Props projected from the store
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchProps {
    /// Committed search string
    pub search: String,
}

/// Project the store snapshot into search props
pub fn map_state_to_props(state: &AppState) -> SearchProps {
    SearchProps {
        search: state.search.clone(),
    }
}

/// Keys the text field reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Other,
}

/// Visual style of the trigger button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    Default,
    /// Highlighted while a search is committed
    Info,
}

/// Trigger style for the committed search
pub fn trigger_style(props: &SearchProps) -> ButtonStyle {
    if props.search.is_empty() {
        ButtonStyle::Default
    } else {
        ButtonStyle::Info
    }
}

/// Rendered popover contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopoverView {
    pub value: String,
    pub placeholder: &'static str,
}

/// Rendered search control
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchView {
    pub trigger: ButtonStyle,
    pub popover: Option<PopoverView>,
}

/// Search control instance with its local interaction state.
///
/// The pending value is seeded from the committed search once, at
/// construction. Later changes to the committed search do not overwrite it;
/// only Escape pulls the committed value back in.
#[derive(Debug, Clone)]
pub struct SearchDropdown {
    search_value: String,
    popover_open: bool,
}

impl SearchDropdown {
    pub fn new(props: &SearchProps) -> Self {
        Self {
            search_value: props.search.clone(),
            popover_open: false,
        }
    }

    /// Pending, uncommitted field value
    pub fn search_value(&self) -> &str {
        &self.search_value
    }

    pub fn is_open(&self) -> bool {
        self.popover_open
    }

    /// Field contents changed; never dispatches
    pub fn on_change(&mut self, value: impl Into<String>) {
        self.search_value = value.into();
    }

    pub fn on_key_down(&mut self, key: Key, props: &SearchProps, dispatch: &impl Dispatch) {
        match key {
            Key::Enter => self.commit(dispatch),
            Key::Escape => self.search_value = props.search.clone(),
            Key::Other => {}
        }
    }

    /// Commit the pending value (search button or Enter)
    pub fn commit(&self, dispatch: &impl Dispatch) {
        dispatch.dispatch(set_current_search(self.search_value.clone()));
    }

    pub fn on_trigger_click(&mut self) {
        self.popover_open = !self.popover_open;
    }

    /// Any click outside the popover closes it
    pub fn on_outside_click(&mut self) {
        self.popover_open = false;
    }

    pub fn view(&self, props: &SearchProps) -> SearchView {
        SearchView {
            trigger: trigger_style(props),
            popover: self.popover_open.then(|| PopoverView {
                value: self.search_value.clone(),
                placeholder: PLACEHOLDER,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Action, ActionLog};

    fn props(search: &str) -> SearchProps {
        SearchProps {
            search: search.to_string(),
        }
    }

    #[test]
    fn test_trigger_active_iff_search_committed() {
        assert_eq!(trigger_style(&props("")), ButtonStyle::Default);
        assert_eq!(trigger_style(&props("error")), ButtonStyle::Info);
        assert_eq!(trigger_style(&props(" ")), ButtonStyle::Info);
    }

    #[test]
    fn test_typing_does_not_dispatch() {
        let log = ActionLog::new();
        let committed = props("");
        let mut dropdown = SearchDropdown::new(&committed);

        dropdown.on_change("e");
        dropdown.on_change("er");
        dropdown.on_key_down(Key::Other, &committed, &log);

        assert_eq!(dropdown.search_value(), "er");
        assert!(log.actions().is_empty());
        assert_eq!(dropdown.view(&committed).trigger, ButtonStyle::Default);
    }

    #[test]
    fn test_enter_commits_pending_value_once() {
        let log = ActionLog::new();
        let committed = props("");
        let mut dropdown = SearchDropdown::new(&committed);

        dropdown.on_change("error OR fatal");
        dropdown.on_key_down(Key::Enter, &committed, &log);

        assert_eq!(
            log.actions(),
            vec![Action::SetCurrentSearch("error OR fatal".to_string())]
        );
    }

    #[test]
    fn test_commit_button_matches_enter() {
        let log = ActionLog::new();
        let mut dropdown = SearchDropdown::new(&props("old"));

        dropdown.on_change("new");
        dropdown.commit(&log);

        assert_eq!(log.actions(), vec![set_current_search("new")]);
    }

    #[test]
    fn test_escape_restores_committed_value() {
        let log = ActionLog::new();
        let committed = props("timeout");
        let mut dropdown = SearchDropdown::new(&committed);

        dropdown.on_change("timeout AND retry");
        dropdown.on_key_down(Key::Escape, &committed, &log);

        assert_eq!(dropdown.search_value(), "timeout");
        assert!(log.actions().is_empty());
    }

    #[test]
    fn test_local_value_seeded_once() {
        let log = ActionLog::new();
        let mut dropdown = SearchDropdown::new(&props("first"));

        // committed value cleared elsewhere after mount
        let cleared = props("");
        assert_eq!(dropdown.search_value(), "first");

        dropdown.on_key_down(Key::Escape, &cleared, &log);
        assert_eq!(dropdown.search_value(), "");
    }

    #[test]
    fn test_popover_open_and_outside_click() {
        let committed = props("");
        let mut dropdown = SearchDropdown::new(&committed);
        assert!(dropdown.view(&committed).popover.is_none());

        dropdown.on_trigger_click();
        dropdown.on_change("oom");
        let view = dropdown.view(&committed);
        assert_eq!(
            view.popover,
            Some(PopoverView {
                value: "oom".to_string(),
                placeholder: PLACEHOLDER,
            })
        );

        dropdown.on_outside_click();
        assert!(!dropdown.is_open());
        assert_eq!(dropdown.search_value(), "oom", "closing keeps the pending edit");

        dropdown.on_trigger_click();
        dropdown.on_trigger_click();
        assert!(!dropdown.is_open());
    }

    #[test]
    fn test_map_state_to_props() {
        let state = AppState::with_search("fatal");
        assert_eq!(map_state_to_props(&state), props("fatal"));
    }
}
