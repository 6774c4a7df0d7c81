//! Collapsible section container

use serde::Serialize;
use std::collections::HashSet;

/// Titled container around a component body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollapsibleSection<T> {
    pub id: &'static str,
    pub title: &'static str,
    pub subtitle: String,
    pub body: T,
}

/// Open/closed state for sections, owned outside the wrapped content.
///
/// Sections start expanded.
#[derive(Debug, Clone, Default)]
pub struct SectionToggles {
    collapsed: HashSet<String>,
}

impl SectionToggles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        !self.collapsed.contains(id)
    }

    /// Flip a section, returning whether it is now expanded
    pub fn toggle(&mut self, id: &str) -> bool {
        if !self.collapsed.remove(id) {
            self.collapsed.insert(id.to_string());
            false
        } else {
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_start_expanded_and_toggle() {
        let mut toggles = SectionToggles::new();
        assert!(toggles.is_expanded("request-utilization"));

        assert!(!toggles.toggle("request-utilization"));
        assert!(!toggles.is_expanded("request-utilization"));
        assert!(toggles.is_expanded("other"));

        assert!(toggles.toggle("request-utilization"));
        assert!(toggles.is_expanded("request-utilization"));
    }
}
