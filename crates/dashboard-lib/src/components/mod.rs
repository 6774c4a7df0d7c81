//! View components
//!
//! Each component pairs a connector (`map_state_to_props`) that projects the
//! store snapshot into props with a presentational part that turns props
//! into a renderer-agnostic view tree.

pub mod search;
pub mod section;
pub mod utilization_panel;

pub use search::{ButtonStyle, Key, SearchDropdown, SearchProps, SearchView};
pub use section::{CollapsibleSection, SectionToggles};
pub use utilization_panel::{PanelBody, UsageInfo, UsageView, UtilizationPanelProps};
