mod navigator;
mod registry;
mod transition;

pub use navigator::{next_pane, next_view, prev_pane, prev_view};
pub use registry::{Focus, PaneId, Registry, RegistryError, View};
pub use transition::{request_focus, FocusChange};
