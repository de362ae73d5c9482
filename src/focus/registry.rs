use std::collections::HashSet;
use std::fmt;

use thiserror::Error;

/// A top-level screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Client,
    Environment,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Client => "client",
            View::Environment => "environment",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            View::Client => "Client",
            View::Environment => "Environments",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A focusable region. Only meaningful paired with the view that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaneId {
    Requests,
    Editor,
    Response,
    Environments,
    EnvEditor,
}

impl PaneId {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaneId::Requests => "requests",
            PaneId::Editor => "editor",
            PaneId::Response => "response",
            PaneId::Environments => "environments",
            PaneId::EnvEditor => "environment_editor",
        }
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Focus {
    pub view: View,
    pub pane: PaneId,
}

impl Focus {
    pub const fn new(view: View, pane: PaneId) -> Self {
        Self { view, pane }
    }
}

impl fmt::Display for Focus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.view, self.pane)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("registry must declare at least one view")]
    NoViews,
    #[error("view {0} declares no panes")]
    EmptyView(View),
    #[error("view {0} is declared more than once")]
    DuplicateView(View),
    #[error("pane {0} is declared more than once")]
    DuplicatePane(PaneId),
}

/// Immutable catalog of views and their panes. Declaration order is tab order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    entries: Vec<(View, Vec<PaneId>)>,
}

impl Registry {
    pub fn new(entries: Vec<(View, Vec<PaneId>)>) -> Result<Self, RegistryError> {
        if entries.is_empty() {
            return Err(RegistryError::NoViews);
        }

        let mut views = HashSet::new();
        let mut panes = HashSet::new();
        for (view, view_panes) in &entries {
            if !views.insert(*view) {
                return Err(RegistryError::DuplicateView(*view));
            }
            if view_panes.is_empty() {
                return Err(RegistryError::EmptyView(*view));
            }
            for pane in view_panes {
                if !panes.insert(*pane) {
                    return Err(RegistryError::DuplicatePane(*pane));
                }
            }
        }

        Ok(Self { entries })
    }

    /// The Client and Environment views in tab order.
    pub fn standard() -> Result<Self, RegistryError> {
        Self::new(vec![
            (
                View::Client,
                vec![PaneId::Requests, PaneId::Editor, PaneId::Response],
            ),
            (View::Environment, vec![PaneId::Environments, PaneId::EnvEditor]),
        ])
    }

    pub fn views(&self) -> impl Iterator<Item = View> + '_ {
        self.entries.iter().map(|(view, _)| *view)
    }

    pub fn view_count(&self) -> usize {
        self.entries.len()
    }

    /// Panes of `view` in tab order. Empty when the view is not registered.
    pub fn panes(&self, view: View) -> &[PaneId] {
        self.entries
            .iter()
            .find(|(v, _)| *v == view)
            .map(|(_, panes)| panes.as_slice())
            .unwrap_or(&[])
    }

    pub fn first_pane(&self, view: View) -> Option<PaneId> {
        self.panes(view).first().copied()
    }

    pub fn contains(&self, focus: Focus) -> bool {
        self.panes(focus.view).contains(&focus.pane)
    }

    /// Every registered (view, pane) pair in declaration order.
    pub fn targets(&self) -> impl Iterator<Item = Focus> + '_ {
        self.entries
            .iter()
            .flat_map(|(view, panes)| panes.iter().map(move |pane| Focus::new(*view, *pane)))
    }

    pub fn initial_focus(&self) -> Focus {
        let (view, panes) = &self.entries[0];
        Focus::new(*view, panes[0])
    }

    pub(crate) fn view_position(&self, view: View) -> Option<usize> {
        self.entries.iter().position(|(v, _)| *v == view)
    }

    pub(crate) fn view_at(&self, index: usize) -> View {
        self.entries[index].0
    }
}
