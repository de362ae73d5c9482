use std::collections::HashMap;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use thiserror::Error;

use crate::event::AppEvent;
use crate::focus::{self, request_focus, Focus, FocusChange, PaneId, Registry, View};
use crate::keymap::KeyMap;
use crate::panes::{Overlay, Pane};
use crate::theme::Theme;
use crate::ui::{self, ScreenLayout};

pub const DEFAULT_SIDEBAR_WIDTH: u16 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComposeError {
    #[error("no pane instance for {0}")]
    MissingPane(Focus),
    #[error("more than one pane instance for {0}")]
    DuplicatePane(Focus),
    #[error("pane instance for {0} is not in the registry")]
    UnknownPane(Focus),
}

/// Result of handling one event.
#[derive(Debug, Default)]
pub struct Dispatch {
    pub follow_ups: Vec<AppEvent>,
    pub quit: bool,
}

impl Dispatch {
    fn quit() -> Self {
        Self {
            follow_ups: Vec::new(),
            quit: true,
        }
    }

    fn events(follow_ups: Vec<AppEvent>) -> Self {
        Self {
            follow_ups,
            quit: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Navigation {
    NextPane,
    PrevPane,
    NextView,
    PrevView,
}

/// Owns the active focus and every pane, and routes events between them.
pub struct Dispatcher {
    registry: Registry,
    keys: KeyMap,
    theme: Theme,
    active: Focus,
    panes: Vec<Box<dyn Pane>>,
    lookup: HashMap<Focus, usize>,
    help: Box<dyn Overlay>,
    notifications: Box<dyn Overlay>,
    sidebar_width: u16,
}

impl Dispatcher {
    pub fn new(
        registry: Registry,
        keys: KeyMap,
        theme: Theme,
        panes: Vec<Box<dyn Pane>>,
        help: Box<dyn Overlay>,
        notifications: Box<dyn Overlay>,
    ) -> Result<Self, ComposeError> {
        let mut lookup = HashMap::with_capacity(panes.len());
        for (index, pane) in panes.iter().enumerate() {
            let target = pane.target();
            if !registry.contains(target) {
                return Err(ComposeError::UnknownPane(target));
            }
            if lookup.insert(target, index).is_some() {
                return Err(ComposeError::DuplicatePane(target));
            }
        }
        if let Some(missing) = registry.targets().find(|t| !lookup.contains_key(t)) {
            return Err(ComposeError::MissingPane(missing));
        }

        let active = registry.initial_focus();
        Ok(Self {
            registry,
            keys,
            theme,
            active,
            panes,
            lookup,
            help,
            notifications,
            sidebar_width: DEFAULT_SIDEBAR_WIDTH,
        })
    }

    pub fn with_sidebar_width(mut self, width: u16) -> Self {
        self.sidebar_width = width;
        self
    }

    #[cfg(test)]
    pub fn active(&self) -> Focus {
        self.active
    }

    /// Tells the initial pane and the help overlay that they hold focus.
    pub fn start(&mut self) -> Vec<AppEvent> {
        let Some(change) = request_focus(&self.registry, self.active, self.active) else {
            return Vec::new();
        };
        tracing::debug!(focus = %self.active, "dispatcher started");
        self.deliver(change)
    }

    pub fn dispatch(&mut self, event: AppEvent) -> Dispatch {
        match &event {
            AppEvent::Interrupt => {
                tracing::info!("interrupted");
                return Dispatch::quit();
            }
            AppEvent::Key(key) => {
                if self.keys.quit.matches(key) {
                    tracing::info!("quit requested");
                    return Dispatch::quit();
                }
                if let Some(nav) = self.navigation(key) {
                    return Dispatch::events(self.navigate(nav));
                }
                if self.notifications.captures(key) {
                    return Dispatch::events(self.notifications.update(&event));
                }
            }
            AppEvent::FocusRequested(target) => {
                let target = *target;
                return Dispatch::events(self.transition(target));
            }
            AppEvent::FocusChanged(change) => {
                tracing::warn!(
                    focus = %change.focused(),
                    "dropping focus change that did not come from a transition"
                );
                return Dispatch::default();
            }
            AppEvent::Error(message) => {
                tracing::error!(error = %message, "error event");
            }
            _ => {}
        }

        tracing::trace!(event = event.name(), "fan out");
        Dispatch::events(self.broadcast(&event))
    }

    fn navigation(&self, key: &KeyEvent) -> Option<Navigation> {
        if self.keys.next_pane.matches(key) {
            Some(Navigation::NextPane)
        } else if self.keys.prev_pane.matches(key) {
            Some(Navigation::PrevPane)
        } else if self.keys.next_view.is_some_and(|b| b.matches(key)) {
            Some(Navigation::NextView)
        } else if self.keys.prev_view.is_some_and(|b| b.matches(key)) {
            Some(Navigation::PrevView)
        } else {
            None
        }
    }

    fn navigate(&mut self, nav: Navigation) -> Vec<AppEvent> {
        let Focus { view, pane } = self.active;
        let candidate = match nav {
            Navigation::NextPane => focus::next_pane(&self.registry, view, pane)
                .map(|pane| Focus::new(view, pane)),
            Navigation::PrevPane => focus::prev_pane(&self.registry, view, pane)
                .map(|pane| Focus::new(view, pane)),
            Navigation::NextView => focus::next_view(&self.registry, view)
                .and_then(|view| self.entry_point(view)),
            Navigation::PrevView => focus::prev_view(&self.registry, view)
                .and_then(|view| self.entry_point(view)),
        };

        match candidate {
            Some(target) => self.transition(target),
            None => Vec::new(),
        }
    }

    /// Views are always entered at their first pane.
    fn entry_point(&self, view: View) -> Option<Focus> {
        self.registry
            .first_pane(view)
            .map(|pane| Focus::new(view, pane))
    }

    fn transition(&mut self, target: Focus) -> Vec<AppEvent> {
        if target == self.active {
            return Vec::new();
        }
        let Some(change) = request_focus(&self.registry, target, self.active) else {
            return Vec::new();
        };
        self.active = change.focused();
        tracing::debug!(from = %change.previous(), to = %change.focused(), "focus changed");
        self.deliver(change)
    }

    /// Sends a focus change to exactly the panes it names and the help overlay.
    fn deliver(&mut self, change: FocusChange) -> Vec<AppEvent> {
        let event = AppEvent::FocusChanged(change);
        let mut follow_ups = Vec::new();

        let mut recipients = vec![change.focused()];
        if change.previous() != change.focused() {
            recipients.push(change.previous());
        }
        for target in recipients {
            if let Some(&index) = self.lookup.get(&target) {
                follow_ups.extend(self.panes[index].update(&event));
            }
        }
        follow_ups.extend(self.help.update(&event));
        follow_ups
    }

    fn broadcast(&mut self, event: &AppEvent) -> Vec<AppEvent> {
        let mut follow_ups = self.help.update(event);
        follow_ups.extend(self.notifications.update(event));
        for target in self.registry.targets() {
            if let Some(&index) = self.lookup.get(&target) {
                follow_ups.extend(self.panes[index].update(event));
            }
        }
        follow_ups
    }

    fn visible_panes(&self) -> Vec<(PaneId, usize)> {
        let view = self.active.view;
        self.registry
            .panes(view)
            .iter()
            .filter_map(|pane| {
                self.lookup
                    .get(&Focus::new(view, *pane))
                    .map(|&index| (*pane, index))
            })
            .collect()
    }

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer = self.help.height().min(area.height.saturating_sub(2));
        let layout = ScreenLayout::new(area, footer);

        ui::render_tabs(frame, layout.tabs, &self.registry, self.active.view, &self.theme);

        let visible = self.visible_panes();
        let areas = ui::pane_areas(layout.main, visible.len(), self.sidebar_width);
        for ((_, index), rect) in visible.iter().zip(areas) {
            if rect.width < 3 || rect.height < 3 {
                ui::render_collapsed(frame, rect, &self.theme);
                continue;
            }
            self.panes[*index].render(frame, rect);
        }

        if layout.footer.height > 0 {
            self.help.render(frame, layout.footer);
        }
        self.notifications.render(frame, area);
    }
}
