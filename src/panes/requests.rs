use std::cell::Cell;
use std::collections::HashSet;

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{List, ListItem, ListState},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::{focus_flag, list_move, pane_block, ListMove, Pane};
use crate::event::{AppEvent, DataKind, Level, Loaded, Notification};
use crate::focus::{Focus, PaneId, View};
use crate::storage::Group;
use crate::theme::Theme;

const TARGET: Focus = Focus::new(View::Client, PaneId::Requests);
const EDITOR: Focus = Focus::new(View::Client, PaneId::Editor);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Row {
    Group(usize),
    Request { group: usize, request: usize },
}

/// Saved requests. Requests of the unsorted group are listed flat; every other
/// group gets a collapsible header.
pub struct RequestList {
    theme: Theme,
    focused: bool,
    loading: bool,
    /// Set by the reload key so the result can be reported back.
    reload_requested: bool,
    groups: Vec<Group>,
    collapsed: HashSet<String>,
    rows: Vec<Row>,
    state: ListState,
    /// Rows visible at the last render.
    page: Cell<usize>,
}

impl RequestList {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            focused: false,
            loading: true,
            reload_requested: false,
            groups: Vec::new(),
            collapsed: HashSet::new(),
            rows: Vec::new(),
            state: ListState::default(),
            page: Cell::new(10),
        }
    }

    #[cfg(test)]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    #[cfg(test)]
    pub fn selected_request(&self) -> Option<&crate::storage::Request> {
        match self.rows.get(self.state.selected()?)? {
            Row::Request { group, request } => self.groups.get(*group)?.requests.get(*request),
            Row::Group(_) => None,
        }
    }

    fn rebuild_rows(&mut self) {
        let selected = self.state.selected().and_then(|i| self.rows.get(i).copied());

        self.rows.clear();
        for (gi, group) in self.groups.iter().enumerate() {
            let flat = group.is_unsorted();
            if !flat {
                self.rows.push(Row::Group(gi));
                if self.collapsed.contains(&group.name) {
                    continue;
                }
            }
            for ri in 0..group.requests.len() {
                self.rows.push(Row::Request {
                    group: gi,
                    request: ri,
                });
            }
        }

        let index = selected
            .and_then(|row| self.rows.iter().position(|r| *r == row))
            .or(if self.rows.is_empty() { None } else { Some(0) });
        self.state.select(index);
    }

    fn set_groups(&mut self, groups: Vec<Group>) -> Vec<AppEvent> {
        self.loading = false;
        self.groups = groups;
        self.collapsed
            .retain(|name| self.groups.iter().any(|g| &g.name == name));
        self.state.select(None);
        self.rebuild_rows();
        tracing::debug!(groups = self.groups.len(), rows = self.rows.len(), "requests loaded");

        if !std::mem::take(&mut self.reload_requested) {
            return Vec::new();
        }
        let count: usize = self.groups.iter().map(|g| g.requests.len()).sum();
        vec![AppEvent::Notify(Notification::new(
            Level::Info,
            format!("reloaded {} requests", count),
        ))]
    }

    fn move_cursor(&mut self, movement: ListMove) {
        if self.rows.is_empty() {
            return;
        }
        let last = self.rows.len() - 1;
        let current = self.state.selected().unwrap_or(0);
        let page = self.page.get();
        let next = match movement {
            ListMove::Up => current.saturating_sub(1),
            ListMove::Down => (current + 1).min(last),
            ListMove::PageUp => current.saturating_sub(page),
            ListMove::PageDown => (current + page).min(last),
        };
        self.state.select(Some(next));
    }

    fn activate(&mut self) -> Vec<AppEvent> {
        let Some(row) = self.state.selected().and_then(|i| self.rows.get(i).copied()) else {
            return Vec::new();
        };
        match row {
            Row::Group(gi) => {
                let name = self.groups[gi].name.clone();
                if !self.collapsed.remove(&name) {
                    self.collapsed.insert(name);
                }
                self.rebuild_rows();
                Vec::new()
            }
            Row::Request { group, request } => {
                let selected = self.groups[group].requests[request].clone();
                vec![
                    AppEvent::RequestSelected(selected),
                    AppEvent::FocusRequested(EDITOR),
                ]
            }
        }
    }

    fn handle_key(&mut self, key: &crossterm::event::KeyEvent) -> Vec<AppEvent> {
        if let Some(movement) = list_move(key) {
            self.move_cursor(movement);
            return Vec::new();
        }
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return Vec::new();
        }
        match key.code {
            KeyCode::Enter => self.activate(),
            KeyCode::Char('r') => {
                self.loading = true;
                self.reload_requested = true;
                vec![AppEvent::Reload(DataKind::Requests)]
            }
            _ => Vec::new(),
        }
    }

    fn row_item(&self, row: Row, width: usize) -> ListItem<'_> {
        match row {
            Row::Group(gi) => {
                let group = &self.groups[gi];
                let marker = if self.collapsed.contains(&group.name) {
                    "+"
                } else {
                    "-"
                };
                let mut spans = vec![Span::styled(
                    format!("{} {}", marker, group.name),
                    self.theme.title(),
                )];
                let used = group.name.width() + 3;
                if !group.desc.is_empty() && used + group.desc.width() < width {
                    spans.push(Span::styled(format!(" {}", group.desc), self.theme.muted()));
                }
                ListItem::new(Line::from(spans))
            }
            Row::Request { group, request } => {
                let req = &self.groups[group].requests[request];
                let indent = if self.groups[group].is_unsorted() { "" } else { "  " };
                let method = req
                    .data
                    .as_ref()
                    .map(|d| d.method_or_default().to_string())
                    .unwrap_or_default();
                ListItem::new(Line::from(vec![
                    Span::raw(indent),
                    Span::styled(format!("{:<7}", method), self.theme.muted()),
                    Span::styled(req.name.clone(), self.theme.text()),
                ]))
            }
        }
    }
}

impl Pane for RequestList {
    fn target(&self) -> Focus {
        TARGET
    }

    fn update(&mut self, event: &AppEvent) -> Vec<AppEvent> {
        match event {
            AppEvent::FocusChanged(change) => {
                if let Some(focused) = focus_flag(change, TARGET) {
                    self.focused = focused;
                }
                Vec::new()
            }
            AppEvent::Loaded(Loaded::Requests(groups)) => self.set_groups(groups.clone()),
            AppEvent::Error(_) => {
                self.loading = false;
                self.reload_requested = false;
                Vec::new()
            }
            AppEvent::Key(key) if self.focused => self.handle_key(key),
            _ => Vec::new(),
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        self.page.set(usize::from(area.height.saturating_sub(2)).max(1));
        let block = pane_block("Requests", self.focused, &self.theme);
        if self.rows.is_empty() {
            let text = if self.loading {
                "loading..."
            } else {
                "no saved requests"
            };
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(
                ratatui::widgets::Paragraph::new(text).style(self.theme.muted()),
                inner,
            );
            return;
        }

        let width = area.width.saturating_sub(2) as usize;
        let items: Vec<ListItem> = self.rows.iter().map(|r| self.row_item(*r, width)).collect();
        let mut list = List::new(items).block(block);
        if self.focused {
            list = list.highlight_style(self.theme.highlight());
        }
        let mut state = self.state.clone();
        frame.render_stateful_widget(list, area, &mut state);
    }
}
