use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use super::{focus_flag, list_move, pane_block, ListMove, Pane};
use crate::event::{AppEvent, DataKind, Level, Loaded, Notification};
use crate::focus::{Focus, PaneId, View};
use crate::storage::{find_by_name, Environment};
use crate::theme::Theme;

const TARGET: Focus = Focus::new(View::Environment, PaneId::Environments);
const ENV_EDITOR: Focus = Focus::new(View::Environment, PaneId::EnvEditor);

pub struct EnvironmentList {
    theme: Theme,
    focused: bool,
    loading: bool,
    default_env: Option<String>,
    environments: Vec<Environment>,
    active: Option<String>,
    state: ListState,
}

impl EnvironmentList {
    pub fn new(theme: Theme, default_env: Option<String>) -> Self {
        Self {
            theme,
            focused: false,
            loading: true,
            default_env: default_env.filter(|name| !name.trim().is_empty()),
            environments: Vec::new(),
            active: None,
            state: ListState::default(),
        }
    }

    #[cfg(test)]
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Replaces the list. The previously active environment survives a reload;
    /// otherwise the configured default is picked.
    fn set_environments(&mut self, environments: Vec<Environment>) -> Vec<AppEvent> {
        self.loading = false;
        self.environments = environments;

        let wanted = self.active.clone().or_else(|| self.default_env.clone());
        let chosen = wanted
            .as_deref()
            .and_then(|name| find_by_name(&self.environments, name))
            .cloned();

        let index = chosen
            .as_ref()
            .and_then(|env| self.environments.iter().position(|e| e.name == env.name))
            .or(if self.environments.is_empty() { None } else { Some(0) });
        self.state.select(index);

        match chosen {
            Some(env) => {
                tracing::debug!(environment = %env.name, "environment activated on load");
                self.active = Some(env.name.clone());
                vec![AppEvent::EnvironmentSelected(env)]
            }
            None => {
                self.active = None;
                let Some(name) = wanted else {
                    return Vec::new();
                };
                tracing::warn!(environment = %name, "configured environment not found");
                vec![AppEvent::Notify(Notification::new(
                    Level::Warn,
                    format!("environment '{}' not found", name),
                ))]
            }
        }
    }

    fn move_cursor(&mut self, movement: ListMove) {
        if self.environments.is_empty() {
            return;
        }
        let last = self.environments.len() - 1;
        let current = self.state.selected().unwrap_or(0);
        let next = match movement {
            ListMove::Up | ListMove::PageUp => current.saturating_sub(1),
            ListMove::Down | ListMove::PageDown => (current + 1).min(last),
        };
        self.state.select(Some(next));
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Vec<AppEvent> {
        if let Some(movement) = list_move(key) {
            self.move_cursor(movement);
            return Vec::new();
        }
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return Vec::new();
        }
        match key.code {
            KeyCode::Enter => {
                let Some(env) = self
                    .state
                    .selected()
                    .and_then(|i| self.environments.get(i))
                    .cloned()
                else {
                    return Vec::new();
                };
                self.active = Some(env.name.clone());
                vec![
                    AppEvent::EnvironmentSelected(env),
                    AppEvent::FocusRequested(ENV_EDITOR),
                ]
            }
            KeyCode::Char('r') => {
                self.loading = true;
                vec![AppEvent::Reload(DataKind::Environments)]
            }
            _ => Vec::new(),
        }
    }
}

impl Pane for EnvironmentList {
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
            AppEvent::Loaded(Loaded::Environments(envs)) => self.set_environments(envs.clone()),
            AppEvent::Error(_) => {
                self.loading = false;
                Vec::new()
            }
            AppEvent::Key(key) if self.focused => self.handle_key(key),
            _ => Vec::new(),
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = pane_block("Environments", self.focused, &self.theme);
        if self.environments.is_empty() {
            let text = if self.loading {
                "loading..."
            } else {
                "no environments"
            };
            frame.render_widget(
                Paragraph::new(text).style(self.theme.muted()).block(block),
                area,
            );
            return;
        }

        let items: Vec<ListItem> = self
            .environments
            .iter()
            .map(|env| {
                let marker = if self.active.as_deref() == Some(env.name.as_str()) {
                    "* "
                } else {
                    "  "
                };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, self.theme.title()),
                    Span::styled(env.name.clone(), self.theme.text()),
                    Span::styled(format!(" ({})", env.variables.len()), self.theme.muted()),
                ]))
            })
            .collect();
        let mut list = List::new(items).block(block);
        if self.focused {
            list = list.highlight_style(self.theme.highlight());
        }
        let mut state = self.state.clone();
        frame.render_stateful_widget(list, area, &mut state);
    }
}
