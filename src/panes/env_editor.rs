use ratatui::{layout::Rect, style::Style, Frame};
use tui_textarea::TextArea;

use super::{focus_flag, pane_block, Pane};
use crate::event::AppEvent;
use crate::focus::{Focus, PaneId, View};
use crate::storage::Environment;
use crate::theme::Theme;

const TARGET: Focus = Focus::new(View::Environment, PaneId::EnvEditor);

/// Variables of the selected environment as editable `key = value` lines.
pub struct EnvEditor {
    theme: Theme,
    focused: bool,
    name: Option<String>,
    original: Vec<String>,
    textarea: TextArea<'static>,
}

fn variables_area(lines: Vec<String>) -> TextArea<'static> {
    let mut textarea = TextArea::new(lines);
    textarea.set_placeholder_text("select an environment");
    textarea.set_cursor_line_style(Style::default());
    textarea
}

impl EnvEditor {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            focused: false,
            name: None,
            original: Vec::new(),
            textarea: variables_area(Vec::new()),
        }
    }

    #[cfg(test)]
    pub fn lines(&self) -> &[String] {
        self.textarea.lines()
    }

    pub fn is_modified(&self) -> bool {
        let lines = self.textarea.lines();
        // An empty textarea still holds one blank line.
        let current: &[String] = if lines.len() == 1 && lines[0].is_empty() {
            &[]
        } else {
            lines
        };
        current != self.original.as_slice()
    }

    fn load(&mut self, env: &Environment) {
        self.name = Some(env.name.clone());
        self.original = env.variable_lines();
        self.textarea = variables_area(self.original.clone());
    }
}

impl Pane for EnvEditor {
    fn target(&self) -> Focus {
        TARGET
    }

    fn update(&mut self, event: &AppEvent) -> Vec<AppEvent> {
        match event {
            AppEvent::FocusChanged(change) => {
                if let Some(focused) = focus_flag(change, TARGET) {
                    self.focused = focused;
                }
            }
            AppEvent::EnvironmentSelected(env) => self.load(env),
            AppEvent::Key(key) if self.focused && self.name.is_some() => {
                self.textarea.input(*key);
            }
            _ => {}
        }
        Vec::new()
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = match (&self.name, self.is_modified()) {
            (Some(name), true) => format!("Variables: {} [modified]", name),
            (Some(name), false) => format!("Variables: {}", name),
            (None, _) => "Variables".to_string(),
        };
        let mut textarea = self.textarea.clone();
        textarea.set_style(self.theme.text());
        textarea.set_block(pane_block(title, self.focused, &self.theme));
        frame.render_widget(&textarea, area);
    }
}
