use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_textarea::TextArea;

use super::{bordered, focus_flag, pane_block, Pane};
use crate::event::AppEvent;
use crate::focus::{Focus, PaneId, View};
use crate::storage::Request;
use crate::theme::Theme;

const TARGET: Focus = Focus::new(View::Client, PaneId::Editor);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Url,
    Body,
}

/// URL and body inputs for the selected request.
pub struct RequestEditor {
    theme: Theme,
    focused: bool,
    field: Field,
    name: Option<String>,
    method: String,
    url: TextArea<'static>,
    body: TextArea<'static>,
    url_error: Option<String>,
}

fn single_line(text: &str) -> String {
    text.lines().next().unwrap_or("").to_string()
}

pub fn validate_url(text: &str) -> Result<(), String> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(());
    }
    url::Url::parse(text)
        .map(|_| ())
        .map_err(|e| format!("invalid URL: {}", e))
}

impl RequestEditor {
    pub fn new(theme: Theme) -> Self {
        let mut url = TextArea::default();
        url.set_placeholder_text("URL");
        url.set_cursor_line_style(Style::default());
        let mut body = TextArea::default();
        body.set_placeholder_text("request body");
        body.set_cursor_line_style(Style::default());

        Self {
            theme,
            focused: false,
            field: Field::Url,
            name: None,
            method: "GET".to_string(),
            url,
            body,
            url_error: None,
        }
    }

    pub fn url(&self) -> String {
        self.url.lines().join("")
    }

    #[cfg(test)]
    pub fn body(&self) -> String {
        self.body.lines().join("\n")
    }

    #[cfg(test)]
    pub fn url_error(&self) -> Option<&str> {
        self.url_error.as_deref()
    }

    fn load(&mut self, request: &Request) {
        let data = request.data.clone().unwrap_or_default();
        self.name = Some(request.name.clone());
        self.method = data.method_or_default().to_uppercase();
        self.url = TextArea::new(vec![single_line(&data.url)]);
        self.url.set_placeholder_text("URL");
        self.url.set_cursor_line_style(Style::default());
        self.body = TextArea::new(data.body.lines().map(str::to_string).collect());
        self.body.set_placeholder_text("request body");
        self.body.set_cursor_line_style(Style::default());
        self.field = Field::Url;
        self.revalidate();
    }

    fn revalidate(&mut self) {
        self.url_error = validate_url(&self.url()).err();
    }

    fn handle_key(&mut self, key: &KeyEvent) {
        match (self.field, key.code) {
            (Field::Url, KeyCode::Enter) => self.field = Field::Body,
            (Field::Body, KeyCode::Esc) => self.field = Field::Url,
            (Field::Url, _) => {
                self.url.input(*key);
                self.revalidate();
            }
            (Field::Body, _) => {
                self.body.input(*key);
            }
        }
    }

    fn url_title(&self) -> Line<'static> {
        match &self.url_error {
            Some(err) => Line::from(vec![
                Span::raw("URL "),
                Span::styled(err.clone(), Style::default().fg(self.theme.error)),
            ]),
            None => Line::from("URL"),
        }
    }
}

impl Pane for RequestEditor {
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
            AppEvent::RequestSelected(request) => self.load(request),
            AppEvent::Key(key) if self.focused => self.handle_key(key),
            _ => {}
        }
        Vec::new()
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = match &self.name {
            Some(name) => format!("Editor: {}", name),
            None => "Editor".to_string(),
        };
        let block = pane_block(title, self.focused, &self.theme);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).split(inner);
        let input_row =
            Layout::horizontal([Constraint::Length(9), Constraint::Min(1)]).split(chunks[0]);

        let method = Paragraph::new(self.method.clone())
            .style(self.theme.title())
            .block(pane_block("Method", false, &self.theme));
        frame.render_widget(method, input_row[0]);

        let mut url = self.url.clone();
        url.set_block(
            bordered(self.focused && self.field == Field::Url, &self.theme).title(self.url_title()),
        );
        frame.render_widget(&url, input_row[1]);

        let mut body = self.body.clone();
        body.set_block(pane_block(
            "Body",
            self.focused && self.field == Field::Body,
            &self.theme,
        ));
        frame.render_widget(&body, chunks[1]);
    }
}
