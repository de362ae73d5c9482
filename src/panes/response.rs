use std::cell::Cell;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use super::{focus_flag, list_move, pane_block, ListMove, Pane};
use crate::event::AppEvent;
use crate::focus::{Focus, PaneId, View};
use crate::storage::{Request, RequestData};
use crate::theme::Theme;

const TARGET: Focus = Focus::new(View::Client, PaneId::Response);

/// Read-only view of the response stored with the selected request.
pub struct ResponseViewer {
    theme: Theme,
    focused: bool,
    response: Option<RequestData>,
    scroll: u16,
    /// Body rows visible at the last render.
    page: Cell<u16>,
}

impl ResponseViewer {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            focused: false,
            response: None,
            scroll: 0,
            page: Cell::new(10),
        }
    }

    #[cfg(test)]
    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    fn line_count(&self) -> u16 {
        let count = self.lines().len();
        u16::try_from(count).unwrap_or(u16::MAX)
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let Some(response) = &self.response else {
            return vec![Line::styled("no response", self.theme.muted())];
        };

        let mut lines = Vec::new();
        let proto = if response.proto.is_empty() {
            "HTTP/1.1"
        } else {
            response.proto.as_str()
        };
        let mut status = vec![Span::styled(proto.to_string(), self.theme.title())];
        if !response.method.is_empty() {
            status.push(Span::raw(format!(" {}", response.method)));
        }
        if !response.url.is_empty() {
            status.push(Span::styled(format!(" {}", response.url), self.theme.muted()));
        }
        lines.push(Line::from(status));

        for header in response.header_lines() {
            lines.push(Line::styled(header, self.theme.muted()));
        }
        lines.push(Line::raw(""));
        lines.extend(response.body.lines().map(|l| Line::raw(l.to_string())));
        lines
    }

    fn select(&mut self, request: &Request) {
        self.response = request.response().cloned();
        self.scroll = 0;
    }

    fn move_scroll(&mut self, movement: ListMove) {
        let max = self.line_count().saturating_sub(1);
        self.scroll = match movement {
            ListMove::Up => self.scroll.saturating_sub(1),
            ListMove::Down => self.scroll.saturating_add(1),
            ListMove::PageUp => self.scroll.saturating_sub(self.page.get()),
            ListMove::PageDown => self.scroll.saturating_add(self.page.get()),
        }
        .min(max);
    }
}

impl Pane for ResponseViewer {
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
            AppEvent::RequestSelected(request) => self.select(request),
            AppEvent::Key(key) if self.focused => {
                if let Some(movement) = list_move(key) {
                    self.move_scroll(movement);
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        self.page.set(area.height.saturating_sub(2).max(1));
        let paragraph = Paragraph::new(self.lines())
            .style(self.theme.text())
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .block(pane_block("Response", self.focused, &self.theme));
        frame.render_widget(paragraph, area);
    }
}
