use std::collections::VecDeque;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::Overlay;
use crate::event::{AppEvent, Level, Notification};
use crate::theme::Theme;

const HISTORY: usize = 5;
const MAX_WIDTH: u16 = 60;

/// Non-fatal problems and messages, newest shown as a popup until dismissed.
pub struct NotificationOverlay {
    theme: Theme,
    history: VecDeque<Notification>,
    visible: bool,
}

impl NotificationOverlay {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            history: VecDeque::with_capacity(HISTORY),
            visible: false,
        }
    }

    pub fn current(&self) -> Option<&Notification> {
        if self.visible {
            self.history.back()
        } else {
            None
        }
    }

    #[cfg(test)]
    pub fn history(&self) -> impl Iterator<Item = &Notification> {
        self.history.iter()
    }

    fn push(&mut self, notification: Notification) {
        if self.history.len() == HISTORY {
            self.history.pop_front();
        }
        self.history.push_back(notification);
        self.visible = true;
    }

    fn level_color(&self, level: Level) -> ratatui::style::Color {
        match level {
            Level::Error => self.theme.error,
            Level::Warn => self.theme.warning,
            Level::Info => self.theme.focus,
        }
    }

    /// Bottom-right popup sized to the message.
    fn popup_area(&self, message: &str, area: Rect) -> Rect {
        let width = (message.width() as u16)
            .saturating_add(4)
            .clamp(20, MAX_WIDTH)
            .min(area.width);
        let inner = width.saturating_sub(2).max(1) as usize;
        let rows = (message.width() / inner + 1) as u16;
        let height = rows.saturating_add(2).min(area.height);
        Rect {
            x: area.x + area.width - width,
            y: area.y + area.height - height,
            width,
            height,
        }
    }
}

impl Overlay for NotificationOverlay {
    fn update(&mut self, event: &AppEvent) -> Vec<AppEvent> {
        match event {
            AppEvent::Error(message) => self.push(Notification::new(Level::Error, message.clone())),
            AppEvent::Notify(notification) => self.push(notification.clone()),
            AppEvent::Key(key) if self.captures(key) => {
                self.visible = false;
            }
            _ => {}
        }
        Vec::new()
    }

    /// Esc dismisses a visible popup and goes no further.
    fn captures(&self, key: &KeyEvent) -> bool {
        self.visible && key.code == KeyCode::Esc && key.modifiers.is_empty()
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(notification) = self.current() else {
            return;
        };
        if area.width == 0 || area.height == 0 {
            return;
        }
        let popup = self.popup_area(&notification.message, area);
        let color = self.level_color(notification.level);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(color))
            .title(format!(" {} (esc) ", notification.level));
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(notification.message.clone())
                .style(self.theme.text())
                .wrap(Wrap { trim: true })
                .block(block),
            popup,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panes::testing::{contains, render_lines};
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_error_event_shows_popup() {
        let mut overlay = NotificationOverlay::new(Theme::default());
        assert!(overlay.current().is_none());
        overlay.update(&AppEvent::Error("loading requests: boom".into()));
        let current = overlay.current().unwrap();
        assert_eq!(current.level, Level::Error);
        assert_eq!(current.message, "loading requests: boom");

        let lines = render_lines(60, 10, |frame| overlay.render(frame, frame.area()));
        assert!(contains(&lines, "error (esc)"));
        assert!(contains(&lines, "loading requests: boom"));
    }

    #[test]
    fn test_escape_dismisses() {
        let mut overlay = NotificationOverlay::new(Theme::default());
        overlay.update(&AppEvent::Notify(Notification::new(Level::Info, "saved")));
        overlay.update(&AppEvent::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(overlay.current().is_none());
        assert_eq!(overlay.history().count(), 1);
    }

    #[test]
    fn test_captures_escape_only_while_visible() {
        let mut overlay = NotificationOverlay::new(Theme::default());
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert!(!overlay.captures(&esc));

        overlay.update(&AppEvent::Error("boom".into()));
        assert!(overlay.captures(&esc));
        assert!(!overlay.captures(&KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));

        overlay.update(&AppEvent::Key(esc));
        assert!(!overlay.captures(&esc));
    }

    #[test]
    fn test_history_is_bounded() {
        let mut overlay = NotificationOverlay::new(Theme::default());
        for i in 0..8 {
            overlay.update(&AppEvent::Notify(Notification::new(Level::Warn, format!("n{i}"))));
        }
        let messages: Vec<&str> = overlay.history().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["n3", "n4", "n5", "n6", "n7"]);
        assert_eq!(overlay.current().unwrap().message, "n7");
    }

    #[test]
    fn test_popup_fits_small_area() {
        let mut overlay = NotificationOverlay::new(Theme::default());
        overlay.update(&AppEvent::Error("x".repeat(200)));
        let lines = render_lines(10, 3, |frame| overlay.render(frame, frame.area()));
        assert_eq!(lines.len(), 3);
    }
}
