use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::Overlay;
use crate::event::AppEvent;
use crate::focus::Focus;
use crate::keymap::{HelpEntry, KeyMap};
use crate::theme::Theme;

const SEPARATOR: &str = " • ";

/// Key bindings for the focused pane. Collapsed to one line unless expanded.
pub struct HelpOverlay {
    theme: Theme,
    keys: KeyMap,
    entries: Vec<HelpEntry>,
    expanded: bool,
}

impl HelpOverlay {
    pub fn new(theme: Theme, keys: KeyMap, initial: Focus) -> Self {
        let entries = keys.help_for(initial);
        Self {
            theme,
            keys,
            entries,
            expanded: false,
        }
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[HelpEntry] {
        &self.entries
    }

    #[cfg(test)]
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    fn short_line(&self) -> Line<'static> {
        let mut spans = Vec::with_capacity(self.entries.len() * 3);
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(SEPARATOR, self.theme.muted()));
            }
            spans.push(Span::styled(entry.keys.clone(), self.theme.title()));
            spans.push(Span::styled(format!(" {}", entry.desc), self.theme.muted()));
        }
        Line::from(spans)
    }

    fn full_lines(&self) -> Vec<Line<'static>> {
        let width = self
            .entries
            .iter()
            .map(|e| e.keys.width())
            .max()
            .unwrap_or(0);
        self.entries
            .iter()
            .map(|entry| {
                let pad = width - entry.keys.width();
                Line::from(vec![
                    Span::styled(
                        format!("{}{}", entry.keys, " ".repeat(pad)),
                        self.theme.title(),
                    ),
                    Span::styled(format!("  {}", entry.desc), self.theme.muted()),
                ])
            })
            .collect()
    }
}

impl Overlay for HelpOverlay {
    fn update(&mut self, event: &AppEvent) -> Vec<AppEvent> {
        match event {
            AppEvent::FocusChanged(change) => {
                self.entries = self.keys.help_for(change.focused());
                tracing::debug!(focus = %change.focused(), "help bindings updated");
            }
            AppEvent::Key(key) if self.keys.help.matches(key) => {
                self.expanded = !self.expanded;
            }
            _ => {}
        }
        Vec::new()
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let paragraph = if self.expanded {
            Paragraph::new(self.full_lines())
        } else {
            Paragraph::new(self.short_line()).wrap(Wrap { trim: true })
        };
        frame.render_widget(paragraph, area);
    }

    fn height(&self) -> u16 {
        if self.expanded {
            u16::try_from(self.entries.len()).unwrap_or(u16::MAX)
        } else {
            1
        }
    }
}
