mod layout;

pub use layout::{pane_areas, ScreenLayout};

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Tabs},
    Frame,
};

use crate::focus::{Registry, View};
use crate::theme::Theme;

pub fn render_tabs(frame: &mut Frame, area: Rect, registry: &Registry, active: View, theme: &Theme) {
    let titles: Vec<Line> = registry
        .views()
        .map(|view| Line::from(Span::raw(view.title())))
        .collect();
    let selected = registry.views().position(|view| view == active);

    let tabs = Tabs::new(titles)
        .style(theme.muted())
        .highlight_style(theme.title())
        .select(selected.unwrap_or(0))
        .divider(" | ");
    frame.render_widget(tabs, area);
}

/// Placeholder for a registered pane whose area is too small to draw into.
pub fn render_collapsed(frame: &mut Frame, area: Rect, theme: &Theme) {
    frame.render_widget(Paragraph::new("…").style(theme.muted()), area);
}
