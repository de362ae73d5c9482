mod editor;
mod env_editor;
mod environments;
mod help;
mod notification;
mod requests;
mod response;

pub use editor::RequestEditor;
pub use env_editor::EnvEditor;
pub use environments::EnvironmentList;
pub use help::HelpOverlay;
pub use notification::NotificationOverlay;
pub use requests::RequestList;
pub use response::ResponseViewer;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    widgets::{Block, BorderType, Borders},
    Frame,
};

use crate::event::AppEvent;
use crate::focus::{Focus, FocusChange};
use crate::theme::Theme;

/// A focusable region owned by the dispatcher.
pub trait Pane {
    /// The (view, pane) pair this instance stands for.
    fn target(&self) -> Focus;

    /// Reacts to an event and returns follow-up events for the queue.
    fn update(&mut self, event: &AppEvent) -> Vec<AppEvent>;

    fn render(&self, frame: &mut Frame, area: Rect);
}

/// A component drawn over the panes that has no focus identity of its own.
pub trait Overlay {
    fn update(&mut self, event: &AppEvent) -> Vec<AppEvent>;

    fn render(&self, frame: &mut Frame, area: Rect);

    /// Rows the overlay wants at the bottom of the screen. Zero for popups.
    fn height(&self) -> u16 {
        0
    }

    /// Whether `key` is meant for this overlay alone and must not reach the panes.
    fn captures(&self, _key: &KeyEvent) -> bool {
        false
    }
}

/// New focus flag for `target`, or `None` when the change does not concern it.
pub(crate) fn focus_flag(change: &FocusChange, target: Focus) -> Option<bool> {
    change
        .affects(target)
        .then(|| change.is_focused(target))
}

pub(crate) fn bordered<'a>(focused: bool, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_style(focused))
        .title_style(theme.title())
}

pub(crate) fn pane_block<'a>(title: impl Into<String>, focused: bool, theme: &Theme) -> Block<'a> {
    bordered(focused, theme).title(title.into())
}

/// Cursor movement shared by the list-like panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListMove {
    Up,
    Down,
    PageUp,
    PageDown,
}

pub(crate) fn list_move(key: &KeyEvent) -> Option<ListMove> {
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return None;
    }
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(ListMove::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(ListMove::Down),
        KeyCode::PageUp => Some(ListMove::PageUp),
        KeyCode::PageDown => Some(ListMove::PageDown),
        _ => None,
    }
}
