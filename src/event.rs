use std::fmt;

use crossterm::event::KeyEvent;
use tokio::sync::mpsc::{self, error::TryRecvError};

use crate::focus::{Focus, FocusChange};
use crate::storage::{Environment, Group, Request};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Level::Info => "info",
            Level::Warn => "warning",
            Level::Error => "error",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: Level,
}

impl Notification {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    Requests,
    Environments,
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataKind::Requests => f.write_str("requests"),
            DataKind::Environments => f.write_str("environments"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Loaded {
    Requests(Vec<Group>),
    Environments(Vec<Environment>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize { width: u16, height: u16 },
    /// An accepted focus transition. Only the dispatcher produces these.
    FocusChanged(FocusChange),
    /// A pane asking for focus to move; validated before it takes effect.
    FocusRequested(Focus),
    Loaded(Loaded),
    Reload(DataKind),
    RequestSelected(Request),
    EnvironmentSelected(Environment),
    Notify(Notification),
    Error(String),
    /// External interrupt; ends the run loop.
    Interrupt,
}

impl AppEvent {
    pub fn name(&self) -> &'static str {
        match self {
            AppEvent::Key(_) => "key",
            AppEvent::Resize { .. } => "resize",
            AppEvent::FocusChanged(_) => "focus_changed",
            AppEvent::FocusRequested(_) => "focus_requested",
            AppEvent::Loaded(_) => "loaded",
            AppEvent::Reload(_) => "reload",
            AppEvent::RequestSelected(_) => "request_selected",
            AppEvent::EnvironmentSelected(_) => "environment_selected",
            AppEvent::Notify(_) => "notify",
            AppEvent::Error(_) => "error",
            AppEvent::Interrupt => "interrupt",
        }
    }
}

pub type EventSender = mpsc::UnboundedSender<AppEvent>;

/// Single-consumer event queue. Producers hold [`EventSender`] clones.
pub struct EventQueue {
    tx: EventSender,
    rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    pub fn sender(&self) -> EventSender {
        self.tx.clone()
    }

    pub fn push(&self, event: AppEvent) {
        // The receiver lives in `self`, so the channel cannot be closed here.
        let _ = self.tx.send(event);
    }

    pub fn extend(&self, events: impl IntoIterator<Item = AppEvent>) {
        for event in events {
            self.push(event);
        }
    }

    pub fn try_next(&mut self) -> Option<AppEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Stops accepting events; pending ones can still be drained. Background
    /// producers see their sender closed and stop.
    pub fn close(&mut self) {
        self.rx.close();
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_is_fifo() {
        let mut queue = EventQueue::new();
        queue.push(AppEvent::Resize {
            width: 1,
            height: 1,
        });
        queue.extend([AppEvent::Interrupt, AppEvent::Error("x".into())]);

        assert_eq!(queue.try_next().map(|e| e.name()), Some("resize"));
        assert_eq!(queue.try_next().map(|e| e.name()), Some("interrupt"));
        assert_eq!(queue.try_next().map(|e| e.name()), Some("error"));
        assert!(queue.try_next().is_none());
    }

    #[test]
    fn test_external_senders_feed_same_queue() {
        let mut queue = EventQueue::new();
        let sender = queue.sender();
        sender.send(AppEvent::Reload(DataKind::Requests)).unwrap();
        assert_eq!(
            queue.try_next(),
            Some(AppEvent::Reload(DataKind::Requests))
        );
    }

    #[test]
    fn test_close_stops_producers() {
        let mut queue = EventQueue::new();
        let sender = queue.sender();
        queue.close();
        assert!(sender.is_closed());
        assert!(sender.send(AppEvent::Interrupt).is_err());
    }
}
