use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use thiserror::Error;

use crate::focus::{Focus, PaneId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    #[error("empty key binding")]
    Empty,
    #[error("unknown modifier '{0}'")]
    UnknownModifier(String),
    #[error("unknown key '{0}'")]
    UnknownKey(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        if key.code != self.code {
            return false;
        }
        // Terminals report shift inconsistently on BackTab and shifted chars.
        let relevant = match key.code {
            KeyCode::BackTab | KeyCode::Char(_) => !KeyModifiers::SHIFT,
            _ => KeyModifiers::all(),
        };
        (key.modifiers & relevant) == (self.modifiers & relevant)
    }
}

fn parse_code(name: &str) -> Result<KeyCode, KeyParseError> {
    let lower = name.to_ascii_lowercase();
    let code = match lower.as_str() {
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "space" => KeyCode::Char(' '),
        "backspace" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "insert" => KeyCode::Insert,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" | "pgup" => KeyCode::PageUp,
        "pagedown" | "pgdown" => KeyCode::PageDown,
        _ => {
            if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                if (1..=12).contains(&n) {
                    return Ok(KeyCode::F(n));
                }
            }
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return Err(KeyParseError::UnknownKey(name.to_string())),
            }
        }
    };
    Ok(code)
}

impl FromStr for KeyBinding {
    type Err = KeyParseError;

    /// Parses `ctrl+q`, `shift+tab`, `alt+right`, `f1`, `?` and friends.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(KeyParseError::Empty);
        }
        // A lone '+' is the key itself, not a separator.
        let (mods, key) = match s.rsplit_once('+') {
            Some((mods, "")) => (mods.strip_suffix('+').unwrap_or(mods), "+"),
            Some((mods, key)) => (mods, key),
            None => ("", s),
        };

        let mut modifiers = KeyModifiers::NONE;
        for part in mods.split('+').filter(|p| !p.is_empty()) {
            modifiers |= match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => KeyModifiers::CONTROL,
                "alt" | "meta" => KeyModifiers::ALT,
                "shift" => KeyModifiers::SHIFT,
                _ => return Err(KeyParseError::UnknownModifier(part.to_string())),
            };
        }

        let mut code = parse_code(key)?;
        if code == KeyCode::Tab && modifiers.contains(KeyModifiers::SHIFT) {
            code = KeyCode::BackTab;
        }
        if code == KeyCode::BackTab {
            modifiers |= KeyModifiers::SHIFT;
        }
        Ok(Self { code, modifiers })
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.code == KeyCode::BackTab {
            return f.write_str("shift+tab");
        }
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            f.write_str("ctrl+")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            f.write_str("alt+")?;
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            f.write_str("shift+")?;
        }
        match self.code {
            KeyCode::Tab => f.write_str("tab"),
            KeyCode::Enter => f.write_str("enter"),
            KeyCode::Esc => f.write_str("esc"),
            KeyCode::Char(' ') => f.write_str("space"),
            KeyCode::Char(c) => write!(f, "{}", c),
            KeyCode::F(n) => write!(f, "f{}", n),
            KeyCode::Up => f.write_str("up"),
            KeyCode::Down => f.write_str("down"),
            KeyCode::Left => f.write_str("left"),
            KeyCode::Right => f.write_str("right"),
            KeyCode::PageUp => f.write_str("pgup"),
            KeyCode::PageDown => f.write_str("pgdown"),
            KeyCode::Home => f.write_str("home"),
            KeyCode::End => f.write_str("end"),
            KeyCode::Backspace => f.write_str("backspace"),
            KeyCode::Delete => f.write_str("del"),
            other => write!(f, "{:?}", other),
        }
    }
}

/// One row of the help overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpEntry {
    pub keys: String,
    pub desc: &'static str,
}

impl HelpEntry {
    fn new(keys: impl Into<String>, desc: &'static str) -> Self {
        Self {
            keys: keys.into(),
            desc,
        }
    }
}

/// Bindings the dispatcher and overlays react to. View switching is only
/// active when a binding is configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    pub quit: KeyBinding,
    pub next_pane: KeyBinding,
    pub prev_pane: KeyBinding,
    pub next_view: Option<KeyBinding>,
    pub prev_view: Option<KeyBinding>,
    pub help: KeyBinding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            quit: KeyBinding::new(KeyCode::Char('q'), KeyModifiers::CONTROL),
            next_pane: KeyBinding::plain(KeyCode::Tab),
            prev_pane: KeyBinding::new(KeyCode::BackTab, KeyModifiers::SHIFT),
            next_view: None,
            prev_view: None,
            help: KeyBinding::plain(KeyCode::F(1)),
        }
    }
}

impl KeyMap {
    fn global_help(&self) -> Vec<HelpEntry> {
        let mut entries = vec![
            HelpEntry::new(self.next_pane.to_string(), "next pane"),
            HelpEntry::new(self.prev_pane.to_string(), "previous pane"),
        ];
        if let Some(key) = self.next_view {
            entries.push(HelpEntry::new(key.to_string(), "next view"));
        }
        if let Some(key) = self.prev_view {
            entries.push(HelpEntry::new(key.to_string(), "previous view"));
        }
        entries.push(HelpEntry::new(self.help.to_string(), "help"));
        entries.push(HelpEntry::new(self.quit.to_string(), "quit"));
        entries
    }

    /// Pane-specific bindings first, then the global ones.
    pub fn help_for(&self, focus: Focus) -> Vec<HelpEntry> {
        let mut entries = match focus.pane {
            PaneId::Requests => vec![
                HelpEntry::new("j/k", "move"),
                HelpEntry::new("enter", "open"),
                HelpEntry::new("r", "reload"),
            ],
            PaneId::Editor => vec![
                HelpEntry::new("enter", "url -> body"),
                HelpEntry::new("esc", "body -> url"),
            ],
            PaneId::Response => vec![
                HelpEntry::new("j/k", "scroll"),
                HelpEntry::new("pgup/pgdown", "page"),
            ],
            PaneId::Environments => vec![
                HelpEntry::new("j/k", "move"),
                HelpEntry::new("enter", "select"),
                HelpEntry::new("r", "reload"),
            ],
            PaneId::EnvEditor => vec![HelpEntry::new("type", "edit variables")],
        };
        entries.extend(self.global_help());
        entries
    }
}
