use ratatui::style::{Color, Modifier, Style};

pub const COLOR_SCHEMES: &[&str] = &["default", "mono"];

/// Resolved colours. Built once from the configuration and handed to every
/// component by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub foreground: Color,
    pub border: Color,
    pub focus: Color,
    pub muted: Color,
    pub error: Color,
    pub warning: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            foreground: Color::White,
            border: Color::White,
            focus: Color::Rgb(0x5f, 0xff, 0xff),
            muted: Color::DarkGray,
            error: Color::Red,
            warning: Color::Yellow,
        }
    }
}

impl Theme {
    pub fn mono() -> Self {
        Self {
            foreground: Color::Reset,
            border: Color::Reset,
            focus: Color::Reset,
            muted: Color::Reset,
            error: Color::Reset,
            warning: Color::Reset,
        }
    }

    /// `None` for an unknown scheme name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "default" => Some(Self::default()),
            "mono" => Some(Self::mono()),
            _ => None,
        }
    }

    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.focus).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.border)
        }
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.foreground)
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.foreground)
            .add_modifier(Modifier::BOLD)
    }

    pub fn highlight(&self) -> Style {
        Style::default()
            .fg(self.focus)
            .add_modifier(Modifier::REVERSED)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }
}
