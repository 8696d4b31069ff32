// Color themes for the TUI
//
// Two built-in variants selected by name from the config. Roles, not
// widget names: components ask for "the error color", never "red".

use ratatui::style::Color;
use ratatui::widgets::BorderType;

/// Named color roles used by the renderer
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub border: Color,
    pub highlight: Color,
    pub info: Color,
    pub error: Color,
    pub attention: Color,
    pub muted: Color,
    pub border_type: BorderType,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            background: Color::Rgb(18, 18, 24),
            foreground: Color::Rgb(214, 214, 214),
            border: Color::Rgb(90, 95, 110),
            highlight: Color::Rgb(130, 170, 255),
            info: Color::Rgb(142, 192, 124),
            error: Color::Rgb(234, 105, 98),
            attention: Color::Rgb(250, 189, 47),
            muted: Color::Rgb(120, 120, 130),
            border_type: BorderType::Rounded,
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::Rgb(245, 245, 240),
            foreground: Color::Rgb(40, 40, 40),
            border: Color::Rgb(150, 150, 150),
            highlight: Color::Rgb(30, 90, 190),
            info: Color::Rgb(60, 130, 60),
            error: Color::Rgb(190, 40, 40),
            attention: Color::Rgb(180, 120, 0),
            muted: Color::Rgb(130, 130, 130),
            border_type: BorderType::Plain,
        }
    }

    /// Look up a theme by config name; unknown names fall back to dark
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "light" => Self::light(),
            "dark" => Self::dark(),
            other => {
                tracing::warn!("unknown theme {other:?}, using dark");
                Self::dark()
            }
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
