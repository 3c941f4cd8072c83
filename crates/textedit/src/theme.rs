//! The fixed dark palette.

use ratatui::style::{Color, Modifier, Style};

pub const BACKGROUND: Color = Color::Rgb(0x1e, 0x1e, 0x1e);
pub const FOREGROUND: Color = Color::Rgb(0xff, 0xff, 0xff);
pub const SELECTION: Color = Color::Rgb(0x40, 0x40, 0x40);
pub const BAR: Color = Color::Rgb(0x2d, 0x2d, 0x2d);
pub const HIGHLIGHT: Color = Color::Rgb(0x00, 0x78, 0xd4);
pub const MUTED: Color = Color::Rgb(0x80, 0x80, 0x80);
pub const ERROR: Color = Color::Rgb(0xf1, 0x4c, 0x4c);
pub const WARNING: Color = Color::Rgb(0xcc, 0xa7, 0x00);
pub const SUCCESS: Color = Color::Rgb(0x89, 0xd1, 0x85);

pub fn text() -> Style {
    Style::default().bg(BACKGROUND).fg(FOREGROUND)
}

pub fn bar() -> Style {
    Style::default().bg(BAR).fg(FOREGROUND)
}

pub fn selection() -> Style {
    Style::default().bg(SELECTION).fg(FOREGROUND)
}

pub fn find_match() -> Style {
    Style::default().bg(HIGHLIGHT).fg(FOREGROUND)
}

pub fn placeholder() -> Style {
    Style::default().bg(BACKGROUND).fg(MUTED)
}

pub fn title() -> Style {
    bar().add_modifier(Modifier::BOLD)
}
