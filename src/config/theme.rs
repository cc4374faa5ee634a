// src/config/theme.rs
//! Accent themes and light/dark mode.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Accent colour used for the played waveform and highlights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Emerald,
    #[default]
    Blue,
    Cyan,
    Red,
    Orange,
}

impl Theme {
    const ORDER: [Theme; 5] = [Theme::Emerald, Theme::Blue, Theme::Cyan, Theme::Red, Theme::Orange];

    pub fn accent(self) -> Color {
        match self {
            Theme::Emerald => Color::Rgb(0x10, 0xb9, 0x81),
            Theme::Blue => Color::Rgb(0x3b, 0x82, 0xf6),
            Theme::Cyan => Color::Rgb(0x06, 0xb6, 0xd4),
            Theme::Red => Color::Rgb(0xef, 0x44, 0x44),
            Theme::Orange => Color::Rgb(0xf9, 0x73, 0x16),
        }
    }

    pub fn next(self) -> Theme {
        let idx = Self::ORDER.iter().position(|t| *t == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Emerald => "emerald",
            Theme::Blue => "blue",
            Theme::Cyan => "cyan",
            Theme::Red => "red",
            Theme::Orange => "orange",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Dark,
    Light,
}

impl Mode {
    pub fn toggled(self) -> Mode {
        match self {
            Mode::Dark => Mode::Light,
            Mode::Light => Mode::Dark,
        }
    }

    /// Colour of the not-yet-played waveform.
    pub fn muted(self) -> Color {
        match self {
            Mode::Dark => Color::Rgb(0x4b, 0x55, 0x63),
            Mode::Light => Color::Rgb(0xcb, 0xd5, 0xe1),
        }
    }

    /// Colour of secondary text.
    pub fn secondary(self) -> Color {
        match self {
            Mode::Dark => Color::Gray,
            Mode::Light => Color::DarkGray,
        }
    }
}
