//! Theme and styling definitions for the PersonaQuery TUI.

use ratatui::style::{Color, Modifier, Style};

/// Color palette for the TUI.
pub struct Palette;

impl Palette {
    // Base colors
    pub const BG: Color = Color::Rgb(18, 24, 32);
    pub const FG: Color = Color::Rgb(225, 236, 245);
    pub const DIM: Color = Color::Rgb(130, 145, 160);

    // Accent colors
    pub const ACCENT: Color = Color::Rgb(79, 188, 255);
    pub const USER: Color = Color::Rgb(150, 130, 255);

    // Status bar colors (high contrast)
    pub const STATUS_BG: Color = Color::Rgb(30, 42, 55);
    pub const STATUS_KEY_BG: Color = Color::Rgb(38, 110, 140);

    // Status colors
    pub const ERROR: Color = Color::Rgb(255, 170, 170);

    // Border colors
    pub const BORDER: Color = Color::Rgb(70, 85, 100);
    pub const BORDER_ACTIVE: Color = Color::Rgb(79, 188, 255);
}

/// Indicator symbols (ASCII so every terminal can draw them).
pub struct Symbols;

impl Symbols {
    pub const BULLET: &'static str = "-";
    pub const SPINNER: [&'static str; 4] = ["|", "/", "-", "\\"];
}

/// Common styles used throughout the TUI.
pub struct Styles;

impl Styles {
    /// Default text style.
    pub fn default() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::BG)
    }

    /// Dimmed text for secondary information.
    pub fn dim() -> Style {
        Style::default().fg(Palette::DIM).bg(Palette::BG)
    }

    /// Highlighted item.
    pub fn highlight() -> Style {
        Style::default()
            .fg(Palette::ACCENT)
            .bg(Palette::BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Active/focused element.
    pub fn active() -> Style {
        Style::default().fg(Palette::ACCENT).bg(Palette::BG)
    }

    /// Author line of a user turn.
    pub fn user() -> Style {
        Style::default()
            .fg(Palette::USER)
            .bg(Palette::BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Author line of an assistant turn.
    pub fn assistant() -> Style {
        Self::highlight()
    }

    /// Error status.
    pub fn error() -> Style {
        Style::default().fg(Palette::ERROR).bg(Palette::BG)
    }

    /// Title style.
    pub fn title() -> Style {
        Style::default()
            .fg(Palette::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Key hint style (for status bar) - bright on dark for visibility.
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Palette::FG)
            .bg(Palette::STATUS_KEY_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Key hint label style - readable on status bar background.
    pub fn key_label() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::STATUS_BG)
    }

    /// Status bar background style.
    pub fn status_bar() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::STATUS_BG)
    }

    /// Border style for inactive elements.
    pub fn border() -> Style {
        Style::default().fg(Palette::BORDER)
    }

    /// Border style for active/focused elements.
    pub fn border_active() -> Style {
        Style::default().fg(Palette::BORDER_ACTIVE)
    }
}

/// Spinner frame for the given tick.
#[allow(clippy::cast_possible_truncation)]
pub fn spinner_frame(tick: u64) -> &'static str {
    Symbols::SPINNER[(tick % Symbols::SPINNER.len() as u64) as usize]
}
