//! Layout helpers for the PersonaQuery TUI.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Areas of the main screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MainLayout {
    /// Conversation pane.
    pub main: Rect,
    /// Diagnostic line, present only when there is something to show.
    pub status_line: Option<Rect>,
    /// Key hints at the bottom.
    pub status_bar: Rect,
}

/// Split the screen into conversation pane, optional status line and status bar.
pub fn main_layout(area: Rect, with_status_line: bool) -> MainLayout {
    let status_line_height = u16::from(with_status_line);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(status_line_height),
            Constraint::Length(1),
        ])
        .split(area);

    MainLayout {
        main: chunks[0],
        status_line: with_status_line.then_some(chunks[1]),
        status_bar: chunks[2],
    }
}
