//! UI module for the PersonaQuery TUI.

pub mod layout;
mod screen;
pub mod theme;
pub mod widgets;

pub use screen::render;
