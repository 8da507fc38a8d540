//! Full-screen composition: conversation pane, status line and status bar.

use ratatui::{buffer::Buffer, layout::Rect, text::Line, widgets::Widget};

use crate::app::App;
use crate::conversation::ConversationPane;
use crate::text::truncate_to_width;
use crate::ui::layout::main_layout;
use crate::ui::theme::Styles;
use crate::ui::widgets::{KeyHint, StatusBar};

/// Render one frame.
pub fn render(app: &App, area: Rect, buf: &mut Buffer) {
    let view = app.conversation.render_transcript();
    let layout = main_layout(area, view.status_line.is_some());

    ConversationPane::new(app, &view).render(layout.main, buf);

    if let (Some(rect), Some(message)) = (layout.status_line, view.status_line.as_deref()) {
        let text = truncate_to_width(&format!(" ! {message}"), usize::from(rect.width));
        buf.set_line(rect.x, rect.y, &Line::styled(text, Styles::error()), rect.width);
    }

    let mode = if view.is_thinking() { "THINKING" } else { "CHAT" };
    StatusBar::new(mode)
        .hints(key_hints(app))
        .right(&app.api_url)
        .render(layout.status_bar, buf);
}

fn key_hints(app: &App) -> Vec<KeyHint> {
    let mut hints = vec![
        KeyHint::new("Enter", "Send"),
        KeyHint::new("Shift+Enter", "Newline"),
    ];
    if app.conversation.show_quick_prompts() {
        hints.push(KeyHint::new("F1..", "Prompt"));
    } else {
        hints.push(KeyHint::new("PgUp/PgDn", "Scroll"));
    }
    hints.push(KeyHint::new("Esc", "Quit"));
    hints
}
