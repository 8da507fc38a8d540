//! Conversation pane widget.
//!
//! Combines the scrollable history (landing view or transcript) with the
//! question input at the bottom.

use personaquery_engine::TranscriptView;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    symbols::line,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::app::App;
use crate::ui::theme::Styles;
use crate::ui::widgets::TextInput;

use super::landing::{input_placeholder, landing_lines};
use super::transcript::transcript_lines;

/// Fixed height for the input area (in lines).
const INPUT_HEIGHT: u16 = 3;

/// Height for the divider line.
const DIVIDER_HEIGHT: u16 = 1;

/// Conversation pane widget.
///
/// ```text
/// ┌─ PersonaQuery ───────────────────────┐
/// │ You                                  │
/// │   Top 3 GenAI projects               │
/// │                                      │
/// │ PersonaQuery                         │
/// │   / Thinking...                      │
/// ├──────────────────────────────────────┤
/// │ > _Type your question...             │
/// └──────────────────────────────────────┘
/// ```
pub struct ConversationPane<'a> {
    app: &'a App,
    view: &'a TranscriptView,
}

impl<'a> ConversationPane<'a> {
    /// Create a new conversation pane for the given frame.
    pub fn new(app: &'a App, view: &'a TranscriptView) -> Self {
        Self { app, view }
    }

    fn render_history(&self, area: Rect, buf: &mut Buffer) {
        let width = usize::from(area.width);
        let conversation = &self.app.conversation;
        let lines = if conversation.messages().is_empty() && !conversation.is_pending() {
            landing_lines(conversation.quick_prompts(), width)
        } else {
            transcript_lines(self.view, width, self.app.tick)
        };

        // Bottom-anchored: offset 0 shows the newest lines
        let limit = lines.len().saturating_sub(usize::from(area.height));
        self.app.scroll_limit.set(limit);
        let top = limit - self.app.transcript_scroll.min(limit);

        Paragraph::new(lines)
            .style(Styles::default())
            .scroll((u16::try_from(top).unwrap_or(u16::MAX), 0))
            .render(area, buf);
    }

    fn render_divider(area: Rect, buf: &mut Buffer) {
        if area.width == 0 {
            return;
        }
        let divider = line::HORIZONTAL.repeat(usize::from(area.width));
        Paragraph::new(Line::from(Span::styled(divider, Styles::border()))).render(area, buf);
    }

    fn render_input(&self, area: Rect, buf: &mut Buffer) {
        let conversation = &self.app.conversation;
        TextInput::new(conversation.input())
            .placeholder(input_placeholder(conversation.is_pending()))
            .render(area, buf);
    }
}

impl Widget for ConversationPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" PersonaQuery ")
            .title_style(Styles::title())
            .borders(Borders::ALL)
            .border_style(Styles::border_active())
            .style(Styles::default());

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < INPUT_HEIGHT + DIVIDER_HEIGHT + 1 {
            // Not enough space for history, keep the input usable
            self.render_input(inner, buf);
            return;
        }

        let history_height = inner.height - INPUT_HEIGHT - DIVIDER_HEIGHT;
        let divider_y = inner.y + history_height;
        let input_y = divider_y + DIVIDER_HEIGHT;

        self.render_history(Rect::new(inner.x, inner.y, inner.width, history_height), buf);
        Self::render_divider(Rect::new(inner.x, divider_y, inner.width, DIVIDER_HEIGHT), buf);
        self.render_input(Rect::new(inner.x, input_y, inner.width, INPUT_HEIGHT), buf);
    }
}
