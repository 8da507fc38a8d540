//! Multi-line question input widget.

use crate::ui::theme::Styles;
use personaquery_engine::InputBuffer;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

/// Renders an [`InputBuffer`] with a prompt and a visible cursor.
#[derive(Debug, Clone)]
pub struct TextInput<'a> {
    input: &'a InputBuffer,
    block: Option<Block<'a>>,
    focused: bool,
    placeholder: Option<&'a str>,
    prompt: &'a str,
}

impl<'a> TextInput<'a> {
    /// Create a new text input over the given buffer.
    pub fn new(input: &'a InputBuffer) -> Self {
        Self {
            input,
            block: None,
            focused: true,
            placeholder: None,
            prompt: "> ",
        }
    }

    /// Set the block for the text input.
    #[must_use]
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Set focus state.
    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Set placeholder text.
    #[must_use]
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    /// Content lines with the prompt and cursor marker applied.
    fn lines(&self) -> Vec<String> {
        let indent = " ".repeat(self.prompt.len());
        let cursor = self.input.cursor();
        let mut lines = Vec::new();
        let mut current = self.prompt.to_string();
        let mut cursor_drawn = false;

        for (index, ch) in self.input.content().chars().enumerate() {
            if self.focused && index == cursor && !cursor_drawn {
                current.push(if ch == '\n' { '_' } else { '|' });
                cursor_drawn = true;
            }
            if ch == '\n' {
                lines.push(std::mem::replace(&mut current, indent.clone()));
            } else {
                current.push(ch);
            }
        }

        if self.focused && !cursor_drawn {
            current.push('_');
        }
        lines.push(current);
        lines
    }
}

impl Widget for TextInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        if inner.height < 1 || inner.width < 1 {
            return;
        }

        if self.input.is_empty() {
            let mut spans = vec![Span::styled(self.prompt, Styles::active())];
            if self.focused {
                spans.push(Span::styled("_", Styles::active()));
            }
            if let Some(placeholder) = self.placeholder {
                spans.push(Span::styled(placeholder, Styles::dim()));
            }
            Paragraph::new(Line::from(spans)).render(inner, buf);
            return;
        }

        // Keep the tail (where typing happens) in view.
        let lines = self.lines();
        let skip = lines.len().saturating_sub(usize::from(inner.height));
        let visible: Vec<Line> = lines.into_iter().skip(skip).map(Line::from).collect();

        Paragraph::new(visible)
            .style(Styles::default())
            .render(inner, buf);
    }
}
