//! Read-only projection of a conversation for display.
//!
//! The projection never touches controller state; front ends render the
//! [`TranscriptView`] and feed input back through the controller.

use crate::message::{Message, Role, Source};

/// Maximum number of sources listed under one answer.
pub const MAX_SOURCES_SHOWN: usize = 6;

/// Label for a source that does not name its document.
pub const GENERIC_SOURCE_LABEL: &str = "Document";

/// Display list for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptView {
    /// Bubbles in transcript order, followed by [`ViewItem::Thinking`] while a
    /// request is pending.
    pub items: Vec<ViewItem>,
    /// Most recent failure description, shown apart from the transcript.
    pub status_line: Option<String>,
}

impl TranscriptView {
    /// Whether the thinking indicator is part of this frame.
    pub fn is_thinking(&self) -> bool {
        matches!(self.items.last(), Some(ViewItem::Thinking))
    }

    /// Message bubbles only.
    pub fn bubbles(&self) -> impl Iterator<Item = &BubbleView> {
        self.items.iter().filter_map(|item| match item {
            ViewItem::Bubble(bubble) => Some(bubble),
            ViewItem::Thinking => None,
        })
    }
}

/// One element of the display list.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewItem {
    /// A transcript message.
    Bubble(BubbleView),
    /// Ephemeral "thinking" indicator. Not a message.
    Thinking,
}

/// A message as it should be displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct BubbleView {
    pub role: Role,
    pub content: String,
    /// Sources disclosure. `None` hides it entirely.
    pub sources: Option<Vec<SourceView>>,
}

/// A source as it should be displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceView {
    /// Document name, with the page in parentheses when known.
    pub label: String,
    /// Formatted relevance score, e.g. `score 0.870`.
    pub score: Option<String>,
    pub snippet: Option<String>,
}

impl SourceView {
    /// Format a source for display.
    pub fn from_source(source: &Source) -> Self {
        let name = source
            .file_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(GENERIC_SOURCE_LABEL);
        let label = match source.page_label.as_deref().filter(|p| !p.is_empty()) {
            Some(page) => format!("{name} ({page})"),
            None => name.to_string(),
        };

        Self {
            label,
            score: source.score.map(|score| format!("score {score:.3}")),
            snippet: source.snippet.clone().filter(|s| !s.is_empty()),
        }
    }
}

impl BubbleView {
    fn from_message(message: &Message) -> Self {
        let sources = match (message.role, message.sources.as_deref()) {
            (Role::Assistant, Some(sources)) if !sources.is_empty() => Some(
                sources
                    .iter()
                    .take(MAX_SOURCES_SHOWN)
                    .map(SourceView::from_source)
                    .collect(),
            ),
            _ => None,
        };

        Self {
            role: message.role,
            content: message.content.clone(),
            sources,
        }
    }
}

/// Project transcript and request state into a display list.
pub fn project(messages: &[Message], pending: bool, last_error: Option<&str>) -> TranscriptView {
    let mut items: Vec<ViewItem> = messages
        .iter()
        .map(|m| ViewItem::Bubble(BubbleView::from_message(m)))
        .collect();

    if pending {
        items.push(ViewItem::Thinking);
    }

    TranscriptView {
        items,
        status_line: last_error.map(str::to_string),
    }
}
