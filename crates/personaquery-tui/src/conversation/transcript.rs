//! Transcript layout: turns a [`TranscriptView`] into styled lines.

use personaquery_engine::{BubbleView, Role, SourceView, TranscriptView, ViewItem};
use ratatui::text::{Line, Span};

use crate::text::{clamp_lines, truncate_to_width, visual_width, wrap_indented};
use crate::ui::theme::{spinner_frame, Styles, Symbols};

const BODY_INDENT: &str = "  ";
const SOURCE_INDENT: &str = "    ";
const SNIPPET_INDENT: &str = "      ";

/// Snippets are clamped to this many lines.
const SNIPPET_MAX_LINES: usize = 3;

/// Lay out the transcript for the given width.
pub fn transcript_lines(view: &TranscriptView, width: usize, tick: u64) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for (index, item) in view.items.iter().enumerate() {
        if index > 0 {
            lines.push(Line::from(""));
        }
        match item {
            ViewItem::Bubble(bubble) => push_bubble(&mut lines, bubble, width),
            ViewItem::Thinking => {
                lines.push(Line::styled("PersonaQuery", Styles::assistant()));
                lines.push(Line::styled(
                    format!("{BODY_INDENT}{} Thinking...", spinner_frame(tick)),
                    Styles::dim(),
                ));
            }
        }
    }

    lines
}

fn push_bubble(lines: &mut Vec<Line<'static>>, bubble: &BubbleView, width: usize) {
    let header = match bubble.role {
        Role::User => Line::styled("You", Styles::user()),
        Role::Assistant => Line::styled("PersonaQuery", Styles::assistant()),
    };
    lines.push(header);
    lines.extend(
        wrap_indented(&bubble.content, width, BODY_INDENT)
            .into_iter()
            .map(|line| Line::styled(line, Styles::default())),
    );

    if let Some(sources) = &bubble.sources {
        lines.push(Line::styled(
            format!("{BODY_INDENT}Sources ({})", sources.len()),
            Styles::dim(),
        ));
        for source in sources {
            push_source(lines, source, width);
        }
    }
}

fn push_source(lines: &mut Vec<Line<'static>>, source: &SourceView, width: usize) {
    let prefix = format!("{SOURCE_INDENT}{} ", Symbols::BULLET);
    let score = source
        .score
        .as_ref()
        .map(|score| format!("  {score}"))
        .unwrap_or_default();
    let label_width = width
        .saturating_sub(visual_width(&prefix))
        .saturating_sub(visual_width(&score));

    lines.push(Line::from(vec![
        Span::styled(prefix, Styles::dim()),
        Span::styled(truncate_to_width(&source.label, label_width), Styles::default()),
        Span::styled(score, Styles::dim()),
    ]));

    if let Some(snippet) = &source.snippet {
        let wrapped = wrap_indented(snippet, width, SNIPPET_INDENT);
        lines.extend(
            clamp_lines(wrapped, SNIPPET_MAX_LINES, width)
                .into_iter()
                .map(|line| Line::styled(line, Styles::dim())),
        );
    }
}
