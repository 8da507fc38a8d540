//! Landing view and input placeholder text.

use ratatui::text::{Line, Span};

use crate::text::wrap_text;
use crate::ui::theme::Styles;

const WELCOME: &str = "I'm PersonaQuery, a digital twin built from the candidate's documents. \
Ask about skills, projects, achievements, publications and experience. \
I only answer using evidence from the provided documents.";

/// Placeholder shown in an empty input.
pub fn input_placeholder(pending: bool) -> &'static str {
    if pending {
        "Waiting for the answer... (you can keep typing)"
    } else {
        "Type your question..."
    }
}

/// Lines of the landing view, listing the quick prompts with their keys.
pub fn landing_lines(quick_prompts: &[String], width: usize) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Persona", Styles::title()),
            Span::styled("Query", Styles::user()),
        ]),
        Line::from(""),
        Line::styled("Welcome, Recruiter / Guest", Styles::highlight()),
    ];
    lines.extend(
        wrap_text(WELCOME, width)
            .into_iter()
            .map(|line| Line::styled(line, Styles::default())),
    );

    if !quick_prompts.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::styled("Quick prompts (press a key)", Styles::dim()));
        for (index, prompt) in quick_prompts.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(format!("  F{:<3}", index + 1), Styles::active()),
                Span::styled(prompt.clone(), Styles::default()),
            ]));
        }
    }

    lines
}
