//! Word wrapping for transcript text.

use textwrap::Options;

use super::width::truncate_to_width;

/// Wrap plain text to the given width. Embedded newlines are kept.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }
    textwrap::wrap(text, width)
        .into_iter()
        .map(std::borrow::Cow::into_owned)
        .collect()
}

/// Wrap text to `width` columns with every line prefixed by `indent`.
pub fn wrap_indented(text: &str, width: usize, indent: &str) -> Vec<String> {
    if width <= indent.len() {
        return wrap_text(text, width);
    }
    let options = Options::new(width)
        .initial_indent(indent)
        .subsequent_indent(indent);
    textwrap::wrap(text, options)
        .into_iter()
        .map(std::borrow::Cow::into_owned)
        .collect()
}

/// Keep at most `max` lines, marking the last kept line when any were dropped.
pub fn clamp_lines(mut lines: Vec<String>, max: usize, width: usize) -> Vec<String> {
    if lines.len() <= max || max == 0 {
        lines.truncate(max);
        return lines;
    }
    lines.truncate(max);
    if let Some(last) = lines.last_mut() {
        let marked = format!("{}...", last.trim_end());
        *last = truncate_to_width(&marked, width);
    }
    lines
}
