//! Horizontal option bar used for the category and sort selectors.

use ratatui::text::{Line, Span};

use crate::theme;

/// Render labels inline with the active one bracketed and highlighted.
///
/// An `active_index` past the end highlights nothing.
pub fn render_sub_tabs<'a>(labels: &[&'a str], active_index: usize) -> Line<'a> {
    let mut spans = Vec::with_capacity(labels.len() * 2);

    for (i, label) in labels.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", theme::key_hint()));
        }

        if i == active_index {
            spans.push(Span::styled(format!("[{label}]"), theme::tab_active()));
        } else {
            spans.push(Span::styled(*label, theme::tab_inactive()));
        }
    }

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn brackets_the_active_label() {
        let line = render_sub_tabs(&["All Categories", "Shopping"], 1);
        assert_eq!(text(&line), "All Categories  [Shopping]");
    }

    #[test]
    fn out_of_range_highlights_nothing() {
        let line = render_sub_tabs(&["a", "b"], 5);
        assert_eq!(text(&line), "a  b");
    }
}
