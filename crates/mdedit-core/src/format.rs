//! Formatting actions.
//!
//! Each action is a pure function of `(text, selection)` returning a [`Splice`]. Nothing outside
//! the selection is touched, and the resulting selection is computed from the old start offset
//! and the length of the inserted text only.
//!
//! ```rust
//! use mdedit_core::{Selection, format};
//!
//! let splice = format::symmetric_wrap("hello world", Selection::new(0, 5), "**", "**");
//! let (text, selection) = splice.apply_to_str("hello world");
//! assert_eq!(text, "**hello** world");
//! assert_eq!(selection, Selection::new(2, 7));
//! ```

use crate::buffer::{Selection, Splice};
use crate::error::ToolbarError;
use crate::text::{char_len, char_slice};
use regex::Regex;
use std::sync::LazyLock;

/// Existing list or quote marker at the start of a line: `- `, `* `, `+ `, `> `, `12. `.
static LINE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-*+>]|[0-9]+\.)\s+").expect("line marker pattern is valid")
});

/// Line-oriented transforms applied to every line of the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTransform {
    /// `- item`
    UnorderedList,
    /// `1. item`, `2. item`, ...
    OrderedList,
    /// `> quote`
    Quote,
}

impl LineTransform {
    /// Marker inserted at a caret when nothing is selected.
    pub fn caret_marker(self) -> &'static str {
        match self {
            LineTransform::UnorderedList => "- ",
            LineTransform::OrderedList => "1. ",
            LineTransform::Quote => "> ",
        }
    }

    /// Marker for the line at `line_index` (0-based).
    pub fn marker(self, line_index: usize) -> String {
        match self {
            LineTransform::OrderedList => format!("{}. ", line_index + 1),
            other => other.caret_marker().to_string(),
        }
    }
}

/// A named text transformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatAction {
    /// Wrap the selection in `prefix`/`suffix`.
    Wrap {
        /// Text inserted before the selection.
        prefix: String,
        /// Text inserted after the selection.
        suffix: String,
    },
    /// Prefix every selected line with a marker.
    Lines(LineTransform),
    /// `#`-prefixed heading, level 1..=6.
    Heading(u8),
    /// `\n---\n`, replacing the selection.
    HorizontalRule,
    /// Fenced code block around the selection.
    CodeBlock,
}

impl FormatAction {
    /// `**bold**`
    pub fn bold() -> Self {
        Self::wrap("**", "**")
    }

    /// `*italic*`
    pub fn italic() -> Self {
        Self::wrap("*", "*")
    }

    /// `~~strikethrough~~`
    pub fn strikethrough() -> Self {
        Self::wrap("~~", "~~")
    }

    /// `` `code` ``
    pub fn inline_code() -> Self {
        Self::wrap("`", "`")
    }

    /// Symmetric (or asymmetric) wrap.
    pub fn wrap(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        FormatAction::Wrap {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// Compute the splice for this action.
    pub fn splice(&self, text: &str, selection: Selection) -> Result<Splice, ToolbarError> {
        let splice = match self {
            FormatAction::Wrap { prefix, suffix } => {
                symmetric_wrap(text, selection, prefix, suffix)
            }
            FormatAction::Lines(transform) => line_transform(text, selection, *transform),
            FormatAction::Heading(level) => heading(text, selection, *level)?,
            FormatAction::HorizontalRule => horizontal_rule(selection),
            FormatAction::CodeBlock => code_block(text, selection),
        };
        Ok(splice)
    }
}

/// Wrap the selection in `prefix` + `suffix`.
///
/// - Non-empty selection: the new selection spans the original content, shifted by the prefix.
/// - Caret: the caret lands between the two markers.
pub fn symmetric_wrap(text: &str, selection: Selection, prefix: &str, suffix: &str) -> Splice {
    let selection = selection.clamp(char_len(text));
    let selected = char_slice(text, selection.start, selection.end);
    let prefix_len = char_len(prefix);

    let mut insert = String::with_capacity(prefix.len() + selected.len() + suffix.len());
    insert.push_str(prefix);
    insert.push_str(selected);
    insert.push_str(suffix);

    let inner_start = selection.start + prefix_len;
    Splice {
        start: selection.start,
        end: selection.end,
        insert,
        selection: Selection::new(inner_start, inner_start + selection.len()),
    }
}

/// Insert `snippet` at the caret (or before a non-empty selection, keeping it selected).
pub fn insert_at_caret(text: &str, selection: Selection, snippet: &str) -> Splice {
    symmetric_wrap(text, selection, snippet, "")
}

/// Remove one leading list/quote marker from `line`, if present.
pub fn strip_line_marker(line: &str) -> &str {
    match LINE_MARKER.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    }
}

/// Apply `transform` to every line of the selection.
pub fn line_transform(text: &str, selection: Selection, transform: LineTransform) -> Splice {
    line_transform_with(text, selection, transform.caret_marker(), |index, _| {
        transform.marker(index)
    })
}

/// Generic line transform.
///
/// `marker_for(line_index, content)` receives the 0-based line index and the line content with
/// any existing marker already stripped, and returns the new prefix for that line.
pub fn line_transform_with<F>(
    text: &str,
    selection: Selection,
    caret_marker: &str,
    mut marker_for: F,
) -> Splice
where
    F: FnMut(usize, &str) -> String,
{
    let selection = selection.clamp(char_len(text));
    if selection.is_caret() {
        let caret = selection.start + char_len(caret_marker);
        return Splice {
            start: selection.start,
            end: selection.end,
            insert: caret_marker.to_string(),
            selection: Selection::caret(caret),
        };
    }

    let selected = char_slice(text, selection.start, selection.end);
    let mapped = selected
        .split('\n')
        .enumerate()
        .map(|(index, line)| {
            let content = strip_line_marker(line);
            let mut out = marker_for(index, content);
            out.push_str(content);
            out
        })
        .collect::<Vec<_>>()
        .join("\n");

    let mapped_len = char_len(&mapped);
    Splice {
        start: selection.start,
        end: selection.end,
        insert: mapped,
        selection: Selection::new(selection.start, selection.start + mapped_len),
    }
}

/// Insert a `level` heading prefix through the wrap logic.
pub fn heading(text: &str, selection: Selection, level: u8) -> Result<Splice, ToolbarError> {
    if !(1..=6).contains(&level) {
        return Err(ToolbarError::InvalidHeadingLevel(level));
    }
    let mut prefix = "#".repeat(level as usize);
    prefix.push(' ');
    Ok(symmetric_wrap(text, selection, &prefix, ""))
}

/// Replace the selection with a horizontal rule; the caret ends after it.
pub fn horizontal_rule(selection: Selection) -> Splice {
    const RULE: &str = "\n---\n";
    Splice {
        start: selection.start,
        end: selection.end,
        insert: RULE.to_string(),
        selection: Selection::caret(selection.start + RULE.len()),
    }
}

/// Wrap the selection in a fenced code block.
pub fn code_block(text: &str, selection: Selection) -> Splice {
    symmetric_wrap(text, selection, "```\n", "\n```")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(splice: Splice, text: &str) -> (String, Selection) {
        splice.apply_to_str(text)
    }

    #[test]
    fn test_wrap_selection() {
        let text = "hello world";
        let out = run(symmetric_wrap(text, Selection::new(0, 5), "**", "**"), text);
        assert_eq!(out, ("**hello** world".to_string(), Selection::new(2, 7)));
    }

    #[test]
    fn test_wrap_caret() {
        let text = "ab";
        let out = run(symmetric_wrap(text, Selection::caret(1), "~~", "~~"), text);
        assert_eq!(out, ("a~~~~b".to_string(), Selection::caret(3)));
    }

    #[test]
    fn test_wrap_multibyte_offsets() {
        let text = "日本語";
        let out = run(symmetric_wrap(text, Selection::new(1, 2), "*", "*"), text);
        assert_eq!(out, ("日*本*語".to_string(), Selection::new(2, 3)));
    }

    #[test]
    fn test_unordered_replaces_existing_markers() {
        let text = "* a\n2. b\nc";
        let out = run(
            line_transform(text, Selection::new(0, 10), LineTransform::UnorderedList),
            text,
        );
        assert_eq!(out.0, "- a\n- b\n- c");
        assert_eq!(out.1, Selection::new(0, 11));
    }

    #[test]
    fn test_ordered_numbers_lines() {
        let text = "x\ny\nz";
        let out = run(
            line_transform(text, Selection::new(0, 5), LineTransform::OrderedList),
            text,
        );
        assert_eq!(out.0, "1. x\n2. y\n3. z");
    }

    #[test]
    fn test_quote_is_idempotent() {
        let text = "note";
        let (once, sel) = run(
            line_transform(text, Selection::new(0, 4), LineTransform::Quote),
            text,
        );
        let (twice, _) = run(line_transform(&once, sel, LineTransform::Quote), &once);
        assert_eq!(once, "> note");
        assert_eq!(twice, once);
    }

    #[test]
    fn test_line_transform_caret_inserts_marker() {
        let text = "ab";
        let out = run(
            line_transform(text, Selection::caret(2), LineTransform::OrderedList),
            text,
        );
        assert_eq!(out, ("ab1. ".to_string(), Selection::caret(5)));
    }

    #[test]
    fn test_heading_levels() {
        let text = "Title";
        let out = run(heading(text, Selection::caret(0), 3).unwrap(), text);
        assert_eq!(out, ("### Title".to_string(), Selection::caret(4)));
        assert_eq!(
            heading(text, Selection::caret(0), 7),
            Err(ToolbarError::InvalidHeadingLevel(7))
        );
        assert!(heading(text, Selection::caret(0), 0).is_err());
    }

    #[test]
    fn test_horizontal_rule_replaces_selection() {
        let text = "abc";
        let out = run(horizontal_rule(Selection::new(1, 2)), text);
        assert_eq!(out, ("a\n---\nc".to_string(), Selection::caret(6)));
    }

    #[test]
    fn test_code_block_wraps() {
        let text = "let x = 1;";
        let out = run(code_block(text, Selection::new(0, 10)), text);
        assert_eq!(out.0, "```\nlet x = 1;\n```");
        assert_eq!(out.1, Selection::new(4, 14));
    }

    #[test]
    fn test_strip_line_marker_only_once() {
        assert_eq!(strip_line_marker("- - x"), "- x");
        assert_eq!(strip_line_marker("  10. item"), "item");
        assert_eq!(strip_line_marker("plain"), "plain");
        assert_eq!(strip_line_marker("-nospace"), "-nospace");
    }

    #[test]
    fn test_strip_ignores_non_ascii_digit_markers() {
        assert_eq!(strip_line_marker("٣. item"), "٣. item");
    }
}
