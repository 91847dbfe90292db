//! Smart list continuation on Enter.
//!
//! Only the part of the line *before* the caret is inspected. Returns `None` when the line is not
//! a list item, in which case the host applies its default newline behavior.

use crate::buffer::{Selection, Splice};
use crate::text::{char_len, char_slice, line_start_before};
use regex::Regex;
use std::sync::LazyLock;

static UNORDERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)-\s(.*)$").expect("unordered item pattern is valid"));

static ORDERED_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)([0-9]+)\.\s(.*)$").expect("ordered item pattern is valid")
});

/// A list item recognized on the caret line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListItem {
    /// `- content`
    Unordered {
        /// Leading whitespace.
        indent: String,
        /// Text after the marker.
        content: String,
    },
    /// `n. content`
    Ordered {
        /// Leading whitespace.
        indent: String,
        /// Parsed item number.
        number: u64,
        /// Text after the marker.
        content: String,
    },
}

impl ListItem {
    /// Parse a single line. Numbers that do not fit in `u64` do not match.
    pub fn parse(line: &str) -> Option<Self> {
        if let Some(caps) = UNORDERED_ITEM.captures(line) {
            return Some(ListItem::Unordered {
                indent: caps[1].to_string(),
                content: caps[2].to_string(),
            });
        }

        let caps = ORDERED_ITEM.captures(line)?;
        let number = caps[2].parse::<u64>().ok()?;
        Some(ListItem::Ordered {
            indent: caps[1].to_string(),
            number,
            content: caps[3].to_string(),
        })
    }

    /// Whether the item has no content (Enter on it exits the list).
    pub fn is_empty(&self) -> bool {
        let content = match self {
            ListItem::Unordered { content, .. } | ListItem::Ordered { content, .. } => content,
        };
        content.trim().is_empty()
    }

    /// The text inserted to start the next item, or `None` if the next number overflows.
    pub fn continuation(&self) -> Option<String> {
        match self {
            ListItem::Unordered { indent, .. } => Some(format!("\n{indent}- ")),
            ListItem::Ordered { indent, number, .. } => {
                let next = number.checked_add(1)?;
                Some(format!("\n{indent}{next}. "))
            }
        }
    }
}

/// Compute the Enter-key splice for the caret line, if it is a list item.
///
/// - Non-empty item: a newline plus the same indent and the next marker.
/// - Empty item: the marker line is removed and the caret moves to the start of the following line.
/// - Anything else (including a non-empty selection): `None`.
pub fn continue_list(text: &str, selection: Selection) -> Option<Splice> {
    let selection = selection.clamp(char_len(text));
    if !selection.is_caret() {
        return None;
    }

    let caret = selection.start;
    let line_start = line_start_before(text, caret);
    let line = char_slice(text, line_start, caret);
    let item = ListItem::parse(line)?;

    if item.is_empty() {
        return Some(exit_list(line_start, caret));
    }

    let insert = item.continuation()?;
    let caret_after = caret + char_len(&insert);
    Some(Splice {
        start: caret,
        end: caret,
        insert,
        selection: Selection::caret(caret_after),
    })
}

fn exit_list(line_start: usize, caret: usize) -> Splice {
    if line_start == 0 {
        // First line: the empty item becomes a blank line and the caret moves below it.
        return Splice {
            start: 0,
            end: caret,
            insert: "\n".to_string(),
            selection: Selection::caret(1),
        };
    }

    Splice {
        start: line_start,
        end: caret,
        insert: String::new(),
        selection: Selection::caret(line_start),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn enter(text: &str, caret: usize) -> Option<(String, Selection)> {
        continue_list(text, Selection::caret(caret)).map(|s| s.apply_to_str(text))
    }

    #[test]
    fn test_parse_items() {
        assert_eq!(
            ListItem::parse("  - x"),
            Some(ListItem::Unordered {
                indent: "  ".to_string(),
                content: "x".to_string()
            })
        );
        assert_eq!(
            ListItem::parse("12. y"),
            Some(ListItem::Ordered {
                indent: String::new(),
                number: 12,
                content: "y".to_string()
            })
        );
        assert_eq!(ListItem::parse("plain"), None);
        assert_eq!(ListItem::parse("a. b"), None);
    }

    #[test]
    fn test_overflowing_number_does_not_match() {
        assert_eq!(ListItem::parse("99999999999999999999999. x"), None);
        assert_eq!(enter("18446744073709551615. x", 23), None);
    }

    #[test]
    fn test_only_ascii_digits_number_items() {
        assert_eq!(ListItem::parse("١. x"), None);
        assert_eq!(ListItem::parse("３. x"), None);
        assert_eq!(enter("١. x", 4), None);
    }

    #[test]
    fn test_continue_unordered() {
        assert_eq!(
            enter("- first", 7),
            Some(("- first\n- ".to_string(), Selection::caret(10)))
        );
    }

    #[test]
    fn test_continue_keeps_indent() {
        assert_eq!(
            enter("  - nested", 10),
            Some(("  - nested\n  - ".to_string(), Selection::caret(15)))
        );
    }

    #[test]
    fn test_continue_ordered_increments() {
        assert_eq!(
            enter("2. second", 9).map(|(t, _)| t),
            Some("2. second\n3. ".to_string())
        );
    }

    #[test]
    fn test_empty_item_exits_list() {
        let text = "- a\n- ";
        assert_eq!(enter(text, 6), Some(("- a\n".to_string(), Selection::caret(4))));
    }

    #[test]
    fn test_empty_item_on_first_line() {
        assert_eq!(enter("- ", 2), Some(("\n".to_string(), Selection::caret(1))));
    }

    #[test]
    fn test_plain_line_not_handled() {
        assert_eq!(enter("hello", 5), None);
        assert_eq!(continue_list("- a", Selection::new(0, 3)), None);
    }

    #[test]
    fn test_only_text_before_caret_counts() {
        // Caret sits right after the marker, so the item looks empty.
        let text = "x\n- item";
        assert_eq!(enter(text, 4), Some(("x\nitem".to_string(), Selection::caret(2))));
    }
}
