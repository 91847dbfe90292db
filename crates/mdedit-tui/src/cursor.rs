//! Caret motion over char offsets.

use unicode_width::UnicodeWidthStr;

/// `(line, column)` of `offset`, both 0-based, column in chars.
pub fn line_and_column(text: &str, offset: usize) -> (usize, usize) {
    let mut line = 0;
    let mut column = 0;
    for c in text.chars().take(offset) {
        if c == '\n' {
            line += 1;
            column = 0;
        } else {
            column += 1;
        }
    }
    (line, column)
}

/// Char offsets `[start, end)` of every line (end excludes the `\n`).
fn line_ranges(text: &str) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut start = 0;
    let mut offset = 0;
    for c in text.chars() {
        if c == '\n' {
            ranges.push((start, offset));
            start = offset + 1;
        }
        offset += 1;
    }
    ranges.push((start, offset));
    ranges
}

/// Start of the line containing `offset`.
pub fn line_start(text: &str, offset: usize) -> usize {
    let (line, _) = line_and_column(text, offset);
    line_ranges(text)[line].0
}

/// End of the line containing `offset`.
pub fn line_end(text: &str, offset: usize) -> usize {
    let (line, _) = line_and_column(text, offset);
    line_ranges(text)[line].1
}

/// Move `delta` lines up (negative) or down, keeping the column where the target line allows.
pub fn move_vertical(text: &str, offset: usize, delta: isize) -> usize {
    let (line, column) = line_and_column(text, offset);
    let ranges = line_ranges(text);
    let target = line
        .saturating_add_signed(delta)
        .min(ranges.len().saturating_sub(1));
    let (start, end) = ranges[target];
    (start + column).min(end)
}

/// Terminal cell width of `text`.
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_and_column() {
        assert_eq!(line_and_column("ab\ncd", 4), (1, 1));
        assert_eq!(line_and_column("ab\ncd", 2), (0, 2));
    }

    #[test]
    fn test_move_vertical_clamps_column() {
        let text = "long line\nab\nxyz";
        assert_eq!(move_vertical(text, 8, 1), 12);
        assert_eq!(move_vertical(text, 12, -1), 2);
        assert_eq!(move_vertical(text, 0, -3), 0);
        assert_eq!(move_vertical(text, 0, 10), 13);
    }

    #[test]
    fn test_line_bounds() {
        let text = "ab\ncd";
        assert_eq!(line_start(text, 4), 3);
        assert_eq!(line_end(text, 4), 5);
        assert_eq!(line_end(text, 0), 2);
    }

    #[test]
    fn test_display_width_wide_chars() {
        assert_eq!(display_width("中a"), 3);
    }
}
