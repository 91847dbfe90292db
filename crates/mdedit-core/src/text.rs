//! Char-offset helpers. Every public offset in this crate counts `char`s, while `str` slicing and
//! regex matches work in bytes.

/// Byte offset of the `offset`-th char of `text`; past the end maps to `text.len()`.
pub(crate) fn byte_offset(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map_or(text.len(), |(byte, _)| byte)
}

/// The `[start, end)` char range of `text`. A reversed range is empty.
pub(crate) fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let start_byte = byte_offset(text, start);
    let end_byte = start_byte + byte_offset(&text[start_byte..], end.saturating_sub(start));
    &text[start_byte..end_byte]
}

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Convert ascending, non-overlapping byte ranges of `text` (regex matches) into char ranges,
/// walking the text once.
pub(crate) fn char_ranges(
    text: &str,
    byte_ranges: impl IntoIterator<Item = (usize, usize)>,
) -> Vec<(usize, usize)> {
    let mut byte = 0;
    let mut chars = 0;
    let mut advance = |to: usize| {
        chars += char_len(&text[byte..to]);
        byte = to;
        chars
    };
    byte_ranges
        .into_iter()
        .map(|(start, end)| {
            let start = advance(start);
            (start, advance(end))
        })
        .collect()
}

/// Char offset of the first character of the line containing `offset`.
pub(crate) fn line_start_before(text: &str, offset: usize) -> usize {
    let before = char_slice(text, 0, offset);
    match before.rfind('\n') {
        Some(byte) => char_len(&before[..byte]) + 1,
        None => 0,
    }
}
