//! The editable document buffer and its selection.
//!
//! The buffer is a plain `String` owned by exactly one toolbar instance. All public offsets are
//! character offsets; a [`Selection`] is always clamped to the buffer length after a mutation.

use crate::delta::TextDelta;
use crate::text::{byte_offset, char_len, char_slice};
use serde::{Deserialize, Serialize};

/// A caret or highlighted range inside a [`Buffer`], as half-open char offsets.
///
/// Invariant: `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    /// Inclusive start character offset.
    pub start: usize,
    /// Exclusive end character offset.
    pub end: usize,
}

impl Selection {
    /// Create a selection; reversed offsets are swapped.
    pub fn new(start: usize, end: usize) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// Create an empty selection (a caret) at `offset`.
    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Returns `true` if this selection is a caret.
    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }

    /// Length of the selection in characters.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if the selection is empty.
    pub fn is_empty(&self) -> bool {
        self.is_caret()
    }

    /// Clamp both ends to `char_count`.
    pub fn clamp(self, char_count: usize) -> Self {
        Self::new(self.start.min(char_count), self.end.min(char_count))
    }
}

/// A splice of the buffer plus the selection it leaves behind.
///
/// Every formatting operation is a pure function producing one `Splice`; applying it is the only
/// way the buffer changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splice {
    /// Start of the replaced range (char offset).
    pub start: usize,
    /// End of the replaced range (char offset, exclusive).
    pub end: usize,
    /// Replacement text.
    pub insert: String,
    /// Selection after the splice is applied.
    pub selection: Selection,
}

impl Splice {
    /// Apply this splice to a plain string, returning the new text and selection.
    pub fn apply_to_str(&self, text: &str) -> (String, Selection) {
        let start = byte_offset(text, self.start);
        let end = start + char_slice(text, self.start, self.end).len();

        let mut out = String::with_capacity(text.len() + self.insert.len());
        out.push_str(&text[..start]);
        out.push_str(&self.insert);
        out.push_str(&text[end..]);

        let selection = self.selection.clamp(char_len(&out));
        (out, selection)
    }
}

/// The in-memory document being edited.
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    text: String,
    selection: Selection,
    version: u64,
}

impl Buffer {
    /// Create a buffer with the caret at offset 0.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            selection: Selection::default(),
            version: 0,
        }
    }

    /// Create a buffer with an explicit selection (clamped).
    pub fn with_selection(text: impl Into<String>, selection: Selection) -> Self {
        let mut buffer = Self::new(text);
        buffer.set_selection(selection);
        buffer
    }

    /// Full buffer text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Buffer length in characters.
    pub fn char_count(&self) -> usize {
        char_len(&self.text)
    }

    /// Current selection.
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Text covered by the current selection.
    pub fn selected_text(&self) -> &str {
        char_slice(&self.text, self.selection.start, self.selection.end)
    }

    /// Monotonic version, bumped on every text change.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Move the selection; offsets past the end are clamped. Returns the stored selection.
    pub fn set_selection(&mut self, selection: Selection) -> Selection {
        self.selection = selection.clamp(self.char_count());
        self.selection
    }

    /// Apply a splice, returning the structured delta.
    pub fn apply(&mut self, splice: &Splice) -> TextDelta {
        let char_count = self.char_count();
        let start = splice.start.min(char_count);
        let end = splice.end.clamp(start, char_count);
        let deleted = char_slice(&self.text, start, end).to_string();

        let clamped = Splice {
            start,
            end,
            insert: splice.insert.clone(),
            selection: splice.selection,
        };
        let (text, selection) = clamped.apply_to_str(&self.text);
        self.text = text;
        self.selection = selection;
        self.version += 1;

        TextDelta {
            start,
            deleted,
            inserted: clamped.insert,
            selection: self.selection,
            version: self.version,
        }
    }

    /// Replace the whole text (e.g. restoring the server value on cancel).
    pub fn replace_all(&mut self, text: impl Into<String>) -> TextDelta {
        let text = text.into();
        let caret = self.selection.start.min(char_len(&text));
        let splice = Splice {
            start: 0,
            end: self.char_count(),
            insert: text,
            selection: Selection::caret(caret),
        };
        self.apply(&splice)
    }
}
