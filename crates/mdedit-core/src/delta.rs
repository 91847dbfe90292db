//! Change reports for views that patch their copy of the buffer.
//!
//! Every toolbar mutation is a single splice, so a [`TextDelta`] describes exactly one replaced
//! char range. Offsets match [`Selection`](crate::Selection).

use crate::Selection;

/// One applied splice, as seen by a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDelta {
    /// Start of the replaced range, in chars of the text before the change.
    pub start: usize,
    /// Text that was removed.
    pub deleted: String,
    /// Text that took its place.
    pub inserted: String,
    /// Selection after the change.
    pub selection: Selection,
    /// Buffer version after the change.
    pub version: u64,
}

impl TextDelta {
    /// End of the replaced range in the old text.
    pub fn old_end(&self) -> usize {
        self.start + self.deleted.chars().count()
    }

    /// End of the inserted text in the new text.
    pub fn new_end(&self) -> usize {
        self.start + self.inserted.chars().count()
    }
}
