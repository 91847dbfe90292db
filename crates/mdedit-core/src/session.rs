//! Read/edit sessions for articles and project pages.
//!
//! A session tracks the mode, the server's original body, and structured field edits that are
//! held back until an explicit save. The buffer itself lives in the toolbar; the session only
//! compares against it.

use crate::api::{ContentStore, DocumentId, FieldChange, FieldId};
use crate::error::{ApiError, SessionError};
use crate::media::media_url;
use crate::reference::{ReferenceKind, ReferencePicker};
use std::collections::BTreeMap;

/// Confirmation text shown before discarding unsaved article edits.
pub const DISCARD_PROMPT: &str =
    "You have unsaved changes. Are you sure you want to discard them?";

/// Session mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Rendered content, no editing surface.
    #[default]
    Read,
    /// The toolbar is attached.
    Edit,
}

/// What the host should do after a cancel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelOutcome {
    /// Reload the page from the server.
    Reload,
    /// Put this text back into the buffer and show read mode.
    Restore(String),
    /// The user declined; stay in edit mode with everything intact.
    KeepEditing,
}

/// What the host should do after a successful save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Reload the page to show the stored content.
    Reload,
}

/// One article or project page being viewed or edited.
#[derive(Debug, Clone)]
pub struct EditSession {
    document: DocumentId,
    mode: Mode,
    original_body: String,
    fields: BTreeMap<FieldId, FieldChange>,
    pending: BTreeMap<FieldId, FieldChange>,
    featured: ReferencePicker,
}

impl EditSession {
    /// Session over `document` whose stored body is `original_body`.
    pub fn new(document: DocumentId, original_body: impl Into<String>) -> Self {
        Self {
            document,
            mode: Mode::Read,
            original_body: original_body.into(),
            fields: BTreeMap::new(),
            pending: BTreeMap::new(),
            featured: ReferencePicker::new(ReferenceKind::Media),
        }
    }

    /// Provide the stored values of the article's structured fields.
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = (FieldId, FieldChange)>) -> Self {
        self.fields = fields.into_iter().collect();
        self
    }

    /// The edited document.
    pub fn document(&self) -> &DocumentId {
        &self.document
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Whether the session is in edit mode.
    pub fn is_editing(&self) -> bool {
        self.mode == Mode::Edit
    }

    /// The server's body at session start (or after the last save).
    pub fn original_body(&self) -> &str {
        &self.original_body
    }

    /// Stored value of a structured field.
    pub fn field(&self, field_id: FieldId) -> Option<&FieldChange> {
        self.fields.get(&field_id)
    }

    /// Field edits waiting for a save.
    pub fn pending(&self) -> &BTreeMap<FieldId, FieldChange> {
        &self.pending
    }

    /// Switch between read and edit mode. Leaving edit mode this way drops pending field edits.
    pub fn toggle_mode(&mut self) -> Mode {
        self.mode = match self.mode {
            Mode::Read => Mode::Edit,
            Mode::Edit => {
                self.pending.clear();
                Mode::Read
            }
        };
        tracing::debug!(mode = ?self.mode, "session mode changed");
        self.mode
    }

    /// Record a structured field edit. Setting a field back to its stored value un-pends it.
    pub fn record_field_change(
        &mut self,
        field_id: FieldId,
        change: FieldChange,
    ) -> Result<(), SessionError> {
        if !self.is_editing() {
            return Err(SessionError::NotEditing);
        }
        let stored = self.fields.get(&field_id).cloned().unwrap_or_default();
        if stored == change {
            self.pending.remove(&field_id);
        } else {
            self.pending.insert(field_id, change);
        }
        Ok(())
    }

    /// Whether `body` differs from the stored body or field edits are pending.
    pub fn has_unsaved_changes(&self, body: &str) -> bool {
        body != self.original_body || !self.pending.is_empty()
    }

    /// Cancel editing.
    ///
    /// Article: a dirty session asks `confirm` with [`DISCARD_PROMPT`] first. Project page:
    /// the original description is restored without asking.
    pub fn cancel<F>(&mut self, body: &str, confirm: F) -> CancelOutcome
    where
        F: FnOnce(&str) -> bool,
    {
        if let DocumentId::Project { .. } = self.document {
            self.pending.clear();
            self.mode = Mode::Read;
            return CancelOutcome::Restore(self.original_body.clone());
        }

        if self.has_unsaved_changes(body) && !confirm(DISCARD_PROMPT) {
            return CancelOutcome::KeepEditing;
        }
        self.pending.clear();
        self.mode = Mode::Read;
        CancelOutcome::Reload
    }

    /// Save `body` and every pending field edit.
    ///
    /// Field edits are attempted even if an earlier one fails; stored ones leave the pending set
    /// and the first failure is returned. Nothing is retried.
    pub fn save<S: ContentStore + ?Sized>(
        &mut self,
        store: &S,
        body: &str,
    ) -> Result<SaveOutcome, SessionError> {
        if !self.is_editing() {
            return Err(SessionError::NotEditing);
        }

        store.save(&self.document, body).inspect_err(|err| {
            tracing::warn!(error = %err, "failed to save body");
        })?;
        self.original_body = body.to_string();

        let mut first_error: Option<ApiError> = None;
        let pending = std::mem::take(&mut self.pending);
        for (field_id, change) in pending {
            match store.set_reference_field(&self.document, field_id, &change) {
                Ok(()) => {
                    self.fields.insert(field_id, change);
                }
                Err(err) => {
                    tracing::warn!(field_id, error = %err, "failed to save field");
                    first_error.get_or_insert(err);
                    self.pending.insert(field_id, change);
                }
            }
        }

        if let Some(err) = first_error {
            return Err(err.into());
        }
        self.mode = Mode::Read;
        Ok(SaveOutcome::Reload)
    }

    /// The featured-image picker (a media list).
    pub fn featured_picker(&mut self) -> &mut ReferencePicker {
        &mut self.featured
    }

    /// Set the article's featured image, returning the URL to display.
    pub fn set_featured_media<S: ContentStore + ?Sized>(
        &mut self,
        store: &S,
        filename: &str,
    ) -> Result<String, SessionError> {
        let DocumentId::Article { project, .. } = &self.document else {
            return Err(SessionError::NotAnArticle);
        };
        let url = media_url(project, filename);
        store
            .set_featured_media(&self.document, filename)
            .inspect_err(|err| tracing::warn!(error = %err, "failed to set featured image"))?;
        Ok(url)
    }

    /// Set the featured image to the `index`-th visible item of the featured picker.
    pub fn select_featured<S: ContentStore + ?Sized>(
        &mut self,
        store: &S,
        index: usize,
    ) -> Result<Option<String>, SessionError> {
        let Some(item) = self.featured.visible_item(index) else {
            return Ok(None);
        };
        let filename = item.identifier.clone();
        self.set_featured_media(store, &filename).map(Some)
    }
}
