//! Project media library: the sidebar list and image uploads.
//!
//! The sidebar shows every media file of the project and narrows the list as the user types.
//! Uploading a file refetches the list so the new image shows up immediately.

use crate::api::{ContentStore, ListingApi, MediaFile};
use crate::error::ApiError;
use crate::reference::{ReferenceItem, ReferenceKind, ReferenceListing, ReferencePicker};
use std::path::Path;

/// Image extensions the server accepts, lowercase.
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif"];

/// Alert shown when an upload fails.
pub const UPLOAD_FAILED: &str = "Failed to upload image";

const UNSUPPORTED_TYPE: &str = "Unsupported file type. Upload PNG, JPG, JPEG, WEBP, or GIF.";

/// Whether `filename` has an accepted image extension (case-insensitive).
pub fn is_allowed_image(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ALLOWED_IMAGE_EXTENSIONS
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
}

/// URL serving a project media file.
pub fn media_url(project: &str, filename: &str) -> String {
    format!("/projects/{project}/media/files/{filename}")
}

/// The media sidebar of one project.
#[derive(Debug, Clone)]
pub struct MediaLibrary {
    project: String,
    picker: ReferencePicker,
}

impl MediaLibrary {
    /// Empty library for `project`; call [`MediaLibrary::refresh`] to fill it.
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            picker: ReferencePicker::new(ReferenceKind::Media),
        }
    }

    /// Project slug.
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Refetch the file list, keeping the filter term. Returns the number of files.
    pub fn refresh<L: ListingApi + ?Sized>(&mut self, listing: &L) -> Result<usize, ApiError> {
        self.picker.invalidate();
        self.picker.begin_load();
        let result = listing
            .list_media(&self.project)
            .map(|files| files.into_iter().map(ReferenceItem::from).collect::<Vec<_>>());
        let outcome = result.as_ref().map(Vec::len).map_err(Clone::clone);
        self.picker.complete_load(result);
        outcome
    }

    /// Narrow the list to filenames containing `term` (case-insensitive).
    pub fn set_filter(&mut self, term: impl Into<String>) {
        self.picker.set_filter(term);
    }

    /// Current filter term.
    pub fn term(&self) -> &str {
        self.picker.term()
    }

    /// Files matching the filter.
    pub fn visible(&self) -> Vec<&ReferenceItem> {
        self.picker.visible()
    }

    /// Render model for the sidebar.
    pub fn listing(&self) -> ReferenceListing<'_> {
        self.picker.listing()
    }

    /// Upload `bytes` as `filename`, then refresh the list.
    ///
    /// Unsupported extensions are rejected before any request is made. A failed refresh after a
    /// stored upload leaves the list in its failed state but still returns the stored file.
    pub fn upload<S, L>(
        &mut self,
        store: &S,
        listing: &L,
        filename: &str,
        bytes: &[u8],
    ) -> Result<MediaFile, ApiError>
    where
        S: ContentStore + ?Sized,
        L: ListingApi + ?Sized,
    {
        if !is_allowed_image(filename) {
            return Err(ApiError::Rejected(UNSUPPORTED_TYPE.to_string()));
        }

        let file = store
            .upload_media(&self.project, filename, bytes)
            .inspect_err(|err| tracing::warn!(filename, error = %err, "media upload failed"))?;
        tracing::info!(filename = %file.filename, size = bytes.len(), "media uploaded");

        if let Err(err) = self.refresh(listing) {
            tracing::warn!(error = %err, "media list refresh failed after upload");
        }
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_extensions() {
        assert!(is_allowed_image("cat.png"));
        assert!(is_allowed_image("Cat.JPEG"));
        assert!(!is_allowed_image("notes.txt"));
        assert!(!is_allowed_image("png"));
    }

    #[test]
    fn test_media_url() {
        assert_eq!(media_url("demo", "a.png"), "/projects/demo/media/files/a.png");
    }
}
