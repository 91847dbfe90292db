//! Offline storage: the document is the local file, uploaded images go to `media/` beside it.

use mdedit_core::{
    ApiError, ArticleId, ContentStore, DocumentId, FieldChange, FieldId, FolderId, MediaFile,
};
use std::fs;
use std::path::PathBuf;

pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn media_dir(&self) -> PathBuf {
        self.path
            .parent()
            .map(|dir| dir.join("media"))
            .unwrap_or_else(|| PathBuf::from("media"))
    }
}

fn io_error(err: std::io::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

fn offline() -> ApiError {
    ApiError::Rejected("not available offline".to_string())
}

impl ContentStore for FileStore {
    fn save(&self, _document: &DocumentId, body: &str) -> Result<(), ApiError> {
        fs::write(&self.path, body).map_err(io_error)
    }

    fn set_reference_field(
        &self,
        _document: &DocumentId,
        _field_id: FieldId,
        _change: &FieldChange,
    ) -> Result<(), ApiError> {
        Err(offline())
    }

    fn set_featured_media(&self, _document: &DocumentId, _filename: &str) -> Result<(), ApiError> {
        Err(offline())
    }

    fn rename_folder(&self, _: &str, _: FolderId, _: &str) -> Result<String, ApiError> {
        Err(offline())
    }

    fn rename_article(&self, _: &str, _: ArticleId, _: &str) -> Result<String, ApiError> {
        Err(offline())
    }

    fn upload_media(
        &self,
        _project: &str,
        filename: &str,
        bytes: &[u8],
    ) -> Result<MediaFile, ApiError> {
        let dir = self.media_dir();
        fs::create_dir_all(&dir).map_err(io_error)?;
        fs::write(dir.join(filename), bytes).map_err(io_error)?;
        Ok(MediaFile {
            filename: filename.to_string(),
            url: format!("media/{filename}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdedit_core::EditSession;

    #[test]
    fn test_session_saves_to_file() {
        let path = std::env::temp_dir().join(format!("mdedit-store-{}.md", std::process::id()));
        let store = FileStore::new(path.clone());
        let mut session = EditSession::new(DocumentId::project("local"), "");
        session.toggle_mode();

        session.save(&store, "# Notes\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Notes\n");
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_upload_writes_beside_document() {
        let dir = std::env::temp_dir().join(format!("mdedit-upload-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let store = FileStore::new(dir.join("notes.md"));

        let file = store.upload_media("", "cat.png", b"png").unwrap();
        assert_eq!(file.url, "media/cat.png");
        assert_eq!(std::fs::read(dir.join("media/cat.png")).unwrap(), b"png");
        std::fs::remove_dir_all(dir).unwrap();
    }
}
