use mdedit_core::tree::{rename_article, rename_folder};
use mdedit_core::{
    ApiError, ArticleId, ContentStore, DocumentId, FieldChange, FieldId, FolderId, FolderTree,
    MediaFile, MemoryPreferences, PreferenceStore, RenameOutcome,
};
use std::cell::Cell;

#[derive(Default)]
struct RenameStore {
    calls: Cell<usize>,
    reject: bool,
}

impl ContentStore for RenameStore {
    fn save(&self, _: &DocumentId, _: &str) -> Result<(), ApiError> {
        Ok(())
    }

    fn set_reference_field(&self, _: &DocumentId, _: FieldId, _: &FieldChange) -> Result<(), ApiError> {
        Ok(())
    }

    fn set_featured_media(&self, _: &DocumentId, _: &str) -> Result<(), ApiError> {
        Ok(())
    }

    fn rename_folder(&self, _: &str, _: FolderId, name: &str) -> Result<String, ApiError> {
        self.calls.set(self.calls.get() + 1);
        if self.reject {
            return Err(ApiError::Rejected("Folder name already exists".to_string()));
        }
        Ok(name.to_string())
    }

    fn rename_article(&self, _: &str, _: ArticleId, title: &str) -> Result<String, ApiError> {
        self.calls.set(self.calls.get() + 1);
        Ok(title.to_string())
    }

    fn upload_media(&self, _: &str, _: &str, _: &[u8]) -> Result<MediaFile, ApiError> {
        Err(ApiError::Rejected("not used".to_string()))
    }
}

#[test]
fn test_rename_skips_blank_and_unchanged() {
    let store = RenameStore::default();
    assert_eq!(
        rename_folder(&store, "demo", 1, "Places", "   "),
        Ok(RenameOutcome::Unchanged)
    );
    assert_eq!(
        rename_article(&store, "demo", 1, "Intro", "Intro"),
        Ok(RenameOutcome::Unchanged)
    );
    assert_eq!(store.calls.get(), 0);

    assert_eq!(
        rename_article(&store, "demo", 1, "Intro", " Prologue "),
        Ok(RenameOutcome::Renamed("Prologue".to_string()))
    );
    assert_eq!(store.calls.get(), 1);
}

#[test]
fn test_rejected_rename_surfaces_server_message() {
    let store = RenameStore {
        reject: true,
        ..RenameStore::default()
    };
    let err = rename_folder(&store, "demo", 1, "Places", "People").unwrap_err();
    assert_eq!(err.to_string(), "Folder name already exists");
}

#[test]
fn test_folder_state_survives_reload() {
    let mut prefs = MemoryPreferences::new();
    prefs.set("folder-9", "garbage");

    let mut tree = FolderTree::restore([3, 9], false, &prefs);
    assert!(!tree.is_expanded(9));
    assert!(tree.toggle(3, &mut prefs));

    let tree = FolderTree::restore([3, 9], false, &prefs);
    assert!(tree.is_expanded(3));
    assert_eq!(prefs.get_flag("folder-3"), Some(true));
}
