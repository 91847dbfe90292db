use mdedit_core::{
    ApiError, ArticleId, CancelOutcome, ContentStore, DocumentId, EditSession, FieldChange,
    FieldId, FolderId, MediaFile, Mode, ReferenceItem, SaveOutcome, SessionError,
};
use pretty_assertions::assert_eq;
use std::cell::RefCell;

#[derive(Default)]
struct RecordingStore {
    calls: RefCell<Vec<String>>,
    fail_body: bool,
    fail_field: Option<FieldId>,
}

impl ContentStore for RecordingStore {
    fn save(&self, _document: &DocumentId, body: &str) -> Result<(), ApiError> {
        self.calls.borrow_mut().push(format!("save:{body}"));
        if self.fail_body {
            return Err(ApiError::Transport("offline".to_string()));
        }
        Ok(())
    }

    fn set_reference_field(
        &self,
        _document: &DocumentId,
        field_id: FieldId,
        _change: &FieldChange,
    ) -> Result<(), ApiError> {
        self.calls.borrow_mut().push(format!("field:{field_id}"));
        if self.fail_field == Some(field_id) {
            return Err(ApiError::Status {
                status: 500,
                url: "/api/set-prompt".to_string(),
            });
        }
        Ok(())
    }

    fn set_featured_media(&self, _document: &DocumentId, filename: &str) -> Result<(), ApiError> {
        self.calls.borrow_mut().push(format!("image:{filename}"));
        Ok(())
    }

    fn rename_folder(&self, _: &str, _: FolderId, name: &str) -> Result<String, ApiError> {
        Ok(name.to_string())
    }

    fn rename_article(&self, _: &str, _: ArticleId, title: &str) -> Result<String, ApiError> {
        Ok(title.to_string())
    }

    fn upload_media(&self, _: &str, _: &str, _: &[u8]) -> Result<MediaFile, ApiError> {
        Err(ApiError::Rejected("not used".to_string()))
    }
}

fn editing_article() -> EditSession {
    let mut session = EditSession::new(DocumentId::article("demo", 5), "original");
    session.toggle_mode();
    session
}

#[test]
fn test_cancel_declined_keeps_editing() {
    let mut session = editing_article();
    let mut asked = None;
    let outcome = session.cancel("changed", |prompt| {
        asked = Some(prompt.to_string());
        false
    });
    assert_eq!(outcome, CancelOutcome::KeepEditing);
    assert_eq!(session.mode(), Mode::Edit);
    assert_eq!(
        asked.as_deref(),
        Some("You have unsaved changes. Are you sure you want to discard them?")
    );
}

#[test]
fn test_cancel_clean_session_skips_confirm() {
    let mut session = editing_article();
    let outcome = session.cancel("original", |_| panic!("clean session must not ask"));
    assert_eq!(outcome, CancelOutcome::Reload);
    assert_eq!(session.mode(), Mode::Read);
}

#[test]
fn test_pending_field_makes_session_dirty() {
    let mut session = editing_article();
    session
        .record_field_change(2, FieldChange::text("Brave"))
        .unwrap();
    assert!(session.has_unsaved_changes("original"));
    let outcome = session.cancel("original", |_| true);
    assert_eq!(outcome, CancelOutcome::Reload);
    assert!(session.pending().is_empty());
}

#[test]
fn test_save_sends_body_then_fields() {
    let store = RecordingStore::default();
    let mut session = editing_article();
    session.record_field_change(2, FieldChange::text("x")).unwrap();
    session
        .record_field_change(1, FieldChange::linked(Some(9)))
        .unwrap();

    assert_eq!(session.save(&store, "new body"), Ok(SaveOutcome::Reload));
    assert_eq!(
        *store.calls.borrow(),
        vec!["save:new body", "field:1", "field:2"]
    );
    assert!(session.pending().is_empty());
    assert_eq!(session.original_body(), "new body");
    assert_eq!(session.mode(), Mode::Read);
}

#[test]
fn test_failed_save_keeps_pending_changes() {
    let store = RecordingStore {
        fail_field: Some(2),
        ..RecordingStore::default()
    };
    let mut session = editing_article();
    session.record_field_change(1, FieldChange::text("a")).unwrap();
    session.record_field_change(2, FieldChange::text("b")).unwrap();

    let result = session.save(&store, "body");
    assert!(matches!(result, Err(SessionError::Api(ApiError::Status { .. }))));
    assert_eq!(session.pending().keys().copied().collect::<Vec<_>>(), vec![2]);
    assert_eq!(session.mode(), Mode::Edit);
}

#[test]
fn test_failed_body_save_sends_no_fields() {
    let store = RecordingStore {
        fail_body: true,
        ..RecordingStore::default()
    };
    let mut session = editing_article();
    session.record_field_change(1, FieldChange::text("a")).unwrap();
    assert!(session.save(&store, "body").is_err());
    assert_eq!(*store.calls.borrow(), vec!["save:body"]);
    assert_eq!(session.pending().len(), 1);
    assert_eq!(session.original_body(), "original");
}

#[test]
fn test_save_requires_edit_mode() {
    let store = RecordingStore::default();
    let mut session = EditSession::new(DocumentId::project("demo"), "d");
    assert_eq!(session.save(&store, "d"), Err(SessionError::NotEditing));
}

#[test]
fn test_featured_media_from_picker() {
    let store = RecordingStore::default();
    let mut session = editing_article();
    session.featured_picker().complete_load(Ok(vec![ReferenceItem {
        identifier: "hero.jpg".to_string(),
        label: "hero.jpg".to_string(),
        secondary_label: String::new(),
    }]));

    let url = session.select_featured(&store, 0).unwrap();
    assert_eq!(url.as_deref(), Some("/projects/demo/media/files/hero.jpg"));
    assert_eq!(*store.calls.borrow(), vec!["image:hero.jpg"]);
    assert_eq!(session.select_featured(&store, 4), Ok(None));
}

#[test]
fn test_featured_media_needs_article() {
    let store = RecordingStore::default();
    let mut session = EditSession::new(DocumentId::project("demo"), "");
    assert_eq!(
        session.set_featured_media(&store, "a.png"),
        Err(SessionError::NotAnArticle)
    );
}
