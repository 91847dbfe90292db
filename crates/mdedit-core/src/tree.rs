//! Navigation tree state: folder expansion, folder menus, collapsible cards and renames.

use crate::api::{ArticleId, ContentStore, FolderId};
use crate::error::ApiError;
use std::collections::{BTreeMap, HashMap};

/// Key under which the quick guide visibility is stored.
pub const QUICK_GUIDE_KEY: &str = "quickGuideHidden";

/// Persistent string preferences (browser local storage, a config file, ...).
pub trait PreferenceStore {
    /// Read a value.
    fn get(&self, key: &str) -> Option<String>;
    /// Write a value.
    fn set(&mut self, key: &str, value: &str);

    /// Read a `"true"`/`"false"` flag.
    fn get_flag(&self, key: &str) -> Option<bool> {
        match self.get(key)?.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    /// Write a flag as `"true"`/`"false"`.
    fn set_flag(&mut self, key: &str, value: bool) {
        self.set(key, if value { "true" } else { "false" });
    }
}

/// In-memory [`PreferenceStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    values: HashMap<String, String>,
}

impl MemoryPreferences {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

fn folder_key(folder_id: FolderId) -> String {
    format!("folder-{folder_id}")
}

/// Expansion and menu state of the folder tree.
#[derive(Debug, Clone, Default)]
pub struct FolderTree {
    expanded: BTreeMap<FolderId, bool>,
    open_menu: Option<FolderId>,
}

impl FolderTree {
    /// Tree over `folders`, restoring each folder's stored state or falling back to
    /// `default_expanded`.
    pub fn restore<P: PreferenceStore + ?Sized>(
        folders: impl IntoIterator<Item = FolderId>,
        default_expanded: bool,
        prefs: &P,
    ) -> Self {
        let expanded = folders
            .into_iter()
            .map(|id| {
                let state = prefs.get_flag(&folder_key(id)).unwrap_or(default_expanded);
                (id, state)
            })
            .collect();
        Self {
            expanded,
            open_menu: None,
        }
    }

    /// Whether `folder_id` is expanded. Unknown folders are collapsed.
    pub fn is_expanded(&self, folder_id: FolderId) -> bool {
        self.expanded.get(&folder_id).copied().unwrap_or(false)
    }

    /// Flip a folder and persist the new state. Returns the new state.
    pub fn toggle<P: PreferenceStore + ?Sized>(&mut self, folder_id: FolderId, prefs: &mut P) -> bool {
        let state = !self.is_expanded(folder_id);
        self.expanded.insert(folder_id, state);
        prefs.set_flag(&folder_key(folder_id), state);
        state
    }

    /// The folder whose menu is open.
    pub fn open_menu(&self) -> Option<FolderId> {
        self.open_menu
    }

    /// Toggle a folder's menu, closing any other. Returns whether it is now open.
    pub fn toggle_menu(&mut self, folder_id: FolderId) -> bool {
        if self.open_menu == Some(folder_id) {
            self.open_menu = None;
            false
        } else {
            self.open_menu = Some(folder_id);
            true
        }
    }

    /// Close any open menu (click outside).
    pub fn close_menus(&mut self) {
        self.open_menu = None;
    }
}

/// A collapsible card section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disclosure {
    expanded: bool,
}

impl Disclosure {
    /// New card in the given state.
    pub fn new(expanded: bool) -> Self {
        Self { expanded }
    }

    /// Whether the body is shown.
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Flip and return the new state.
    pub fn toggle(&mut self) -> bool {
        self.expanded = !self.expanded;
        self.expanded
    }
}

/// Whether the quick guide should be shown.
pub fn quick_guide_visible<P: PreferenceStore + ?Sized>(prefs: &P) -> bool {
    !prefs.get_flag(QUICK_GUIDE_KEY).unwrap_or(false)
}

/// Persist quick guide visibility.
pub fn set_quick_guide_visible<P: PreferenceStore + ?Sized>(prefs: &mut P, visible: bool) {
    prefs.set_flag(QUICK_GUIDE_KEY, !visible);
}

/// Result of a rename attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    /// The name was blank or unchanged; nothing was sent.
    Unchanged,
    /// The server stored this name.
    Renamed(String),
}

fn normalized_new_name(current: &str, proposed: &str) -> Option<String> {
    let proposed = proposed.trim();
    (!proposed.is_empty() && proposed != current).then(|| proposed.to_string())
}

/// Rename a folder. Blank or unchanged names are a no-op.
pub fn rename_folder<S: ContentStore + ?Sized>(
    store: &S,
    project: &str,
    folder_id: FolderId,
    current: &str,
    proposed: &str,
) -> Result<RenameOutcome, ApiError> {
    let Some(name) = normalized_new_name(current, proposed) else {
        return Ok(RenameOutcome::Unchanged);
    };
    let stored = store
        .rename_folder(project, folder_id, &name)
        .inspect_err(|err| tracing::warn!(folder_id, error = %err, "folder rename failed"))?;
    Ok(RenameOutcome::Renamed(stored))
}

/// Rename an article. Blank or unchanged titles are a no-op.
pub fn rename_article<S: ContentStore + ?Sized>(
    store: &S,
    project: &str,
    article_id: ArticleId,
    current: &str,
    proposed: &str,
) -> Result<RenameOutcome, ApiError> {
    let Some(title) = normalized_new_name(current, proposed) else {
        return Ok(RenameOutcome::Unchanged);
    };
    let stored = store
        .rename_article(project, article_id, &title)
        .inspect_err(|err| tracing::warn!(article_id, error = %err, "article rename failed"))?;
    Ok(RenameOutcome::Renamed(stored))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_state_persists() {
        let mut prefs = MemoryPreferences::new();
        let mut tree = FolderTree::restore([1, 2], true, &prefs);
        assert!(tree.is_expanded(1));

        assert!(!tree.toggle(1, &mut prefs));
        assert_eq!(prefs.get("folder-1").as_deref(), Some("false"));

        let restored = FolderTree::restore([1, 2], true, &prefs);
        assert!(!restored.is_expanded(1));
        assert!(restored.is_expanded(2));
    }

    #[test]
    fn test_one_menu_open() {
        let mut tree = FolderTree::default();
        assert!(tree.toggle_menu(1));
        assert!(tree.toggle_menu(2));
        assert_eq!(tree.open_menu(), Some(2));
        assert!(!tree.toggle_menu(2));
        tree.toggle_menu(3);
        tree.close_menus();
        assert_eq!(tree.open_menu(), None);
    }

    #[test]
    fn test_quick_guide_preference() {
        let mut prefs = MemoryPreferences::new();
        assert!(quick_guide_visible(&prefs));
        set_quick_guide_visible(&mut prefs, false);
        assert_eq!(prefs.get(QUICK_GUIDE_KEY).as_deref(), Some("true"));
        assert!(!quick_guide_visible(&prefs));
    }

    #[test]
    fn test_disclosure_toggles() {
        let mut card = Disclosure::new(true);
        assert!(!card.toggle());
        assert!(!card.is_expanded());
    }

    #[test]
    fn test_normalized_new_name() {
        assert_eq!(normalized_new_name("Old", "  "), None);
        assert_eq!(normalized_new_name("Old", " Old "), None);
        assert_eq!(normalized_new_name("Old", " New "), Some("New".to_string()));
    }
}
