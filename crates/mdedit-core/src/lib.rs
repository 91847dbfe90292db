#![warn(missing_docs)]
//! mdedit Core - Headless Markdown Editing Toolbar
//!
//! # Overview
//!
//! `mdedit-core` is the interactive editing surface of a wiki/CMS, without any widgets. It owns a
//! markdown buffer and its selection, and turns toolbar actions into string splices: wrapping,
//! line prefixes, headings, smart list continuation, reference links and tables. Rendering goes
//! through the [`ViewBinding`] trait; the server is reached through the traits in [`api`].
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Sessions, Search, Tree, Media library      │  ← Page-level state
//! ├─────────────────────────────────────────────┤
//! │  TextEditingToolbar (Command interface)     │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Reference pickers  │  Table builder        │  ← Components
//! ├─────────────────────────────────────────────┤
//! │  Format actions, list continuation          │  ← Pure splices
//! ├─────────────────────────────────────────────┤
//! │  Buffer + Selection + TextDelta             │  ← Text storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use mdedit_core::{
//!     Command, EditCommand, FormatCommand, HeadlessView, Selection, TableBuilder,
//!     TextEditingToolbar,
//! };
//!
//! let mut toolbar = TextEditingToolbar::new(HeadlessView::new(), TableBuilder::default());
//! toolbar.attach("- first");
//!
//! // Enter at the end of a list item starts the next one.
//! toolbar.set_selection(Selection::caret(7)).unwrap();
//! toolbar.execute(Command::Edit(EditCommand::Newline)).unwrap();
//! assert_eq!(toolbar.text(), Some("- first\n- "));
//!
//! toolbar.execute(Command::Edit(EditCommand::InsertText { text: "second".to_string() })).unwrap();
//! toolbar.set_selection(Selection::new(10, 16)).unwrap();
//! toolbar.execute(Command::Format(FormatCommand::Bold)).unwrap();
//! assert_eq!(toolbar.text(), Some("- first\n- **second**"));
//! ```
//!
//! # Module Description
//!
//! - [`format`] - Wrap, line transform, heading, rule and code block splices
//! - [`lists`] - Smart list continuation on Enter
//! - [`reference`] - Media and article pickers
//! - [`media`] - Media sidebar and image uploads
//! - [`table`] - Table grid and builder
//! - [`toolbar`] - The toolbar component and its command enum
//! - [`shortcuts`] - Keyboard shortcut mapping
//! - [`session`] - Read/edit sessions, save and cancel
//! - [`search`] - Debounced global search
//! - [`tree`] - Navigation tree state and renames
//! - [`api`] - Server collaborator traits and wire types

pub mod api;
pub mod buffer;
pub mod config;
pub mod delta;
pub mod error;
pub mod format;
pub mod lists;
pub mod media;
pub mod reference;
pub mod search;
pub mod session;
pub mod shortcuts;
pub mod table;
mod text;
pub mod toolbar;
pub mod tree;
pub mod view;

pub use api::{
    ArticleId, ArticleSummary, ContentStore, DocumentId, FieldChange, FieldId, FolderId,
    ListingApi, MediaFile, SearchApi, SearchResponse, SearchResult,
};
pub use buffer::{Buffer, Selection, Splice};
pub use config::EditorConfig;
pub use delta::TextDelta;
pub use error::{ApiError, ConfigError, SessionError, TableError, ToolbarError};
pub use format::{FormatAction, LineTransform};
pub use lists::{ListItem, continue_list};
pub use media::MediaLibrary;
pub use reference::{
    LoadState, ProjectReferences, ReferenceItem, ReferenceKind, ReferenceListing,
    ReferencePicker, ReferenceProvider,
};
pub use search::{SearchController, SearchView};
pub use session::{CancelOutcome, EditSession, Mode, SaveOutcome};
pub use shortcuts::{Key, KeyPress, Shortcut};
pub use table::{TableBuilder, TableGrid};
pub use toolbar::{
    Command, CommandResult, DropdownCommand, EditCommand, FormatCommand, TableCommand,
    TextEditingToolbar,
};
pub use tree::{Disclosure, FolderTree, MemoryPreferences, PreferenceStore, RenameOutcome};
pub use view::{Dropdown, HeadlessView, ReferenceListView, ViewBinding, ViewEvent};
