//! Toolbar Component
//!
//! [`TextEditingToolbar`] is the one stateful object behind a markdown text area. It owns the
//! buffer, the media and article pickers, the open-dropdown state and the table builder, and it
//! reaches the screen only through a [`ViewBinding`].
//!
//! # Example
//!
//! ```rust
//! use mdedit_core::{Command, FormatCommand, HeadlessView, Selection, TableBuilder, TextEditingToolbar};
//!
//! let mut toolbar = TextEditingToolbar::new(HeadlessView::new(), TableBuilder::default());
//! toolbar.attach("hello world");
//! toolbar.set_selection(Selection::new(0, 5)).unwrap();
//! toolbar.execute(Command::Format(FormatCommand::Bold)).unwrap();
//!
//! assert_eq!(toolbar.text(), Some("**hello** world"));
//! ```

use crate::buffer::{Buffer, Selection, Splice};
use crate::delta::TextDelta;
use crate::error::{ApiError, ToolbarError};
use crate::format::{self, FormatAction, LineTransform};
use crate::lists;
use crate::reference::{LoadState, ReferenceItem, ReferenceKind, ReferencePicker, ReferenceProvider};
use crate::table::TableBuilder;
use crate::view::{Dropdown, ViewBinding};

/// Plain text editing commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    /// Replace the selection with `text`; caret after it.
    InsertText {
        /// Text to insert.
        text: String,
    },
    /// Move the selection (clamped).
    SetSelection {
        /// New selection.
        selection: Selection,
    },
    /// Enter key: continue or exit a list, otherwise insert `\n`.
    Newline,
    /// Backspace: delete the selection, or the character before the caret.
    DeleteBackward,
    /// Replace the whole buffer (restoring a server value).
    ReplaceAll {
        /// New buffer contents.
        text: String,
    },
}

/// Formatting commands (toolbar buttons and shortcuts).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatCommand {
    /// `**bold**`
    Bold,
    /// `*italic*`
    Italic,
    /// `~~strikethrough~~`
    Strikethrough,
    /// `` `code` ``
    InlineCode,
    /// Fenced code block.
    CodeBlock,
    /// `> ` on every selected line.
    Quote,
    /// `- ` on every selected line.
    UnorderedList,
    /// `1. `, `2. `, ... on every selected line.
    OrderedList,
    /// `\n---\n`
    HorizontalRule,
    /// `#`-prefix of the given level.
    Heading {
        /// Level 1..=6.
        level: u8,
    },
    /// Arbitrary wrap.
    Wrap {
        /// Text before the selection.
        prefix: String,
        /// Text after the selection.
        suffix: String,
    },
}

impl FormatCommand {
    /// The pure action behind this command.
    pub fn action(&self) -> FormatAction {
        match self {
            FormatCommand::Bold => FormatAction::bold(),
            FormatCommand::Italic => FormatAction::italic(),
            FormatCommand::Strikethrough => FormatAction::strikethrough(),
            FormatCommand::InlineCode => FormatAction::inline_code(),
            FormatCommand::CodeBlock => FormatAction::CodeBlock,
            FormatCommand::Quote => FormatAction::Lines(LineTransform::Quote),
            FormatCommand::UnorderedList => FormatAction::Lines(LineTransform::UnorderedList),
            FormatCommand::OrderedList => FormatAction::Lines(LineTransform::OrderedList),
            FormatCommand::HorizontalRule => FormatAction::HorizontalRule,
            FormatCommand::Heading { level } => FormatAction::Heading(*level),
            FormatCommand::Wrap { prefix, suffix } => FormatAction::wrap(prefix, suffix),
        }
    }
}

/// Dropdown and reference picker commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropdownCommand {
    /// Open `dropdown` (closing any other), or close it if already open.
    Toggle(Dropdown),
    /// Close every dropdown (outside click, Escape).
    CloseAll,
    /// Update a picker's filter term.
    Filter {
        /// Which picker.
        kind: ReferenceKind,
        /// Search term.
        term: String,
    },
    /// Insert the `index`-th visible item of a picker.
    Select {
        /// Which picker.
        kind: ReferenceKind,
        /// Index into the filtered list.
        index: usize,
    },
}

/// Table builder commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableCommand {
    /// Open the builder with a fresh default-size grid.
    Open,
    /// Resize the grid.
    Resize {
        /// Row count, header included.
        rows: usize,
        /// Column count.
        cols: usize,
    },
    /// Resize from raw text inputs; unparsable values become 1.
    ResizeFromInput {
        /// Raw row count.
        rows: String,
        /// Raw column count.
        cols: String,
    },
    /// Edit one cell.
    SetCell {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
        /// Cell text.
        text: String,
    },
    /// Insert the table at the caret and close the builder.
    Insert,
    /// Close the builder without inserting.
    Cancel,
}

/// Unified toolbar command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Text editing
    Edit(EditCommand),
    /// Formatting
    Format(FormatCommand),
    /// Dropdowns and pickers
    Dropdown(DropdownCommand),
    /// Table builder
    Table(TableCommand),
    /// Show the shortcut help
    ShowShortcuts,
}

/// Command execution result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Success, nothing to report.
    Success,
    /// The buffer changed; the new selection.
    Edited(Selection),
    /// The command did not apply; the host should run its default behavior.
    NotHandled,
    /// A picker needs its list and no provider is installed; the host should fetch it and call
    /// [`TextEditingToolbar::complete_reference_load`].
    LoadRequested(ReferenceKind),
    /// The filtered picker list now has `visible` items.
    Filtered {
        /// Number of matching items.
        visible: usize,
    },
}

/// Markdown toolbar bound to one text area.
pub struct TextEditingToolbar<V: ViewBinding> {
    view: V,
    buffer: Option<Buffer>,
    media: ReferencePicker,
    articles: ReferencePicker,
    open_dropdown: Option<Dropdown>,
    table: TableBuilder,
    provider: Option<Box<dyn ReferenceProvider>>,
    last_text_delta: Option<TextDelta>,
}

impl<V: ViewBinding> TextEditingToolbar<V> {
    /// Create a detached toolbar drawing through `view`.
    pub fn new(view: V, table: TableBuilder) -> Self {
        Self {
            view,
            buffer: None,
            media: ReferencePicker::new(ReferenceKind::Media),
            articles: ReferencePicker::new(ReferenceKind::Article),
            open_dropdown: None,
            table,
            provider: None,
            last_text_delta: None,
        }
    }

    /// Fetch picker lists synchronously through `provider` when a picker is first opened.
    pub fn with_reference_provider(mut self, provider: Box<dyn ReferenceProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Start an editing session on `text`, caret at the start.
    ///
    /// Any previous session state (picker caches, dropdowns, table grid) is discarded.
    pub fn attach(&mut self, text: impl Into<String>) {
        self.reset_session();
        let buffer = Buffer::new(text);
        self.view.render_buffer(&buffer, None);
        self.buffer = Some(buffer);
        tracing::debug!("toolbar attached");
    }

    /// End the session, returning the final text if one was attached.
    pub fn detach(&mut self) -> Option<String> {
        self.reset_session();
        let text = self.buffer.take().map(|buffer| buffer.text().to_string());
        if text.is_some() {
            tracing::debug!("toolbar detached");
        }
        text
    }

    fn reset_session(&mut self) {
        self.media.reset();
        self.articles.reset();
        self.table.cancel();
        self.last_text_delta = None;
        if self.open_dropdown.take().is_some() {
            self.view.show_dropdown(None);
        }
    }

    /// Whether a session is active.
    pub fn is_attached(&self) -> bool {
        self.buffer.is_some()
    }

    /// The attached buffer.
    pub fn buffer(&self) -> Option<&Buffer> {
        self.buffer.as_ref()
    }

    /// The attached buffer text.
    pub fn text(&self) -> Option<&str> {
        self.buffer.as_ref().map(Buffer::text)
    }

    /// The rendering surface.
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Mutable access to the rendering surface.
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// The currently open dropdown.
    pub fn open_dropdown(&self) -> Option<Dropdown> {
        self.open_dropdown
    }

    /// The picker for `kind`.
    pub fn picker(&self, kind: ReferenceKind) -> &ReferencePicker {
        match kind {
            ReferenceKind::Media => &self.media,
            ReferenceKind::Article => &self.articles,
        }
    }

    fn picker_mut(&mut self, kind: ReferenceKind) -> &mut ReferencePicker {
        match kind {
            ReferenceKind::Media => &mut self.media,
            ReferenceKind::Article => &mut self.articles,
        }
    }

    /// The table builder.
    pub fn table_builder(&self) -> &TableBuilder {
        &self.table
    }

    /// Structured delta of the last `execute()` call that changed the text.
    pub fn last_text_delta(&self) -> Option<&TextDelta> {
        self.last_text_delta.as_ref()
    }

    /// Take the last text delta.
    pub fn take_last_text_delta(&mut self) -> Option<TextDelta> {
        self.last_text_delta.take()
    }

    /// Shorthand for [`EditCommand::SetSelection`].
    pub fn set_selection(&mut self, selection: Selection) -> Result<Selection, ToolbarError> {
        let buffer = self.buffer.as_mut().ok_or(ToolbarError::Detached)?;
        Ok(buffer.set_selection(selection))
    }

    /// Execute a command.
    pub fn execute(&mut self, command: Command) -> Result<CommandResult, ToolbarError> {
        self.last_text_delta = None;
        if self.buffer.is_none() {
            return Err(ToolbarError::Detached);
        }
        tracing::debug!(?command, "toolbar command");

        match command {
            Command::Edit(edit) => self.execute_edit(edit),
            Command::Format(format) => self.execute_format(format),
            Command::Dropdown(dropdown) => self.execute_dropdown(dropdown),
            Command::Table(table) => self.execute_table(table),
            Command::ShowShortcuts => {
                self.view.show_shortcuts();
                Ok(CommandResult::Success)
            }
        }
    }

    /// Execute commands in order, stopping at the first error.
    pub fn execute_batch(
        &mut self,
        commands: Vec<Command>,
    ) -> Result<Vec<CommandResult>, ToolbarError> {
        commands
            .into_iter()
            .map(|command| self.execute(command))
            .collect()
    }

    /// Deliver a picker list fetched by the host after [`CommandResult::LoadRequested`].
    ///
    /// A failure is alerted once; the picker shows its error state until reopened.
    pub fn complete_reference_load(
        &mut self,
        kind: ReferenceKind,
        result: Result<Vec<ReferenceItem>, ApiError>,
    ) {
        let failed = self.picker_mut(kind).complete_load(result).clone();
        if let LoadState::Failed(_) = failed {
            self.view.alert(&format!("Failed to load {}", kind.name()));
        }
        self.render_picker(kind);
    }

    /// Forget the cached list for `kind`, e.g. after a media upload.
    ///
    /// When that picker is open it loads again right away, so the result may be
    /// [`CommandResult::LoadRequested`]; otherwise the next open fetches a fresh list.
    pub fn invalidate_references(&mut self, kind: ReferenceKind) -> CommandResult {
        self.picker_mut(kind).invalidate();
        let open = self.open_dropdown.and_then(Dropdown::reference_kind) == Some(kind);
        if !open {
            return CommandResult::Success;
        }
        self.load_picker(kind)
    }

    fn execute_edit(&mut self, command: EditCommand) -> Result<CommandResult, ToolbarError> {
        let (text, selection) = self.snapshot()?;
        match command {
            EditCommand::InsertText { text: inserted } => {
                let caret = selection.start + inserted.chars().count();
                self.apply(Splice {
                    start: selection.start,
                    end: selection.end,
                    insert: inserted,
                    selection: Selection::caret(caret),
                })
            }
            EditCommand::SetSelection { selection } => {
                self.set_selection(selection)?;
                Ok(CommandResult::Success)
            }
            EditCommand::Newline => match lists::continue_list(&text, selection) {
                Some(splice) => self.apply(splice),
                None => self.execute_edit(EditCommand::InsertText {
                    text: "\n".to_string(),
                }),
            },
            EditCommand::DeleteBackward => {
                if selection.is_caret() && selection.start == 0 {
                    return Ok(CommandResult::NotHandled);
                }
                let start = if selection.is_caret() {
                    selection.start - 1
                } else {
                    selection.start
                };
                self.apply(Splice {
                    start,
                    end: selection.end,
                    insert: String::new(),
                    selection: Selection::caret(start),
                })
            }
            EditCommand::ReplaceAll { text } => {
                let buffer = self.buffer.as_mut().ok_or(ToolbarError::Detached)?;
                let delta = buffer.replace_all(text);
                Ok(self.finish_edit(delta))
            }
        }
    }

    fn execute_format(&mut self, command: FormatCommand) -> Result<CommandResult, ToolbarError> {
        let (text, selection) = self.snapshot()?;
        let splice = command.action().splice(&text, selection)?;
        if matches!(command, FormatCommand::Heading { .. })
            && self.open_dropdown == Some(Dropdown::Heading)
        {
            self.close_dropdowns();
        }
        self.apply(splice)
    }

    fn execute_dropdown(
        &mut self,
        command: DropdownCommand,
    ) -> Result<CommandResult, ToolbarError> {
        match command {
            DropdownCommand::Toggle(dropdown) => self.toggle_dropdown(dropdown),
            DropdownCommand::CloseAll => {
                self.close_dropdowns();
                Ok(CommandResult::Success)
            }
            DropdownCommand::Filter { kind, term } => {
                self.picker_mut(kind).set_filter(term);
                self.render_picker(kind);
                Ok(CommandResult::Filtered {
                    visible: self.picker(kind).visible().len(),
                })
            }
            DropdownCommand::Select { kind, index } => {
                let picker = self.picker(kind);
                let item = picker.visible_item(index).ok_or_else(|| {
                    ToolbarError::ReferenceOutOfRange {
                        index,
                        len: picker.visible().len(),
                    }
                })?;
                let markdown = item.markdown(kind);
                let (text, selection) = self.snapshot()?;
                let splice = format::insert_at_caret(&text, selection, &markdown);
                self.close_dropdowns();
                let result = self.apply(splice)?;
                self.view.focus_buffer();
                Ok(result)
            }
        }
    }

    fn toggle_dropdown(&mut self, dropdown: Dropdown) -> Result<CommandResult, ToolbarError> {
        if self.open_dropdown == Some(dropdown) {
            self.close_dropdowns();
            return Ok(CommandResult::Success);
        }

        self.open_dropdown = Some(dropdown);
        self.view.show_dropdown(Some(dropdown));

        match dropdown.reference_kind() {
            Some(kind) => Ok(self.load_picker(kind)),
            None => Ok(CommandResult::Success),
        }
    }

    /// Fetch the list for `kind` unless it is cached or in flight, then render it.
    fn load_picker(&mut self, kind: ReferenceKind) -> CommandResult {
        let result = if let Some(provider) = self.provider.as_deref() {
            let picker = match kind {
                ReferenceKind::Media => &mut self.media,
                ReferenceKind::Article => &mut self.articles,
            };
            if picker.load(provider).is_err() {
                self.view.alert(&format!("Failed to load {}", kind.name()));
            }
            CommandResult::Success
        } else if self.picker_mut(kind).begin_load() {
            CommandResult::LoadRequested(kind)
        } else {
            CommandResult::Success
        };
        self.render_picker(kind);
        result
    }

    fn close_dropdowns(&mut self) {
        if self.open_dropdown.take().is_some() {
            self.view.show_dropdown(None);
        }
    }

    fn render_picker(&mut self, kind: ReferenceKind) {
        let listing = match kind {
            ReferenceKind::Media => self.media.listing().into(),
            ReferenceKind::Article => self.articles.listing().into(),
        };
        self.view.render_references(kind, listing);
    }

    fn execute_table(&mut self, command: TableCommand) -> Result<CommandResult, ToolbarError> {
        match command {
            TableCommand::Open => {
                self.close_dropdowns();
                let grid = self.table.open();
                self.view.show_table_builder(Some(grid));
            }
            TableCommand::Resize { rows, cols } => {
                let grid = self.table.resize(rows, cols)?;
                self.view.show_table_builder(Some(grid));
            }
            TableCommand::ResizeFromInput { rows, cols } => {
                let grid = self.table.resize_from_input(&rows, &cols)?;
                self.view.show_table_builder(Some(grid));
            }
            TableCommand::SetCell { row, col, text } => {
                self.table.set_cell(row, col, text)?;
                self.view.show_table_builder(self.table.grid());
            }
            TableCommand::Insert => {
                let block = self.table.take_block()?;
                let (text, selection) = self.snapshot()?;
                let splice = format::insert_at_caret(&text, selection, &block);
                self.view.show_table_builder(None);
                let result = self.apply(splice)?;
                self.view.focus_buffer();
                return Ok(result);
            }
            TableCommand::Cancel => {
                self.table.cancel();
                self.view.show_table_builder(None);
            }
        }
        Ok(CommandResult::Success)
    }

    fn snapshot(&self) -> Result<(String, Selection), ToolbarError> {
        let buffer = self.buffer.as_ref().ok_or(ToolbarError::Detached)?;
        Ok((buffer.text().to_string(), buffer.selection()))
    }

    fn apply(&mut self, splice: Splice) -> Result<CommandResult, ToolbarError> {
        let buffer = self.buffer.as_mut().ok_or(ToolbarError::Detached)?;
        let delta = buffer.apply(&splice);
        Ok(self.finish_edit(delta))
    }

    fn finish_edit(&mut self, delta: TextDelta) -> CommandResult {
        let selection = delta.selection;
        if let Some(buffer) = &self.buffer {
            self.view.render_buffer(buffer, Some(&delta));
        }
        self.last_text_delta = Some(delta);
        CommandResult::Edited(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{HeadlessView, ViewEvent};
    use pretty_assertions::assert_eq;

    fn toolbar(text: &str) -> TextEditingToolbar<HeadlessView> {
        let mut toolbar = TextEditingToolbar::new(HeadlessView::new(), TableBuilder::new(2, 2));
        toolbar.attach(text);
        toolbar
    }

    #[test]
    fn test_detached_toolbar_rejects_commands() {
        let mut toolbar = TextEditingToolbar::new(HeadlessView::new(), TableBuilder::default());
        assert_eq!(
            toolbar.execute(Command::Format(FormatCommand::Bold)),
            Err(ToolbarError::Detached)
        );
        toolbar.attach("x");
        assert_eq!(toolbar.detach().as_deref(), Some("x"));
        assert_eq!(
            toolbar.execute(Command::ShowShortcuts),
            Err(ToolbarError::Detached)
        );
    }

    #[test]
    fn test_newline_continues_list() {
        let mut toolbar = toolbar("- first");
        toolbar.set_selection(Selection::caret(7)).unwrap();
        let result = toolbar.execute(Command::Edit(EditCommand::Newline)).unwrap();
        assert_eq!(result, CommandResult::Edited(Selection::caret(10)));
        assert_eq!(toolbar.text(), Some("- first\n- "));
        assert!(toolbar.last_text_delta().is_some());
    }

    #[test]
    fn test_newline_plain_line_inserts_newline() {
        let mut toolbar = toolbar("ab");
        toolbar.set_selection(Selection::caret(1)).unwrap();
        toolbar.execute(Command::Edit(EditCommand::Newline)).unwrap();
        assert_eq!(toolbar.text(), Some("a\nb"));
    }

    #[test]
    fn test_delete_backward() {
        let mut toolbar = toolbar("abc");
        assert_eq!(
            toolbar.execute(Command::Edit(EditCommand::DeleteBackward)),
            Ok(CommandResult::NotHandled)
        );
        toolbar.set_selection(Selection::caret(3)).unwrap();
        toolbar.execute(Command::Edit(EditCommand::DeleteBackward)).unwrap();
        assert_eq!(toolbar.text(), Some("ab"));
    }

    #[test]
    fn test_dropdowns_are_exclusive() {
        let mut toolbar = toolbar("");
        toolbar
            .execute(Command::Dropdown(DropdownCommand::Toggle(Dropdown::Heading)))
            .unwrap();
        let result = toolbar
            .execute(Command::Dropdown(DropdownCommand::Toggle(Dropdown::Media)))
            .unwrap();
        assert_eq!(result, CommandResult::LoadRequested(ReferenceKind::Media));
        assert_eq!(toolbar.open_dropdown(), Some(Dropdown::Media));

        toolbar
            .execute(Command::Dropdown(DropdownCommand::Toggle(Dropdown::Media)))
            .unwrap();
        assert_eq!(toolbar.open_dropdown(), None);
        assert_eq!(toolbar.view().last_dropdown(), Some(None));
    }

    #[test]
    fn test_failed_host_load_alerts_once() {
        let mut toolbar = toolbar("");
        toolbar
            .execute(Command::Dropdown(DropdownCommand::Toggle(Dropdown::Article)))
            .unwrap();
        toolbar.complete_reference_load(
            ReferenceKind::Article,
            Err(ApiError::Transport("offline".to_string())),
        );
        assert_eq!(toolbar.view().alerts(), vec!["Failed to load articles"]);
        assert!(toolbar.view().events().iter().any(|event| matches!(
            event,
            ViewEvent::References(ReferenceKind::Article, crate::view::ReferenceListView::Failed(_))
        )));
    }

    #[test]
    fn test_heading_closes_heading_dropdown() {
        let mut toolbar = toolbar("Title");
        toolbar
            .execute(Command::Dropdown(DropdownCommand::Toggle(Dropdown::Heading)))
            .unwrap();
        toolbar
            .execute(Command::Format(FormatCommand::Heading { level: 2 }))
            .unwrap();
        assert_eq!(toolbar.text(), Some("## Title"));
        assert_eq!(toolbar.open_dropdown(), None);
    }

    #[test]
    fn test_invalid_heading_leaves_buffer() {
        let mut toolbar = toolbar("Title");
        assert_eq!(
            toolbar.execute(Command::Format(FormatCommand::Heading { level: 9 })),
            Err(ToolbarError::InvalidHeadingLevel(9))
        );
        assert_eq!(toolbar.text(), Some("Title"));
        assert!(toolbar.last_text_delta().is_none());
    }
}
