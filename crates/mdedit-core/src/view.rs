//! Rendering seam between the toolbar and its host.
//!
//! The toolbar never looks up widgets; everything it shows goes through a [`ViewBinding`]. Only
//! [`ViewBinding::render_buffer`] is required, the rest default to no-ops so simple hosts stay
//! small.

use crate::buffer::Buffer;
use crate::delta::TextDelta;
use crate::reference::{ReferenceItem, ReferenceKind, ReferenceListing};
use crate::table::TableGrid;

/// The dropdowns a toolbar can open. At most one is open at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dropdown {
    /// Heading level chooser (H1..H6).
    Heading,
    /// Media reference picker.
    Media,
    /// Article reference picker.
    Article,
}

impl Dropdown {
    /// The picker behind this dropdown, if any.
    pub fn reference_kind(self) -> Option<ReferenceKind> {
        match self {
            Dropdown::Heading => None,
            Dropdown::Media => Some(ReferenceKind::Media),
            Dropdown::Article => Some(ReferenceKind::Article),
        }
    }
}

impl From<ReferenceKind> for Dropdown {
    fn from(kind: ReferenceKind) -> Self {
        match kind {
            ReferenceKind::Media => Dropdown::Media,
            ReferenceKind::Article => Dropdown::Article,
        }
    }
}

/// Owned snapshot of a picker listing, handed to [`ViewBinding::render_references`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceListView {
    /// Show a loading placeholder.
    Loading,
    /// Show "Failed to load ...".
    Failed(String),
    /// Show "No ... found".
    Empty,
    /// Show these items.
    Items(Vec<ReferenceItem>),
}

impl From<ReferenceListing<'_>> for ReferenceListView {
    fn from(listing: ReferenceListing<'_>) -> Self {
        match listing {
            ReferenceListing::Loading => ReferenceListView::Loading,
            ReferenceListing::Failed(message) => ReferenceListView::Failed(message.to_string()),
            ReferenceListing::Empty => ReferenceListView::Empty,
            ReferenceListing::Items(items) => {
                ReferenceListView::Items(items.into_iter().cloned().collect())
            }
        }
    }
}

/// Host rendering surface.
pub trait ViewBinding {
    /// Redraw the buffer. `delta` is `Some` when the text changed.
    fn render_buffer(&mut self, buffer: &Buffer, delta: Option<&TextDelta>);

    /// Return keyboard focus to the text area.
    fn focus_buffer(&mut self) {}

    /// Show `dropdown`, or hide all dropdowns on `None`.
    fn show_dropdown(&mut self, _dropdown: Option<Dropdown>) {}

    /// Redraw a picker list.
    fn render_references(&mut self, _kind: ReferenceKind, _listing: ReferenceListView) {}

    /// Show the table builder with `grid`, or hide it on `None`.
    fn show_table_builder(&mut self, _grid: Option<&TableGrid>) {}

    /// Show the keyboard shortcut help.
    fn show_shortcuts(&mut self) {}

    /// One-shot user-facing error message.
    fn alert(&mut self, _message: &str) {}
}

/// One recorded [`HeadlessView`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// `render_buffer`, with the text at that time and whether a delta was passed.
    Buffer {
        /// Rendered text.
        text: String,
        /// Whether the text changed.
        changed: bool,
    },
    /// `focus_buffer`
    Focus,
    /// `show_dropdown`
    Dropdown(Option<Dropdown>),
    /// `render_references`
    References(ReferenceKind, ReferenceListView),
    /// `show_table_builder`, with the grid size when shown.
    TableBuilder(Option<(usize, usize)>),
    /// `show_shortcuts`
    Shortcuts,
    /// `alert`
    Alert(String),
}

/// A view that records every call. Used by tests and by hosts that poll state instead.
#[derive(Debug, Clone, Default)]
pub struct HeadlessView {
    events: Vec<ViewEvent>,
}

impl HeadlessView {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, oldest first.
    pub fn events(&self) -> &[ViewEvent] {
        &self.events
    }

    /// Drain the recorded events.
    pub fn take_events(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.events)
    }

    /// Alerts shown so far.
    pub fn alerts(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ViewEvent::Alert(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    /// The last dropdown state shown, if any was.
    pub fn last_dropdown(&self) -> Option<Option<Dropdown>> {
        self.events.iter().rev().find_map(|event| match event {
            ViewEvent::Dropdown(dropdown) => Some(*dropdown),
            _ => None,
        })
    }
}

impl ViewBinding for HeadlessView {
    fn render_buffer(&mut self, buffer: &Buffer, delta: Option<&TextDelta>) {
        self.events.push(ViewEvent::Buffer {
            text: buffer.text().to_string(),
            changed: delta.is_some(),
        });
    }

    fn focus_buffer(&mut self) {
        self.events.push(ViewEvent::Focus);
    }

    fn show_dropdown(&mut self, dropdown: Option<Dropdown>) {
        self.events.push(ViewEvent::Dropdown(dropdown));
    }

    fn render_references(&mut self, kind: ReferenceKind, listing: ReferenceListView) {
        self.events.push(ViewEvent::References(kind, listing));
    }

    fn show_table_builder(&mut self, grid: Option<&TableGrid>) {
        self.events
            .push(ViewEvent::TableBuilder(grid.map(|g| (g.rows(), g.cols()))));
    }

    fn show_shortcuts(&mut self) {
        self.events.push(ViewEvent::Shortcuts);
    }

    fn alert(&mut self, message: &str) {
        self.events.push(ViewEvent::Alert(message.to_string()));
    }
}

impl<V: ViewBinding + ?Sized> ViewBinding for &mut V {
    fn render_buffer(&mut self, buffer: &Buffer, delta: Option<&TextDelta>) {
        (**self).render_buffer(buffer, delta)
    }

    fn focus_buffer(&mut self) {
        (**self).focus_buffer()
    }

    fn show_dropdown(&mut self, dropdown: Option<Dropdown>) {
        (**self).show_dropdown(dropdown)
    }

    fn render_references(&mut self, kind: ReferenceKind, listing: ReferenceListView) {
        (**self).render_references(kind, listing)
    }

    fn show_table_builder(&mut self, grid: Option<&TableGrid>) {
        (**self).show_table_builder(grid)
    }

    fn show_shortcuts(&mut self) {
        (**self).show_shortcuts()
    }

    fn alert(&mut self, message: &str) {
        (**self).alert(message)
    }
}
