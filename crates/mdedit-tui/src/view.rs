//! Terminal-side mirror of everything the toolbar asks to show.

use mdedit_core::{
    Buffer, Dropdown, ReferenceKind, ReferenceListView, Selection, TableGrid, TextDelta,
    ViewBinding,
};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct TerminalView {
    pub text: String,
    pub selection: Selection,
    pub version: u64,
    pub dropdown: Option<Dropdown>,
    pub listings: HashMap<ReferenceKind, ReferenceListView>,
    pub table: Option<TableGrid>,
    pub shortcuts_visible: bool,
    pub alert: Option<String>,
}

impl TerminalView {
    pub fn listing(&self, kind: ReferenceKind) -> &ReferenceListView {
        self.listings
            .get(&kind)
            .unwrap_or(&ReferenceListView::Loading)
    }

    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }
}

impl ViewBinding for TerminalView {
    fn render_buffer(&mut self, buffer: &Buffer, delta: Option<&TextDelta>) {
        if let Some(delta) = delta {
            tracing::trace!(version = delta.version, start = delta.start, "buffer changed");
        }
        self.text = buffer.text().to_string();
        self.selection = buffer.selection();
        self.version = buffer.version();
    }

    fn show_dropdown(&mut self, dropdown: Option<Dropdown>) {
        self.dropdown = dropdown;
    }

    fn render_references(&mut self, kind: ReferenceKind, listing: ReferenceListView) {
        self.listings.insert(kind, listing);
    }

    fn show_table_builder(&mut self, grid: Option<&TableGrid>) {
        self.table = grid.cloned();
    }

    fn show_shortcuts(&mut self) {
        self.shortcuts_visible = true;
    }

    fn alert(&mut self, message: &str) {
        tracing::info!(message, "alert");
        self.alert = Some(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdedit_core::{Command, FormatCommand, TableBuilder, TableCommand, TextEditingToolbar};

    #[test]
    fn test_view_mirrors_toolbar() {
        let mut toolbar = TextEditingToolbar::new(TerminalView::default(), TableBuilder::new(2, 3));
        toolbar.attach("x");
        toolbar.set_selection(Selection::new(0, 1)).unwrap();
        toolbar.execute(Command::Format(FormatCommand::Bold)).unwrap();
        assert_eq!(toolbar.view().text, "**x**");
        assert_eq!(toolbar.view().selection, Selection::new(2, 3));

        toolbar.execute(Command::Table(TableCommand::Open)).unwrap();
        assert_eq!(toolbar.view().table.as_ref().map(TableGrid::cols), Some(3));
    }
}
