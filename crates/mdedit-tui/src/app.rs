//! Application state, key handling and drawing.

use crate::cursor::{display_width, line_and_column, line_end, line_start, move_vertical};
use crate::store::FileStore;
use crate::view::TerminalView;
use crate::worker::{Reply, Request, Worker};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use mdedit_core::media::{UPLOAD_FAILED, is_allowed_image};
use mdedit_core::search::highlight_ranges;
use mdedit_core::shortcuts::{SHORTCUT_HELP, resolve};
use mdedit_core::{
    ApiError, CancelOutcome, Command, CommandResult, ContentStore, DocumentId, Dropdown,
    DropdownCommand, EditCommand, EditSession, EditorConfig, Key, KeyPress, ReferenceKind,
    ReferenceListView, SearchController, SearchView, Selection, Shortcut, TableCommand,
    TextEditingToolbar,
};
use mdedit_http::HttpClient;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub struct App {
    toolbar: TextEditingToolbar<TerminalView>,
    session: EditSession,
    search: SearchController,
    store: Box<dyn ContentStore>,
    worker: Option<Worker>,
    file_path: PathBuf,
    project: String,
    /// Path typed into the upload prompt while it is open.
    upload_path: Option<String>,
    /// Fixed end of a Shift-extended selection.
    anchor: Option<usize>,
    picker_index: usize,
    table_cursor: (usize, usize),
    search_index: usize,
    scroll_top: usize,
    status: String,
    confirm_quit: bool,
    confirm_revert: bool,
    pub should_quit: bool,
}

/// Convert a crossterm key into the toolbar's key model. Ctrl chords are left to the app.
pub fn to_key_press(key: &KeyEvent) -> Option<KeyPress> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    let code = match key.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        _ => return None,
    };
    Some(KeyPress {
        key: code,
        alt: key.modifiers.contains(KeyModifiers::ALT),
    })
}

impl App {
    pub fn new(file_path: PathBuf, content: String, config: &EditorConfig) -> Self {
        let document = match config.article_id {
            Some(id) => DocumentId::article(config.project.clone(), id),
            None => DocumentId::project(config.project.clone()),
        };

        let client = if config.project.is_empty() {
            None
        } else {
            HttpClient::new(config.api_base_url.clone())
                .inspect_err(|err| tracing::warn!(error = %err, "HTTP client unavailable"))
                .ok()
        };

        let worker = client
            .clone()
            .map(|c| Worker::spawn(c, config.project.clone(), config.article_id));
        let store: Box<dyn ContentStore> = match client {
            Some(client) => Box::new(client),
            None => Box::new(FileStore::new(file_path.clone())),
        };

        let mut session = EditSession::new(document, content.clone());
        session.toggle_mode();

        let mut toolbar = TextEditingToolbar::new(TerminalView::default(), config.table_builder());
        toolbar.attach(content);

        let status = if worker.is_some() {
            format!("Connected to {} ({})", config.api_base_url, config.project)
        } else {
            "Offline: saving to file".to_string()
        };

        Self {
            toolbar,
            session,
            search: config.search_controller(),
            store,
            worker,
            file_path,
            project: config.project.clone(),
            upload_path: None,
            anchor: None,
            picker_index: 0,
            table_cursor: (0, 0),
            search_index: 0,
            scroll_top: 0,
            status,
            confirm_quit: false,
            confirm_revert: false,
            should_quit: false,
        }
    }

    fn text(&self) -> &str {
        &self.toolbar.view().text
    }

    fn selection(&self) -> Selection {
        self.toolbar.view().selection
    }

    fn execute(&mut self, command: Command) {
        match self.toolbar.execute(command) {
            Ok(CommandResult::LoadRequested(kind)) => self.request_references(kind),
            Ok(CommandResult::Edited(_)) => {
                self.anchor = None;
                self.confirm_quit = false;
                self.confirm_revert = false;
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(error = %err, "command failed");
                self.status = err.to_string();
            }
        }
        if let Some(message) = self.toolbar.view_mut().take_alert() {
            self.status = message;
        }
    }

    fn request_references(&mut self, kind: ReferenceKind) {
        let sent = self
            .worker
            .as_ref()
            .is_some_and(|worker| worker.send(Request::References(kind)));
        if !sent {
            self.toolbar.complete_reference_load(
                kind,
                Err(ApiError::Transport("no server configured".to_string())),
            );
        }
    }

    /// Drain worker replies and fire due searches.
    pub fn tick(&mut self, now: Instant) {
        while let Some(reply) = self.worker.as_ref().and_then(Worker::try_recv) {
            match reply {
                Reply::References(kind, result) => {
                    self.toolbar.complete_reference_load(kind, result);
                }
                Reply::Search(query, result) => {
                    self.search.complete(&query, result);
                }
            }
        }

        if let Some(query) = self.search.poll(now) {
            let sent = self
                .worker
                .as_ref()
                .is_some_and(|worker| worker.send(Request::Search(query.clone())));
            if !sent {
                self.search.complete(
                    &query,
                    Err(ApiError::Transport("no server configured".to_string())),
                );
            }
        }

        if let Some(message) = self.toolbar.view_mut().take_alert() {
            self.status = message;
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q') if ctrl => return self.quit(),
            KeyCode::Char('s') if ctrl => return self.save(),
            KeyCode::Char('r') if ctrl => return self.revert(),
            _ => {}
        }

        if self.search.is_open() {
            return self.handle_search_key(key);
        }
        if self.upload_path.is_some() {
            return self.handle_upload_key(key);
        }
        if self.toolbar.table_builder().is_open() {
            return self.handle_table_key(key);
        }
        if self.toolbar.view().shortcuts_visible {
            self.toolbar.view_mut().shortcuts_visible = false;
            return;
        }
        if let Some(kind) = self.toolbar.open_dropdown().and_then(Dropdown::reference_kind) {
            if self.handle_picker_key(kind, key) {
                return;
            }
        }

        match key.code {
            KeyCode::Char('t') if ctrl => {
                self.table_cursor = (0, 0);
                return self.execute(Command::Table(TableCommand::Open));
            }
            KeyCode::Char('o') if ctrl => {
                self.upload_path = Some(String::new());
                return;
            }
            KeyCode::Char('m') if key.modifiers.contains(KeyModifiers::ALT) => {
                self.picker_index = 0;
                return self.execute(Command::Dropdown(DropdownCommand::Toggle(Dropdown::Media)));
            }
            KeyCode::F(1) => return self.execute(Command::ShowShortcuts),
            _ => {}
        }

        let heading_open = self.toolbar.open_dropdown() == Some(Dropdown::Heading);
        if let Some(press) = to_key_press(&key) {
            match resolve(press, self.toolbar.open_dropdown()) {
                // The heading menu has focus; typing must not reach the buffer.
                Some(Shortcut::Toolbar(Command::Edit(_))) if heading_open => return,
                Some(Shortcut::Toolbar(command)) => {
                    self.picker_index = 0;
                    return self.execute(command);
                }
                Some(Shortcut::OpenSearch) => {
                    self.search_index = 0;
                    return self.search.open();
                }
                Some(Shortcut::Dismiss) => {
                    return self.execute(Command::Dropdown(DropdownCommand::CloseAll));
                }
                None => {}
            }
            if let Key::Char(c) = press.key {
                if !press.alt {
                    if heading_open {
                        return;
                    }
                    return self.execute(Command::Edit(EditCommand::InsertText {
                        text: c.to_string(),
                    }));
                }
            }
        }

        self.handle_motion(key);
    }

    /// Pasted text goes to whatever has focus. Single-line inputs get it flattened.
    pub fn handle_paste(&mut self, text: String) {
        let line = text.replace("\r\n", " ").replace('\n', " ");
        if self.search.is_open() {
            let joined = format!("{}{}", self.search.input_text(), line);
            self.search_index = 0;
            return self.search.input(joined, Instant::now());
        }
        if let Some(path) = &mut self.upload_path {
            return path.push_str(line.trim());
        }
        if self.toolbar.table_builder().is_open() {
            return self.append_to_cell(&line);
        }
        match self.toolbar.open_dropdown() {
            Some(Dropdown::Heading) => return,
            Some(dropdown) => {
                if let Some(kind) = dropdown.reference_kind() {
                    let term = format!("{}{}", self.toolbar.picker(kind).term(), line);
                    return self.filter(kind, term);
                }
            }
            None => {}
        }
        let text = text.replace("\r\n", "\n");
        self.execute(Command::Edit(EditCommand::InsertText { text }));
    }

    fn append_to_cell(&mut self, suffix: &str) {
        let (row, col) = self.table_cursor;
        let Some(grid) = self.toolbar.table_builder().grid() else {
            return;
        };
        let text = format!("{}{}", grid.cell(row, col).unwrap_or_default(), suffix);
        self.execute(Command::Table(TableCommand::SetCell { row, col, text }));
    }

    fn handle_upload_key(&mut self, key: KeyEvent) {
        let Some(path) = &mut self.upload_path else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.upload_path = None,
            KeyCode::Backspace => {
                path.pop();
            }
            KeyCode::Char(c) => path.push(c),
            KeyCode::Enter => {
                if let Some(path) = self.upload_path.take() {
                    self.upload_image(path.trim());
                }
            }
            _ => {}
        }
    }

    /// Upload a local image and refresh the image picker so it lists the new file.
    fn upload_image(&mut self, path: &str) {
        let path = Path::new(path);
        let Some(filename) = path.file_name().and_then(|name| name.to_str()) else {
            self.status = UPLOAD_FAILED.to_string();
            return;
        };
        if !is_allowed_image(filename) {
            self.status = format!("{UPLOAD_FAILED}: unsupported file type");
            return;
        }

        let result = fs::read(path)
            .map_err(|err| ApiError::Transport(err.to_string()))
            .and_then(|bytes| self.store.upload_media(&self.project, filename, &bytes));
        match result {
            Ok(file) => {
                self.status = format!("Uploaded {}", file.filename);
                let reload = self.toolbar.invalidate_references(ReferenceKind::Media);
                if let CommandResult::LoadRequested(kind) = reload {
                    self.request_references(kind);
                }
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "upload failed");
                self.status = UPLOAD_FAILED.to_string();
            }
        }
    }

    fn handle_motion(&mut self, key: KeyEvent) {
        let extend = key.modifiers.contains(KeyModifiers::SHIFT);
        let selection = self.selection();
        let head = match self.anchor {
            Some(anchor) if selection.start == anchor => selection.end,
            Some(_) => selection.start,
            None => selection.end,
        };
        let len = self.text().chars().count();

        let target = match key.code {
            KeyCode::Left if !extend && !selection.is_caret() => selection.start,
            KeyCode::Right if !extend && !selection.is_caret() => selection.end,
            KeyCode::Left => head.saturating_sub(1),
            KeyCode::Right => (head + 1).min(len),
            KeyCode::Up => move_vertical(self.text(), head, -1),
            KeyCode::Down => move_vertical(self.text(), head, 1),
            KeyCode::Home => line_start(self.text(), head),
            KeyCode::End => line_end(self.text(), head),
            _ => return,
        };

        let next = if extend {
            let anchor = *self.anchor.get_or_insert(if selection.is_caret() {
                selection.start
            } else {
                selection.start.min(head)
            });
            Selection::new(anchor, target)
        } else {
            self.anchor = None;
            Selection::caret(target)
        };
        self.execute(Command::Edit(EditCommand::SetSelection { selection: next }));
        self.sync_selection();
    }

    fn sync_selection(&mut self) {
        if let Some(buffer) = self.toolbar.buffer() {
            let selection = buffer.selection();
            self.toolbar.view_mut().selection = selection;
        }
    }

    fn handle_picker_key(&mut self, kind: ReferenceKind, key: KeyEvent) -> bool {
        if key.modifiers.intersects(KeyModifiers::ALT | KeyModifiers::CONTROL) {
            return false;
        }
        let visible = self.toolbar.picker(kind).visible().len();
        match key.code {
            KeyCode::Esc => self.execute(Command::Dropdown(DropdownCommand::CloseAll)),
            KeyCode::Up => self.picker_index = self.picker_index.saturating_sub(1),
            KeyCode::Down => {
                self.picker_index = (self.picker_index + 1).min(visible.saturating_sub(1));
            }
            KeyCode::Enter => {
                let index = self.picker_index;
                self.picker_index = 0;
                self.execute(Command::Dropdown(DropdownCommand::Select { kind, index }));
            }
            KeyCode::Backspace => {
                let mut term = self.toolbar.picker(kind).term().to_string();
                term.pop();
                self.filter(kind, term);
            }
            KeyCode::Char(c) => {
                let mut term = self.toolbar.picker(kind).term().to_string();
                term.push(c);
                self.filter(kind, term);
            }
            _ => return false,
        }
        true
    }

    fn filter(&mut self, kind: ReferenceKind, term: String) {
        self.picker_index = 0;
        self.execute(Command::Dropdown(DropdownCommand::Filter { kind, term }));
    }

    fn handle_table_key(&mut self, key: KeyEvent) {
        let Some(grid) = self.toolbar.table_builder().grid() else {
            return;
        };
        let (rows, cols) = (grid.rows(), grid.cols());
        let (row, col) = self.table_cursor;
        let current = grid.cell(row, col).unwrap_or_default().to_string();
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        let resize = |rows: usize, cols: usize| Command::Table(TableCommand::Resize { rows, cols });
        match key.code {
            KeyCode::Esc => self.execute(Command::Table(TableCommand::Cancel)),
            KeyCode::Enter => self.execute(Command::Table(TableCommand::Insert)),
            KeyCode::Down if ctrl => self.execute(resize(rows + 1, cols)),
            KeyCode::Up if ctrl => self.execute(resize(rows.saturating_sub(1), cols)),
            KeyCode::Right if ctrl => self.execute(resize(rows, cols + 1)),
            KeyCode::Left if ctrl => self.execute(resize(rows, cols.saturating_sub(1))),
            KeyCode::Tab if cols > 0 && rows > 0 => {
                let next = row * cols + col + 1;
                self.table_cursor = ((next / cols) % rows, next % cols);
            }
            KeyCode::BackTab if cols > 0 && rows > 0 => {
                let index = (row * cols + col + rows * cols - 1) % (rows * cols);
                self.table_cursor = (index / cols, index % cols);
            }
            KeyCode::Backspace => {
                let mut text = current;
                text.pop();
                self.execute(Command::Table(TableCommand::SetCell { row, col, text }));
            }
            KeyCode::Char(c) if !ctrl => {
                let mut text = current;
                text.push(c);
                self.execute(Command::Table(TableCommand::SetCell { row, col, text }));
            }
            _ => {}
        }

        if let Some(grid) = self.toolbar.table_builder().grid() {
            let (row, col) = self.table_cursor;
            self.table_cursor = (
                row.min(grid.rows().saturating_sub(1)),
                col.min(grid.cols().saturating_sub(1)),
            );
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        let now = Instant::now();
        match key.code {
            KeyCode::Esc => self.search.close(),
            KeyCode::Up => self.search_index = self.search_index.saturating_sub(1),
            KeyCode::Down => {
                let count = match self.search.view() {
                    SearchView::Results(results) => results.len(),
                    _ => 0,
                };
                self.search_index = (self.search_index + 1).min(count.saturating_sub(1));
            }
            KeyCode::Enter => {
                if let SearchView::Results(results) = self.search.view() {
                    if let Some(hit) = results.get(self.search_index) {
                        self.status = format!("{} -> {}", hit.title, hit.url);
                    }
                }
                self.search.close();
            }
            KeyCode::Backspace => {
                let mut text = self.search.input_text().to_string();
                text.pop();
                self.search_index = 0;
                self.search.input(text, now);
            }
            KeyCode::Char(c) => {
                let mut text = self.search.input_text().to_string();
                text.push(c);
                self.search_index = 0;
                self.search.input(text, now);
            }
            _ => {}
        }
    }

    fn save(&mut self) {
        let body = self.text().to_string();
        match self.session.save(self.store.as_ref(), &body) {
            Ok(_) => {
                self.session.toggle_mode();
                self.status = format!("Saved {}", self.file_path.display());
            }
            Err(err) => {
                tracing::warn!(error = %err, "save failed");
                self.status = "Failed to save changes".to_string();
            }
        }
        self.confirm_quit = false;
    }

    fn revert(&mut self) {
        let body = self.text().to_string();
        let confirmed = self.confirm_revert;
        let outcome = self.session.cancel(&body, |_| confirmed);
        let restored = match outcome {
            CancelOutcome::KeepEditing => {
                self.confirm_revert = true;
                self.status = "Unsaved changes: press Ctrl+R again to discard them".to_string();
                return;
            }
            CancelOutcome::Reload => self.session.original_body().to_string(),
            CancelOutcome::Restore(text) => text,
        };
        self.session.toggle_mode();
        self.execute(Command::Edit(EditCommand::ReplaceAll { text: restored }));
        self.status = "Reverted".to_string();
    }

    fn quit(&mut self) {
        let dirty = self.session.has_unsaved_changes(self.text());
        if dirty && !self.confirm_quit {
            self.confirm_quit = true;
            self.status = "Unsaved changes: press Ctrl+Q again to quit".to_string();
            return;
        }
        self.should_quit = true;
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(frame.area());

        self.render_editor(frame, chunks[0]);
        self.render_status_line(frame, chunks[1]);
        frame.render_widget(
            Paragraph::new("Ctrl+S save  Ctrl+R revert  Ctrl+Q quit  Ctrl+T table  Ctrl+O upload  Alt+M media  Alt+K search  F1 help")
                .style(Style::default().fg(Color::DarkGray)),
            chunks[2],
        );

        let area = frame.area();
        let view = self.toolbar.view();
        if let Some(dropdown) = view.dropdown {
            self.render_dropdown(frame, area, dropdown);
        }
        if view.table.is_some() {
            self.render_table(frame, area);
        }
        if view.shortcuts_visible {
            render_shortcuts(frame, area);
        }
        if let Some(path) = &self.upload_path {
            let popup = centered(area, 60, 3);
            frame.render_widget(Clear, popup);
            frame.render_widget(
                Paragraph::new(format!("Path: {path}"))
                    .block(Block::default().borders(Borders::ALL).title(" Upload image ")),
                popup,
            );
        }
        if self.search.is_open() {
            self.render_search(frame, area);
        }
    }

    fn render_editor(&mut self, frame: &mut Frame, area: Rect) {
        let height = area.height.saturating_sub(2) as usize;
        let selection = self.selection();
        let (caret_line, _) = line_and_column(self.text(), selection.end);
        if caret_line < self.scroll_top {
            self.scroll_top = caret_line;
        } else if height > 0 && caret_line >= self.scroll_top + height {
            self.scroll_top = caret_line + 1 - height;
        }

        let selected = Style::default().add_modifier(Modifier::REVERSED);
        let mut lines = Vec::new();
        let mut offset = 0;
        for line in self.text().split('\n') {
            let len = line.chars().count();
            let (start, end) = (offset, offset + len);
            let from = selection.start.clamp(start, end) - start;
            let to = selection.end.clamp(start, end) - start;
            let chars: Vec<char> = line.chars().collect();
            let part = |a: usize, b: usize| chars[a..b].iter().collect::<String>();
            lines.push(Line::from(vec![
                Span::raw(part(0, from)),
                Span::styled(part(from, to), selected),
                Span::raw(part(to, len)),
            ]));
            offset = end + 1;
        }

        let dirty = if self.session.has_unsaved_changes(self.text()) {
            " [+]"
        } else {
            ""
        };
        let title = format!(" {}{} ", self.file_path.display(), dirty);
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title))
            .scroll((self.scroll_top as u16, 0));
        frame.render_widget(paragraph, area);

        let (line, column) = line_and_column(self.text(), selection.end);
        let prefix: String = self
            .text()
            .split('\n')
            .nth(line)
            .unwrap_or_default()
            .chars()
            .take(column)
            .collect();
        let x = area.x + 1 + display_width(&prefix) as u16;
        let y = area.y + 1 + (line - self.scroll_top) as u16;
        if y < area.y + area.height.saturating_sub(1) && !self.search.is_open() {
            frame.set_cursor_position((x, y));
        }
    }

    fn render_status_line(&self, frame: &mut Frame, area: Rect) {
        let selection = self.selection();
        let (line, column) = line_and_column(self.text(), selection.end);
        let text = format!(
            " {}:{}  sel {}  v{}  {}",
            line + 1,
            column + 1,
            selection.len(),
            self.toolbar.view().version,
            self.status
        );
        frame.render_widget(
            Paragraph::new(text).style(Style::default().bg(Color::Blue).fg(Color::White)),
            area,
        );
    }

    fn render_dropdown(&self, frame: &mut Frame, area: Rect, dropdown: Dropdown) {
        let popup = centered(area, 50, 14);
        frame.render_widget(Clear, popup);

        let Some(kind) = dropdown.reference_kind() else {
            let lines: Vec<Line> = (1..=6)
                .map(|level| Line::from(format!("{level}  {} Heading {level}", "#".repeat(level))))
                .collect();
            frame.render_widget(
                Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Heading ")),
                popup,
            );
            return;
        };

        let picker = self.toolbar.picker(kind);
        let mut lines = vec![Line::from(format!("Filter: {}", picker.term())), Line::from("")];
        match self.toolbar.view().listing(kind) {
            ReferenceListView::Loading => lines.push(Line::from("Loading...")),
            ReferenceListView::Failed(_) => lines.push(Line::from(format!("Failed to load {}", kind.name()))),
            ReferenceListView::Empty => lines.push(Line::from(format!("No {} found", kind.name()))),
            ReferenceListView::Items(items) => {
                for (index, item) in items.iter().enumerate() {
                    let style = if index == self.picker_index {
                        Style::default().add_modifier(Modifier::REVERSED)
                    } else {
                        Style::default()
                    };
                    lines.push(Line::from(vec![
                        Span::styled(item.label.clone(), style),
                        Span::styled(
                            format!("  {}", item.secondary_label),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ]));
                }
            }
        }
        let title = match kind {
            ReferenceKind::Media => " Insert image ",
            ReferenceKind::Article => " Link article ",
        };
        frame.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title)),
            popup,
        );
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let Some(grid) = &self.toolbar.view().table else {
            return;
        };
        let popup = centered(area, 70, (grid.rows() as u16 + 6).min(area.height));
        frame.render_widget(Clear, popup);

        let mut lines = vec![Line::from(format!(
            "{} x {}   Tab next cell  Ctrl+arrows resize  Enter insert  Esc cancel",
            grid.rows(),
            grid.cols()
        ))];
        for (r, row) in grid.row_cells().enumerate() {
            let mut spans = vec![Span::raw("| ")];
            for (c, cell) in row.iter().enumerate() {
                let mut style = Style::default();
                if r == 0 {
                    style = style.add_modifier(Modifier::BOLD);
                }
                if (r, c) == self.table_cursor {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                let shown = if cell.is_empty() { "·" } else { cell.as_str() };
                spans.push(Span::styled(shown.to_string(), style));
                spans.push(Span::raw(" | "));
            }
            lines.push(Line::from(spans));
        }
        frame.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Table ")),
            popup,
        );
    }

    fn render_search(&self, frame: &mut Frame, area: Rect) {
        let popup = centered(area, 70, 16);
        frame.render_widget(Clear, popup);

        let query = self.search.query();
        let mut lines = vec![Line::from(format!("> {}", self.search.input_text())), Line::from("")];
        match self.search.view() {
            SearchView::Results(results) => {
                for (index, hit) in results.iter().enumerate() {
                    let marker = if index == self.search_index { "▸ " } else { "  " };
                    let mut spans = vec![Span::raw(marker)];
                    spans.extend(highlighted(&hit.title, query));
                    spans.push(Span::styled(
                        format!("  [{}]", hit.kind),
                        Style::default().fg(Color::DarkGray),
                    ));
                    lines.push(Line::from(spans));
                    if let Some(excerpt) = &hit.excerpt {
                        let mut spans = vec![Span::raw("    ")];
                        spans.extend(highlighted(excerpt, query));
                        lines.push(Line::from(spans));
                    }
                }
            }
            other => lines.push(Line::from(other.message().unwrap_or_default())),
        }
        frame.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Search ")),
            popup,
        );
    }
}

fn highlighted(text: &str, query: &str) -> Vec<Span<'static>> {
    let chars: Vec<char> = text.chars().collect();
    let part = |a: usize, b: usize| chars[a..b].iter().collect::<String>();
    let mark = Style::default().fg(Color::Black).bg(Color::Yellow);

    let mut spans = Vec::new();
    let mut last = 0;
    for (start, end) in highlight_ranges(text, query) {
        spans.push(Span::raw(part(last, start)));
        spans.push(Span::styled(part(start, end), mark));
        last = end;
    }
    spans.push(Span::raw(part(last, chars.len())));
    spans
}

fn render_shortcuts(frame: &mut Frame, area: Rect) {
    let popup = centered(area, 44, SHORTCUT_HELP.len() as u16 + 2);
    frame.render_widget(Clear, popup);
    let lines: Vec<Line> = SHORTCUT_HELP
        .iter()
        .map(|(keys, action)| Line::from(format!("{keys:<8} {action}")))
        .collect();
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Shortcuts ")),
        popup,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use mdedit_core::{SearchResponse, SearchResult};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn offline_app(text: &str) -> App {
        let path = std::env::temp_dir().join("mdedit-app-test.md");
        App::new(path, text.to_string(), &EditorConfig::default())
    }

    #[test]
    fn test_to_key_press() {
        assert_eq!(
            to_key_press(&key(KeyCode::Char('b'), KeyModifiers::ALT)),
            Some(KeyPress::alt('b'))
        );
        assert_eq!(to_key_press(&key(KeyCode::Char('s'), KeyModifiers::CONTROL)), None);
        assert_eq!(to_key_press(&key(KeyCode::Left, KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_typing_and_bold_shortcut() {
        let mut app = offline_app("");
        for c in "hi".chars() {
            app.handle_key_event(key(KeyCode::Char(c), KeyModifiers::NONE));
        }
        app.handle_key_event(key(KeyCode::Left, KeyModifiers::SHIFT));
        app.handle_key_event(key(KeyCode::Left, KeyModifiers::SHIFT));
        assert_eq!(app.selection(), Selection::new(0, 2));

        app.handle_key_event(key(KeyCode::Char('b'), KeyModifiers::ALT));
        assert_eq!(app.text(), "**hi**");
    }

    #[test]
    fn test_offline_picker_reports_failure() {
        let mut app = offline_app("");
        app.handle_key_event(key(KeyCode::Char('l'), KeyModifiers::ALT));
        assert_eq!(app.status, "Failed to load articles");
    }

    #[test]
    fn test_quit_needs_confirmation_when_dirty() {
        let mut app = offline_app("");
        app.handle_key_event(key(KeyCode::Char('x'), KeyModifiers::NONE));
        app.handle_key_event(key(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert!(!app.should_quit);
        app.handle_key_event(key(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    fn hit(title: &str) -> SearchResult {
        SearchResult {
            title: title.to_string(),
            url: format!("/projects/demo/a/{title}"),
            kind: "article".to_string(),
            excerpt: None,
            thumbnail: None,
            project: None,
        }
    }

    #[test]
    fn test_search_selection_stays_on_results() {
        let mut app = offline_app("");
        app.handle_key_event(key(KeyCode::Char('k'), KeyModifiers::ALT));
        app.handle_key_event(key(KeyCode::Char('c'), KeyModifiers::NONE));
        app.search.complete(
            "c",
            Ok(SearchResponse {
                query: "c".to_string(),
                results: vec![hit("cat"), hit("cave")],
            }),
        );

        for _ in 0..5 {
            app.handle_key_event(key(KeyCode::Down, KeyModifiers::NONE));
        }
        assert_eq!(app.search_index, 1);
        app.handle_key_event(key(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(app.status, "cave -> /projects/demo/a/cave");
    }

    #[test]
    fn test_heading_menu_keeps_typing_out_of_buffer() {
        let mut app = offline_app("title");
        app.handle_key_event(key(KeyCode::Char('h'), KeyModifiers::ALT));
        app.handle_key_event(key(KeyCode::Char('x'), KeyModifiers::NONE));
        app.handle_key_event(key(KeyCode::Enter, KeyModifiers::NONE));
        app.handle_paste("pasted".to_string());
        assert_eq!(app.text(), "title");

        app.handle_key_event(key(KeyCode::Char('2'), KeyModifiers::NONE));
        assert_eq!(app.text(), "## title");
    }

    #[test]
    fn test_paste_goes_to_open_overlay() {
        let mut app = offline_app("");
        app.handle_key_event(key(KeyCode::Char('l'), KeyModifiers::ALT));
        app.handle_paste("Cat\n".to_string());
        assert_eq!(app.toolbar.picker(ReferenceKind::Article).term(), "Cat ");
        assert_eq!(app.text(), "");

        app.handle_key_event(key(KeyCode::Esc, KeyModifiers::NONE));
        app.handle_key_event(key(KeyCode::Char('t'), KeyModifiers::CONTROL));
        app.handle_paste("Name".to_string());
        let grid = app.toolbar.table_builder().grid().unwrap();
        assert_eq!(grid.cell(0, 0), Some("Name"));
        assert_eq!(app.text(), "");
    }

    #[test]
    fn test_offline_upload_refreshes_open_picker() {
        let dir = std::env::temp_dir().join(format!("mdedit-app-upload-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let image = dir.join("cat.png");
        std::fs::write(&image, b"png").unwrap();
        let mut app = App::new(dir.join("notes.md"), String::new(), &EditorConfig::default());

        app.handle_key_event(key(KeyCode::Char('m'), KeyModifiers::ALT));
        app.handle_key_event(key(KeyCode::Char('o'), KeyModifiers::CONTROL));
        app.handle_paste(image.display().to_string());
        app.handle_key_event(key(KeyCode::Enter, KeyModifiers::NONE));

        assert!(dir.join("media/cat.png").exists());
        assert_eq!(app.status, "Uploaded cat.png");
        // The open picker asked for a fresh list; offline that request fails again.
        assert_eq!(
            app.toolbar.view_mut().take_alert().as_deref(),
            Some("Failed to load media")
        );
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_upload_rejects_unsupported_type() {
        let mut app = offline_app("");
        app.handle_key_event(key(KeyCode::Char('o'), KeyModifiers::CONTROL));
        app.handle_paste("/tmp/notes.pdf".to_string());
        app.handle_key_event(key(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(app.status, "Failed to upload image: unsupported file type");
        assert!(app.upload_path.is_none());
    }

    #[test]
    fn test_table_builder_flow() {
        let mut app = offline_app("");
        app.handle_key_event(key(KeyCode::Char('t'), KeyModifiers::CONTROL));
        app.handle_key_event(key(KeyCode::Char('A'), KeyModifiers::SHIFT));
        app.handle_key_event(key(KeyCode::Up, KeyModifiers::CONTROL));
        app.handle_key_event(key(KeyCode::Left, KeyModifiers::CONTROL));
        app.handle_key_event(key(KeyCode::Left, KeyModifiers::CONTROL));
        app.handle_key_event(key(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(app.text(), "\n\n| A |\n| --- |\n|  |\n\n\n");
    }
}
