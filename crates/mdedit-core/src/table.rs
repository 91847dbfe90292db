//! Table builder: a small editable grid that serializes to a markdown table.

use crate::error::TableError;

/// Rectangular grid of cell strings. The first row is the table header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableGrid {
    cells: Vec<Vec<String>>,
    cols: usize,
}

impl TableGrid {
    /// Create an empty `rows x cols` grid.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            cells: vec![vec![String::new(); cols]; rows],
            cols,
        }
    }

    /// Build a grid from rows, padding short rows so the grid stays rectangular.
    ///
    /// The column count is taken from the first (header) row; longer rows are truncated.
    pub fn from_rows<I, R, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cells: Vec<Vec<String>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        let cols = cells.first().map(Vec::len).unwrap_or(0);
        for row in &mut cells {
            row.resize(cols, String::new());
        }
        Self { cells, cols }
    }

    /// Number of rows, header included.
    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns `true` if the grid has no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.rows() == 0 || self.cols == 0
    }

    /// Cell text, if `(row, col)` is inside the grid.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.cells.get(row)?.get(col).map(String::as_str)
    }

    /// Rows as slices.
    pub fn row_cells(&self) -> impl Iterator<Item = &[String]> {
        self.cells.iter().map(Vec::as_slice)
    }

    /// Overwrite one cell.
    pub fn set_cell(
        &mut self,
        row: usize,
        col: usize,
        text: impl Into<String>,
    ) -> Result<(), TableError> {
        let (rows, cols) = (self.rows(), self.cols);
        let cell = self
            .cells
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or(TableError::CellOutOfRange {
                row,
                col,
                rows,
                cols,
            })?;
        *cell = text.into();
        Ok(())
    }

    /// A new `rows x cols` grid keeping every cell that is still in range.
    pub fn resized(&self, rows: usize, cols: usize) -> Self {
        let cells = (0..rows)
            .map(|r| {
                (0..cols)
                    .map(|c| self.cell(r, c).unwrap_or_default().to_string())
                    .collect()
            })
            .collect();
        Self { cells, cols }
    }

    /// Resize in place; see [`TableGrid::resized`].
    pub fn resize(&mut self, rows: usize, cols: usize) {
        *self = self.resized(rows, cols);
    }

    /// Serialize to a markdown table; see [`serialize`].
    pub fn to_markdown(&self) -> String {
        serialize(self)
    }
}

/// Serialize `grid` as a markdown table.
///
/// The header row is followed by a `---` separator row; every row is rendered as
/// `| a | b | c |` and terminated by `\n`. A grid with zero rows or zero columns yields `""`.
pub fn serialize(grid: &TableGrid) -> String {
    if grid.is_empty() {
        return String::new();
    }

    let mut md = String::new();
    for (index, row) in grid.row_cells().enumerate() {
        push_row(&mut md, row.iter().map(String::as_str));
        if index == 0 {
            push_row(&mut md, std::iter::repeat_n("---", grid.cols()));
        }
    }
    md
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>) {
    out.push_str("| ");
    out.push_str(&cells.collect::<Vec<_>>().join(" | "));
    out.push_str(" |\n");
}

/// Parse a row/column count typed by the user; anything unparsable or zero becomes 1.
pub fn parse_dimension(input: &str) -> usize {
    match input.trim().parse::<usize>() {
        Ok(n) if n > 0 => n,
        _ => 1,
    }
}

/// The table builder session: open, edit cells, insert or cancel.
///
/// No grid state survives between sessions: both `insert` and `cancel` clear it.
#[derive(Debug, Clone)]
pub struct TableBuilder {
    grid: Option<TableGrid>,
    default_rows: usize,
    default_cols: usize,
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new(3, 3)
    }
}

impl TableBuilder {
    /// Create a builder whose sessions start at `default_rows x default_cols`.
    pub fn new(default_rows: usize, default_cols: usize) -> Self {
        Self {
            grid: None,
            default_rows,
            default_cols,
        }
    }

    /// Whether a session is open.
    pub fn is_open(&self) -> bool {
        self.grid.is_some()
    }

    /// The grid of the open session.
    pub fn grid(&self) -> Option<&TableGrid> {
        self.grid.as_ref()
    }

    /// Start a session with a fresh grid of the default size.
    pub fn open(&mut self) -> &TableGrid {
        self.grid
            .insert(TableGrid::new(self.default_rows, self.default_cols))
    }

    /// Resize the open grid.
    pub fn resize(&mut self, rows: usize, cols: usize) -> Result<&TableGrid, TableError> {
        let grid = self.grid.as_mut().ok_or(TableError::NotOpen)?;
        grid.resize(rows, cols);
        Ok(&*grid)
    }

    /// Resize from raw user input, see [`parse_dimension`].
    pub fn resize_from_input(&mut self, rows: &str, cols: &str) -> Result<&TableGrid, TableError> {
        self.resize(parse_dimension(rows), parse_dimension(cols))
    }

    /// Edit a cell of the open grid.
    pub fn set_cell(
        &mut self,
        row: usize,
        col: usize,
        text: impl Into<String>,
    ) -> Result<(), TableError> {
        self.grid
            .as_mut()
            .ok_or(TableError::NotOpen)?
            .set_cell(row, col, text)
    }

    /// Close the session, discarding the grid.
    pub fn cancel(&mut self) {
        self.grid = None;
    }

    /// Serialize the open grid as an insertable block (`\n\n<table>\n\n`) and close the session.
    ///
    /// Fails without closing when the grid is empty, so the user can fix the dimensions.
    pub fn take_block(&mut self) -> Result<String, TableError> {
        let grid = self.grid.as_ref().ok_or(TableError::NotOpen)?;
        if grid.is_empty() {
            return Err(TableError::EmptyGrid);
        }
        let block = format!("\n\n{}\n\n", serialize(grid));
        self.grid = None;
        Ok(block)
    }
}
