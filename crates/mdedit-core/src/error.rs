//! Error types.

use thiserror::Error;

/// Failure talking to a server collaborator (storage, listing, search).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, timeout, ...).
    #[error("request failed: {0}")]
    Transport(String),
    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
    },
    /// The response body could not be decoded.
    #[error("invalid response body: {0}")]
    Decode(String),
    /// The server accepted the request but reported a failure in its payload.
    #[error("{0}")]
    Rejected(String),
}

/// Table builder validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// The table builder is not open.
    #[error("table builder is not open")]
    NotOpen,
    /// Insert attempted with zero rows or zero columns.
    #[error("a table needs at least one row and one column")]
    EmptyGrid,
    /// Cell coordinates outside the grid.
    #[error("cell ({row}, {col}) is outside a {rows}x{cols} table")]
    CellOutOfRange {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
        /// Grid row count.
        rows: usize,
        /// Grid column count.
        cols: usize,
    },
}

/// Errors returned by [`TextEditingToolbar::execute`](crate::TextEditingToolbar::execute).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolbarError {
    /// A command was executed before `attach` or after `detach`.
    #[error("toolbar is not attached")]
    Detached,
    /// Heading levels are 1..=6.
    #[error("invalid heading level {0} (expected 1..=6)")]
    InvalidHeadingLevel(u8),
    /// A reference was selected from an index that is not in the filtered list.
    #[error("reference index {index} out of range ({len} visible)")]
    ReferenceOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of visible items.
        len: usize,
    },
    /// Table builder validation failed.
    #[error(transparent)]
    Table(#[from] TableError),
    /// A collaborator call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors from session operations (save, cancel, featured media).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The operation needs edit mode.
    #[error("session is not in edit mode")]
    NotEditing,
    /// The operation is only available on article sessions.
    #[error("operation requires an article session")]
    NotAnArticle,
    /// The storage collaborator failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    /// The file is not valid YAML for [`EditorConfig`](crate::EditorConfig).
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    /// The file could not be read.
    Io(#[from] std::io::Error),
}
