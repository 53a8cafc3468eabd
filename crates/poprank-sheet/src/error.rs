//! Error types for workbook operations.

use crate::request::DebugInfo;
use thiserror::Error;

/// Result type for workbook operations.
pub type Result<T> = std::result::Result<T, SheetError>;

/// Errors that can occur while reading or mutating a workbook.
#[derive(Debug, Error)]
pub enum SheetError {
    /// No structured table with this name exists in the workbook
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// The table exists but has no column with this header
    #[error("Column '{column}' not found in table '{table}'")]
    ColumnNotFound {
        /// Table that was searched
        table: String,
        /// Header text that was requested
        column: String,
    },

    /// No worksheet with this name exists in the workbook
    #[error("Worksheet not found: {0}")]
    WorksheetNotFound(String),

    /// A worksheet with this name already exists
    #[error("Worksheet already exists: {0}")]
    WorksheetExists(String),

    /// A table with this name already exists
    #[error("Table already exists: {0}")]
    TableExists(String),

    /// Worksheet or table name rejected by the naming rules
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// Malformed A1 reference or a range operation that leaves the grid
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Value matrix does not match the dimensions of the target range
    #[error(
        "Value shape {rows}x{cols} does not match range shape {expected_rows}x{expected_cols}"
    )]
    Shape {
        /// Rows in the target range
        expected_rows: usize,
        /// Columns in the target range
        expected_cols: usize,
        /// Rows supplied
        rows: usize,
        /// Columns supplied (widest row)
        cols: usize,
    },

    /// Appended row width does not match the table width
    #[error("Row for table '{table}' has {found} values, expected {expected}")]
    RowShape {
        /// Table receiving the row
        table: String,
        /// Number of table columns
        expected: usize,
        /// Number of values in the row
        found: usize,
    },

    /// Input contained no header row
    #[error("Empty table: {0}")]
    EmptyTable(String),

    /// A pending value was read before the flush that carries it
    #[error("Value read before sync(); queue the request and flush the session first")]
    NotSynced,

    /// A document mutation failed inside the host
    #[error("Host operation failed: {message}")]
    Host {
        /// Human-readable failure
        message: String,
        /// Location of the failing request inside its batch
        debug_info: Option<DebugInfo>,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Document serialization error
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV import error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl SheetError {
    /// Whether this error names a table, column or worksheet that does not exist.
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::TableNotFound(_) | Self::ColumnNotFound { .. } | Self::WorksheetNotFound(_)
        )
    }

    /// Structured debug detail, if the host attached any.
    pub const fn debug_info(&self) -> Option<&DebugInfo> {
        match self {
            Self::Host { debug_info, .. } => debug_info.as_ref(),
            _ => None,
        }
    }
}
