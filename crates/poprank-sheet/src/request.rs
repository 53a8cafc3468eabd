//! Queued document intents and their resolved responses.

use crate::address::RangeRef;
use crate::error::{Result, SheetError};
use crate::value::CellValue;
use crate::workbook::{ChartType, Font, SeriesBy};
use serde::{Deserialize, Serialize};

/// One read or write intent against the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Request {
    /// Load every value of one table column, header row first.
    LoadColumnValues {
        /// Table name.
        table: String,
        /// Column header.
        column: String,
    },
    /// Look up a worksheet, resolving to `None` when it does not exist.
    GetWorksheetOrNull {
        /// Worksheet name.
        name: String,
    },
    /// Append a worksheet.
    AddWorksheet {
        /// Worksheet name.
        name: String,
    },
    /// Remove a worksheet with everything on it.
    DeleteWorksheet {
        /// Worksheet name.
        name: String,
    },
    /// Write a value matrix.
    SetValues {
        /// Target worksheet.
        sheet: String,
        /// Target range.
        range: RangeRef,
        /// Rows of values matching the range shape.
        values: Vec<Vec<CellValue>>,
    },
    /// Merge a range.
    Merge {
        /// Target worksheet.
        sheet: String,
        /// Range to merge.
        range: RangeRef,
    },
    /// Update font properties.
    SetFont {
        /// Target worksheet.
        sheet: String,
        /// Target range.
        range: RangeRef,
        /// Properties to set.
        font: Font,
    },
    /// Apply a number format.
    SetNumberFormat {
        /// Target worksheet.
        sheet: String,
        /// Target range.
        range: RangeRef,
        /// Format pattern.
        format: String,
    },
    /// Auto-fit the entire columns spanned by a range.
    AutofitColumns {
        /// Target worksheet.
        sheet: String,
        /// Range whose columns are fitted.
        range: RangeRef,
    },
    /// Create a structured table.
    AddTable {
        /// Target worksheet.
        sheet: String,
        /// Header row (and any existing body).
        range: RangeRef,
        /// Whether the first row is a header.
        has_headers: bool,
        /// Workbook-unique table name.
        name: String,
    },
    /// Append rows at the end of a table.
    AddTableRows {
        /// Table name.
        table: String,
        /// Rows to append.
        rows: Vec<Vec<CellValue>>,
    },
    /// Create a chart.
    AddChart {
        /// Target worksheet.
        sheet: String,
        /// Chart kind.
        chart_type: ChartType,
        /// Data range.
        source: RangeRef,
        /// Series orientation.
        series_by: SeriesBy,
        /// Title text.
        title: Option<String>,
        /// Cells the chart covers.
        position: Option<RangeRef>,
    },
    /// Bring a worksheet to focus.
    Activate {
        /// Worksheet name.
        sheet: String,
    },
}

impl Request {
    /// Host-style location of the operation, used in debug info.
    pub const fn location(&self) -> &'static str {
        match self {
            Self::LoadColumnValues { .. } => "TableColumn.values",
            Self::GetWorksheetOrNull { .. } => "WorksheetCollection.getItemOrNull",
            Self::AddWorksheet { .. } => "WorksheetCollection.add",
            Self::DeleteWorksheet { .. } => "Worksheet.delete",
            Self::SetValues { .. } => "Range.values",
            Self::Merge { .. } => "Range.merge",
            Self::SetFont { .. } => "RangeFont",
            Self::SetNumberFormat { .. } => "Range.numberFormat",
            Self::AutofitColumns { .. } => "RangeFormat.autofitColumns",
            Self::AddTable { .. } => "TableCollection.add",
            Self::AddTableRows { .. } => "TableRowCollection.add",
            Self::AddChart { .. } => "ChartCollection.add",
            Self::Activate { .. } => "Worksheet.activate",
        }
    }
}

/// Handle data for an existing worksheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorksheetInfo {
    /// Worksheet name as stored.
    pub name: String,
    /// Zero-based tab position.
    pub position: usize,
}

/// What a host returns for one request.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Mutation applied.
    Done,
    /// Loaded single-column values.
    Values(Vec<Vec<CellValue>>),
    /// Result of a nullable worksheet lookup.
    Worksheet(Option<WorksheetInfo>),
    /// Name assigned to a new chart.
    Chart(String),
}

/// Conversion from a host response to the value a caller asked for.
pub trait FromResponse: Sized {
    /// Extract the typed value.
    fn from_response(response: Response) -> Result<Self>;
}

fn unexpected(expected: &str, response: &Response) -> SheetError {
    SheetError::Host {
        message: format!("expected {} response, host returned {:?}", expected, response),
        debug_info: None,
    }
}

impl FromResponse for () {
    fn from_response(response: Response) -> Result<Self> {
        match response {
            Response::Done => Ok(()),
            other => Err(unexpected("empty", &other)),
        }
    }
}

impl FromResponse for Vec<Vec<CellValue>> {
    fn from_response(response: Response) -> Result<Self> {
        match response {
            Response::Values(values) => Ok(values),
            other => Err(unexpected("values", &other)),
        }
    }
}

impl FromResponse for Option<WorksheetInfo> {
    fn from_response(response: Response) -> Result<Self> {
        match response {
            Response::Worksheet(info) => Ok(info),
            other => Err(unexpected("worksheet", &other)),
        }
    }
}

impl FromResponse for String {
    fn from_response(response: Response) -> Result<Self> {
        match response {
            Response::Chart(name) => Ok(name),
            other => Err(unexpected("chart", &other)),
        }
    }
}

/// Where in a flush a request failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugInfo {
    /// Zero-based index of the failing request within its batch.
    pub request_index: usize,
    /// Number of requests in the batch.
    pub batch_len: usize,
    /// Host-style operation name.
    pub error_location: String,
    /// Underlying host message.
    pub detail: String,
}
