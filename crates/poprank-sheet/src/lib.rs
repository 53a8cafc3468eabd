#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/poprank/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod address;
pub mod error;
pub mod io;
pub mod memory;
pub mod request;
pub mod session;
pub mod value;
pub mod workbook;

pub use address::{CellRef, RangeRef, column_name};
pub use error::{Result, SheetError};
pub use memory::MemoryHost;
pub use request::{DebugInfo, Request, Response, WorksheetInfo};
pub use session::{ChartRequest, DocumentHost, Pending, Session};
pub use value::{CellValue, format_number};
pub use workbook::{
    Cell, Chart, ChartType, Font, SeriesBy, StructuredTable, Workbook, Worksheet,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
