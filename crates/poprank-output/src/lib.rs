#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/poprank/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod layout;
pub mod presenter;
pub mod render;
pub mod report;

pub use export::{ExportError, ExportFormat, Exporter, RankedCity};
pub use layout::Layout;
pub use presenter::{PresentError, PresentedReport, present, table_row};
pub use render::render_worksheet;
pub use report::{GrowthReport, ReportBuilder, ReportError};
