#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/poprank/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod extract;
pub mod pipeline;

// Re-export main types from sub-crates
pub use poprank_output as output;
pub use poprank_rank as rank;
pub use poprank_sheet as sheet;

pub use config::{PipelineConfig, SourceConfig};
pub use error::{PipelineError, Result};
pub use extract::{ColumnSet, extract_columns};
pub use pipeline::{Stage, export_ranking, run_pipeline, run_pipeline_with_progress};

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
