//! Pipeline errors.

use poprank_output::{ExportError, PresentError, ReportError};
use poprank_rank::RankError;
use poprank_sheet::{DebugInfo, SheetError};
use thiserror::Error;

/// Errors that can end a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Reading the source columns failed.
    #[error("Extraction failed: {0}")]
    Extract(#[source] SheetError),

    /// Ranking options were rejected.
    #[error(transparent)]
    Rank(#[from] RankError),

    /// Writing the output sheet failed.
    #[error("Presentation failed: {0}")]
    Present(#[from] PresentError),

    /// Writing the ranking export failed.
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Building the run report failed.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Configuration could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(#[source] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Host diagnostics for the request that failed, if any.
    pub const fn debug_info(&self) -> Option<&DebugInfo> {
        match self {
            Self::Extract(err) => err.debug_info(),
            Self::Present(err) => err.debug_info(),
            _ => None,
        }
    }

    /// Whether the run failed because a table, column or sheet was missing.
    pub const fn is_not_found(&self) -> bool {
        match self {
            Self::Extract(err) | Self::Present(PresentError::Sheet(err)) => err.is_not_found(),
            _ => false,
        }
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
