//! Error types for ranking.

use thiserror::Error;

/// Result type for ranking operations.
pub type Result<T> = std::result::Result<T, RankError>;

/// Errors that can occur while ranking.
#[derive(Debug, Error)]
pub enum RankError {
    /// A ranking must keep at least one record
    #[error("Invalid top-N limit: {0} (must be at least 1)")]
    InvalidTopN(usize),
}
