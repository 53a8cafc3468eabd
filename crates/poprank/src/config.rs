//! Pipeline configuration.

use crate::error::{PipelineError, Result};
use poprank_output::Layout;
use poprank_rank::RankConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Where the population figures are read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Structured table holding the figures (default: "PopulationTable")
    pub table: String,
    /// Column with city names (default: "City")
    pub name_column: String,
    /// Column with the latest figure
    pub latest_column: String,
    /// Column with the earliest figure
    pub earliest_column: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            table: "PopulationTable".to_string(),
            name_column: "City".to_string(),
            latest_column: "7/1/2014 population estimate".to_string(),
            earliest_column: "4/1/1990 census population".to_string(),
        }
    }
}

/// Everything one run needs besides the document.
///
/// Every field has a default, so a config file only lists what it changes:
///
/// ```
/// use poprank::PipelineConfig;
///
/// let config = PipelineConfig::from_json_str(r#"{"rank": {"top_n": 5}}"#).unwrap();
/// assert_eq!(config.rank.top_n, 5);
/// assert_eq!(config.source.table, "PopulationTable");
/// assert_eq!(config.layout.sheet_name, "Top 10 Growing Cities");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Input table and columns
    pub source: SourceConfig,
    /// Ranking options
    pub rank: RankConfig,
    /// Output sheet layout
    pub layout: Layout,
}

impl PipelineConfig {
    /// Parse a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(PipelineError::Config)
    }

    /// Read a configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&content)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }
}
