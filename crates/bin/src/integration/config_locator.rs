//! Locates the pipeline configuration file.

use poprank::{PipelineConfig, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Get the default configuration directory.
///
/// Uses platform-specific config directories:
/// - Linux: `~/.config/poprank/`
/// - macOS: `~/Library/Application Support/poprank/`
/// - Windows: `%APPDATA%\poprank\`
pub(crate) fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("poprank")
}

/// Get the default configuration file path.
pub(crate) fn default_config_path() -> PathBuf {
    default_config_dir().join("config.json")
}

/// Load the config named on the command line, else the default file if it
/// exists, else built-in defaults.
pub(crate) fn load_config(explicit: Option<&Path>) -> Result<PipelineConfig> {
    load_config_from(explicit, &default_config_path())
}

fn load_config_from(explicit: Option<&Path>, fallback: &Path) -> Result<PipelineConfig> {
    match explicit {
        Some(path) => PipelineConfig::from_file(path),
        None if fallback.is_file() => PipelineConfig::from_file(fallback),
        None => {
            debug!(path = %fallback.display(), "no config file, using defaults");
            Ok(PipelineConfig::default())
        }
    }
}
