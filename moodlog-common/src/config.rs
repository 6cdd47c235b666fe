//! Configuration loading and data folder resolution
//!
//! Resolution priority for the data folder:
//! 1. `MOODLOG_DATA_DIR` environment variable (highest)
//! 2. `data_dir` in the TOML config file
//! 3. OS-dependent default (`<data-local-dir>/moodlog`)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the data folder
pub const DATA_DIR_ENV: &str = "MOODLOG_DATA_DIR";

/// File-based configuration (`~/.config/moodlog/moodlog.toml`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Folder holding the database file
    pub data_dir: Option<String>,
    /// Listen address for the HTTP server, e.g. "127.0.0.1:5870"
    pub listen_addr: Option<String>,
    /// API key for the sentiment inference provider
    pub gemini_api_key: Option<String>,
}

/// Default configuration file path for the platform
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("moodlog").join("moodlog.toml"))
}

/// Load the TOML config file
///
/// A missing file is not an error; defaults apply.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        return Ok(TomlConfig::default());
    }
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Resolve the data folder following the priority order
pub fn resolve_data_dir(config: &TomlConfig) -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }

    if let Some(dir) = &config.data_dir {
        return PathBuf::from(dir);
    }

    dirs::data_local_dir()
        .map(|d| d.join("moodlog"))
        .unwrap_or_else(|| PathBuf::from("./moodlog_data"))
}

/// Database file path inside the data folder
pub fn database_path(data_dir: &Path) -> PathBuf {
    data_dir.join("moodlog.db")
}
