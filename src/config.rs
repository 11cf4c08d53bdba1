//! Configuration management.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::classify::DEFAULT_CACHE_CAPACITY;

/// Main configuration for skillpath.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the database.
    pub data_dir: PathBuf,
    /// Path to a catalog JSON file; the embedded catalog when `None`.
    pub catalog_path: Option<PathBuf>,
    /// Classifier memoization cache capacity.
    pub cache_capacity: usize,
    /// Roadmap owner id.
    pub user_id: String,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Data directory.
    pub data_dir: Option<String>,
    /// Catalog file path.
    pub catalog: Option<String>,
    /// Classifier cache capacity.
    pub cache_capacity: Option<usize>,
    /// Roadmap owner id.
    pub user_id: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            catalog_path: None,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            user_id: "default".to_string(),
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> crate::Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| crate::Error::OperationFailed {
                operation: "read_config_file".to_string(),
                cause: e.to_string(),
            })?;

        let file: ConfigFile =
            toml::from_str(&contents).map_err(|e| crate::Error::OperationFailed {
                operation: "parse_config_file".to_string(),
                cause: e.to_string(),
            })?;

        Ok(Self::from_config_file(file))
    }

    /// Builds a configuration from a parsed file, filling gaps with
    /// defaults.
    #[must_use]
    pub fn from_config_file(file: ConfigFile) -> Self {
        let defaults = Self::default();
        Self {
            data_dir: file.data_dir.map_or(defaults.data_dir, PathBuf::from),
            catalog_path: file.catalog.map(PathBuf::from),
            cache_capacity: file
                .cache_capacity
                .filter(|&c| c > 0)
                .unwrap_or(defaults.cache_capacity),
            user_id: file.user_id.unwrap_or(defaults.user_id),
        }
    }

    /// Path of the `SQLite` database inside the data directory.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("skillpath.db")
    }
}

/// Platform data directory, falling back to a dot directory.
fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "skillpath").map_or_else(
        || PathBuf::from(".skillpath"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}
