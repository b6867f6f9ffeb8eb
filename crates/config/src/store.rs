// Settings store configuration
// Loaded from ~/.config/scoped-settings/config.toml

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite database file. None = platform data dir.
    pub database: Option<PathBuf>,

    /// Keep rows in memory only (nothing written to disk)
    pub in_memory: bool,

    /// Process-local read cache
    pub cache: bool,

    /// Seeds the defaults registry at startup
    pub defaults: serde_json::Map<String, serde_json::Value>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: None,
            in_memory: false,
            cache: true,
            defaults: serde_json::Map::new(),
        }
    }
}

impl StoreConfig {
    /// Get the config file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("scoped-settings");
        config_dir.join("config.toml")
    }

    /// Load config from disk, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "using default store config");
                Self::default()
            }
        }
    }

    /// Load config from `path`, failing on unreadable or malformed files
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// The database file to open: configured, or under the platform data dir
    pub fn database_path(&self) -> PathBuf {
        self.database.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("scoped-settings")
                .join("settings.db")
        })
    }
}
