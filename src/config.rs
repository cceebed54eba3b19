//! Configuration management for ipyhist
//!
//! Configuration lives in a JSON file in the user's home directory. Every
//! field has a default, so a partial file (or no file at all) is valid.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".ipyhist.json";

/// Default number of entries shown per page
pub const DEFAULT_PAGE_SIZE: u32 = 50;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main configuration structure for ipyhist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Override for the history database location (`~` is expanded)
    pub history_database_path: Option<String>,

    /// Entries per page for listing and browsing
    pub page_size: u32,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Configuration for logging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when `RUST_LOG` is not set
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_database_path: None,
            page_size: DEFAULT_PAGE_SIZE,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load `<home>/.ipyhist.json`, or defaults if it does not exist
    pub fn load_from_home(home: &Path) -> Result<Self> {
        Self::load_from_path(&home.join(DEFAULT_CONFIG_FILE))
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;

        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> Result<PathBuf> {
        let home = home::home_dir().ok_or(Error::HomeDirectoryNotFound)?;
        Ok(home.join(DEFAULT_CONFIG_FILE))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::config_validation(
                "page_size",
                "must be greater than 0",
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(Error::config_validation(
                "logging.level",
                "must be one of: trace, debug, info, warn, error",
            ));
        }

        Ok(())
    }

    /// Replace the store override, e.g. from a command line flag
    pub fn with_database_path<S: Into<String>>(mut self, path: Option<S>) -> Self {
        if let Some(path) = path {
            self.history_database_path = Some(path.into());
        }
        self
    }
}
