//! Service configuration
//!
//! Loaded from a TOML file when one is given or present in the default
//! location; every field has a workable default so a bare `domus serve`
//! runs without any file at all.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Could not determine a data directory")]
    NoDataDir,
}

/// Reviewer addresses the approval chain notifies
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Contacts {
    pub hod_email: String,
    pub admin_email: String,
}

impl Default for Contacts {
    fn default() -> Self {
        Self {
            hod_email: "hod@example.edu".into(),
            admin_email: "admin@example.edu".into(),
        }
    }
}

/// Top-level service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// TCP port the service listens on
    pub port: u16,
    /// Where the database lives; defaults to the platform data directory
    pub data_dir: Option<PathBuf>,
    pub contacts: Contacts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: domus_net::DEFAULT_PORT,
            data_dir: None,
            contacts: Contacts::default(),
        }
    }
}

impl Config {
    /// Load from an explicit path, or fall back to defaults if absent
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Resolve the database file path, creating the directory if needed
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        let dir = match &self.data_dir {
            Some(dir) => dir.clone(),
            None => ProjectDirs::from("dev", "domus", "domus")
                .ok_or(ConfigError::NoDataDir)?
                .data_dir()
                .to_path_buf(),
        };
        std::fs::create_dir_all(&dir)?;
        Ok(dir.join("domus.db"))
    }
}
