//! Client configuration.
//!
//! The configuration is an explicit value passed into the
//! `SessionController` at construction. There is no ambient global state:
//! callers either build a [`ClientConfig`] in code or load one from a TOML
//! file.

use crate::error::{DbChatError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_page_size() -> u32 {
    10
}

/// Configuration for the dbchat client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the backend service.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Page size used when a caller does not specify one.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            default_page_size: default_page_size(),
        }
    }
}

impl ClientConfig {
    /// Parses a configuration from a TOML string.
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Loads a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            DbChatError::internal(format!(
                "failed to read config {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Returns the default config file location
    /// (`<config dir>/dbchat/config.toml`), if a config directory exists
    /// on this platform.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dbchat").join("config.toml"))
    }
}
