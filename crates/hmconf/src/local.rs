//! Local client state - where the session token is persisted, log level.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Session persistence settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Directory holding the session store.
    /// Default: ~/.local/share/hm
    #[serde(default = "SessionConfig::default_state_dir")]
    pub state_dir: PathBuf,

    /// Key the token is stored under.
    /// Default: token
    #[serde(default = "SessionConfig::default_storage_key")]
    pub storage_key: String,
}

impl SessionConfig {
    fn default_state_dir() -> PathBuf {
        directories::BaseDirs::new()
            .map(|dirs| dirs.data_local_dir().join("hm"))
            .unwrap_or_else(|| PathBuf::from(".local/share/hm"))
    }

    fn default_storage_key() -> String {
        "token".to_string()
    }

    /// Path of the JSON session store file.
    pub fn store_path(&self) -> PathBuf {
        self.state_dir.join("session.json")
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            state_dir: Self::default_state_dir(),
            storage_key: Self::default_storage_key(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log filter (trace, debug, info, warn, error, or an EnvFilter directive).
    /// Default: info
    #[serde(default = "TelemetryConfig::default_log_level")]
    pub log_level: String,
}

impl TelemetryConfig {
    fn default_log_level() -> String {
        "info".to_string()
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: Self::default_log_level(),
        }
    }
}
