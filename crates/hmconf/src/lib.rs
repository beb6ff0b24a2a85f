//! Configuration loading for hm clients.
//!
//! Small and dependency-light so both the client library and the CLI can
//! share it.
//!
//! # Usage
//!
//! ```rust,no_run
//! use hmconf::HmConfig;
//!
//! let config = HmConfig::load().expect("Failed to load config");
//! println!("Hub: {}", config.hub.url);
//! println!("Session store: {}", config.session.store_path().display());
//! ```
//!
//! # Config File Locations
//!
//! Files are loaded in order (later wins, key by key):
//! 1. `/etc/hm/config.toml` (system)
//! 2. `~/.config/hm/config.toml` (user)
//! 3. `./hm.toml` (local override, replaced by an explicit `--config` path)
//! 4. Environment variables (`HM_*`, `RUST_LOG`)
//!
//! # Example Config
//!
//! ```toml
//! [hub]
//! url = "http://192.168.1.20:8080"
//! timeout_secs = 20
//! token_placement = "query"
//!
//! [retry]
//! delay_ms = 1000
//! max_retries = 10
//!
//! [session]
//! state_dir = "~/.local/share/hm"
//!
//! [telemetry]
//! log_level = "info"
//! ```

pub mod hub;
pub mod loader;
pub mod local;

pub use hub::{HubConfig, RetryConfig, TokenPlacement};
pub use loader::{discover_config_files_with_override, ConfigSources};
pub use local::{SessionConfig, TelemetryConfig};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid value for {name}: {message}")]
    InvalidEnv { name: String, message: String },
}

/// Complete client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HmConfig {
    #[serde(default)]
    pub hub: HubConfig,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl HmConfig {
    /// Load configuration from all sources.
    ///
    /// Load order (later wins):
    /// 1. Compiled defaults
    /// 2. `/etc/hm/config.toml`
    /// 3. `~/.config/hm/config.toml`
    /// 4. `./hm.toml`
    /// 5. Environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(None)?;
        Ok(config)
    }

    /// Load with an explicit config file in place of `./hm.toml`.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(config_path)?;
        Ok(config)
    }

    /// Load configuration and report which files and variables contributed.
    pub fn load_with_sources_from(
        config_path: Option<&Path>,
    ) -> Result<(Self, ConfigSources), ConfigError> {
        let mut sources = ConfigSources::default();
        let mut merged = toml::Table::new();

        for path in loader::discover_config_files_with_override(config_path) {
            let table = loader::read_table(&path)?;
            loader::merge_tables(&mut merged, table);
            sources.files.push(path);
        }

        let origin = sources
            .files
            .last()
            .cloned()
            .unwrap_or_else(|| PathBuf::from("<defaults>"));
        let mut config = loader::from_table(merged, &origin)?;

        loader::apply_env_overrides(&mut config, &mut sources)?;

        Ok((config, sources))
    }

    /// Serialize config to a TOML string.
    pub fn to_toml(&self) -> String {
        let mut output = String::from("# hm client configuration\n\n");
        match toml::to_string_pretty(self) {
            Ok(body) => output.push_str(&body),
            Err(e) => output.push_str(&format!("# failed to render config: {}\n", e)),
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HmConfig::default();
        assert_eq!(config.hub.url, "http://localhost:8080");
        assert_eq!(config.retry.max_retries, 10);
        assert_eq!(config.session.storage_key, "token");
    }

    #[test]
    fn test_to_toml_parses_back() {
        let config = HmConfig::default();
        let rendered = config.to_toml();
        assert!(rendered.contains("[hub]"));
        assert!(rendered.contains("[retry]"));

        let parsed: HmConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_explicit_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[hub]\nurl = \"http://hub.test:9000\"\n").unwrap();

        let (config, sources) = HmConfig::load_with_sources_from(Some(&path)).unwrap();
        assert!(sources.files.contains(&path));
        // HM_HUB_URL in the environment would shadow the file
        if !sources.env_overrides.iter().any(|v| v == "HM_HUB_URL") {
            assert_eq!(config.hub.url, "http://hub.test:9000");
        }
    }

    #[test]
    fn test_unparseable_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[hub\nurl = ").unwrap();

        match HmConfig::load_from(Some(&path)) {
            Err(ConfigError::Parse { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
