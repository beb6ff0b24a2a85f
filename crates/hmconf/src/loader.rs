//! Config file discovery, table merging, and environment variable overlay.

use crate::{ConfigError, HmConfig, TokenPlacement};
use std::env;
use std::path::{Path, PathBuf};

/// Information about where config values came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Config files that were loaded (in order)
    pub files: Vec<PathBuf>,
    /// Environment variables that overrode config values
    pub env_overrides: Vec<String>,
}

/// Discover config files in standard locations.
///
/// Returns paths in load order (system, user, local).
/// Only returns files that exist.
pub fn discover_config_files() -> Vec<PathBuf> {
    discover_config_files_with_override(None)
}

/// Discover config files, optionally with a CLI override path.
///
/// If `cli_path` is provided it replaces the local override. A missing CLI
/// path is still returned so the read reports it.
pub fn discover_config_files_with_override(cli_path: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let system = PathBuf::from("/etc/hm/config.toml");
    if system.exists() {
        files.push(system);
    }

    // XDG_CONFIG_HOME or ~/.config
    if let Some(config_dir) = directories::BaseDirs::new().map(|d| d.config_dir().to_path_buf()) {
        let user = config_dir.join("hm/config.toml");
        if user.exists() {
            files.push(user);
        }
    }

    if let Some(path) = cli_path {
        files.push(path.to_path_buf());
        return files;
    }

    let local = PathBuf::from("hm.toml");
    if local.exists() {
        files.push(local);
    }

    files
}

/// Read a config file as a raw TOML table.
pub fn read_table(path: &Path) -> Result<toml::Table, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    contents.parse().map_err(|e: toml::de::Error| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Merge `overlay` into `base`. Nested tables merge key by key, any other
/// value in `overlay` replaces the one in `base`.
pub fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Turn a merged table into a config. Missing keys take their defaults.
pub fn from_table(table: toml::Table, origin: &Path) -> Result<HmConfig, ConfigError> {
    let mut config: HmConfig =
        toml::Value::Table(table)
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::Parse {
                path: origin.to_path_buf(),
                message: e.to_string(),
            })?;

    let state_dir = config.session.state_dir.to_string_lossy().into_owned();
    config.session.state_dir = expand_path(&state_dir);

    Ok(config)
}

/// Apply environment variable overrides to config.
pub fn apply_env_overrides(
    config: &mut HmConfig,
    sources: &mut ConfigSources,
) -> Result<(), ConfigError> {
    apply_overrides_from(config, sources, |name| env::var(name).ok())
}

/// Same as [`apply_env_overrides`] with a custom variable lookup.
pub fn apply_overrides_from<F>(
    config: &mut HmConfig,
    sources: &mut ConfigSources,
    lookup: F,
) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    // Hub
    if let Some(v) = lookup("HM_HUB_URL") {
        config.hub.url = v;
        sources.env_overrides.push("HM_HUB_URL".to_string());
    }
    if let Some(v) = lookup("HM_TIMEOUT_SECS") {
        config.hub.timeout_secs = parse_env("HM_TIMEOUT_SECS", &v)?;
        sources.env_overrides.push("HM_TIMEOUT_SECS".to_string());
    }
    if let Some(v) = lookup("HM_TOKEN_PLACEMENT") {
        config.hub.token_placement = parse_env::<TokenPlacement>("HM_TOKEN_PLACEMENT", &v)?;
        sources.env_overrides.push("HM_TOKEN_PLACEMENT".to_string());
    }

    // Retry
    if let Some(v) = lookup("HM_RETRY_DELAY_MS") {
        config.retry.delay_ms = parse_env("HM_RETRY_DELAY_MS", &v)?;
        sources.env_overrides.push("HM_RETRY_DELAY_MS".to_string());
    }
    if let Some(v) = lookup("HM_RETRY_MAX") {
        config.retry.max_retries = parse_env("HM_RETRY_MAX", &v)?;
        sources.env_overrides.push("HM_RETRY_MAX".to_string());
    }
    if let Some(v) = lookup("HM_RETRY_FOREVER") {
        config.retry.retry_forever = parse_flag("HM_RETRY_FOREVER", &v)?;
        sources.env_overrides.push("HM_RETRY_FOREVER".to_string());
    }

    // Session
    if let Some(v) = lookup("HM_STATE_DIR") {
        config.session.state_dir = expand_path(&v);
        sources.env_overrides.push("HM_STATE_DIR".to_string());
    }

    // Telemetry
    if let Some(v) = lookup("HM_LOG_LEVEL") {
        config.telemetry.log_level = v;
        sources.env_overrides.push("HM_LOG_LEVEL".to_string());
    }
    // RUST_LOG wins over HM_LOG_LEVEL
    if let Some(v) = lookup("RUST_LOG") {
        config.telemetry.log_level = v;
        sources.env_overrides.push("RUST_LOG".to_string());
    }

    Ok(())
}

fn parse_env<T>(name: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidEnv {
        name: name.to_string(),
        message: e.to_string(),
    })
}

fn parse_flag(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::InvalidEnv {
            name: name.to_string(),
            message: format!("expected a boolean, got {}", other),
        }),
    }
}

/// Expand ~ and environment variables in a path.
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        match directories::BaseDirs::new() {
            Some(dirs) => dirs.home_dir().join(stripped),
            None => PathBuf::from(path),
        }
    } else if let Some(stripped) = path.strip_prefix('$') {
        // $VAR/rest/of/path
        if let Some(slash_pos) = stripped.find('/') {
            let var_name = &stripped[..slash_pos];
            match env::var(var_name) {
                Ok(var_value) => PathBuf::from(var_value).join(&stripped[slash_pos + 1..]),
                Err(_) => PathBuf::from(path),
            }
        } else {
            env::var(stripped)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(path))
        }
    } else {
        PathBuf::from(path)
    }
}
