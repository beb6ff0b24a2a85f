//! Hub connection configuration - where to send requests and how.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the session token travels next to the request body.
///
/// The token is never part of the JSON body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPlacement {
    /// `?token=...` on the request URL, body sent as `text/plain`, so browsers
    /// treat it as a simple request and skip the CORS preflight.
    #[default]
    Query,
    /// `Authorization: Bearer ...` header
    Header,
}

impl fmt::Display for TokenPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenPlacement::Query => f.write_str("query"),
            TokenPlacement::Header => f.write_str("header"),
        }
    }
}

impl FromStr for TokenPlacement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "query" => Ok(TokenPlacement::Query),
            "header" => Ok(TokenPlacement::Header),
            other => Err(format!("unknown token placement: {}", other)),
        }
    }
}

/// Hub endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubConfig {
    /// Base URL of the hub; requests go to `{url}/api`.
    /// Default: http://localhost:8080
    #[serde(default = "HubConfig::default_url")]
    pub url: String,

    /// Per-request timeout in seconds.
    /// Default: 20
    #[serde(default = "HubConfig::default_timeout_secs")]
    pub timeout_secs: u64,

    /// Default: query
    #[serde(default)]
    pub token_placement: TokenPlacement,
}

impl HubConfig {
    fn default_url() -> String {
        "http://localhost:8080".to_string()
    }

    fn default_timeout_secs() -> u64 {
        20
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            url: Self::default_url(),
            timeout_secs: Self::default_timeout_secs(),
            token_placement: TokenPlacement::default(),
        }
    }
}

/// Resend policy for `TOO_MANY_REQUESTS` answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Delay before the first resend, in milliseconds.
    /// Default: 1000
    #[serde(default = "RetryConfig::default_delay_ms")]
    pub delay_ms: u64,

    /// Upper bound on the delay when `exponential` is set.
    /// Default: 30000
    #[serde(default = "RetryConfig::default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Resends before giving up and returning the error.
    /// Default: 10
    #[serde(default = "RetryConfig::default_max_retries")]
    pub max_retries: u32,

    /// Ignore `max_retries` and resend until the hub accepts.
    /// Default: false
    #[serde(default)]
    pub retry_forever: bool,

    /// Double the delay after every attempt.
    /// Default: false
    #[serde(default)]
    pub exponential: bool,
}

impl RetryConfig {
    fn default_delay_ms() -> u64 {
        1000
    }

    fn default_max_delay_ms() -> u64 {
        30_000
    }

    fn default_max_retries() -> u32 {
        10
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            delay_ms: Self::default_delay_ms(),
            max_delay_ms: Self::default_max_delay_ms(),
            max_retries: Self::default_max_retries(),
            retry_forever: false,
            exponential: false,
        }
    }
}
