//! Errors surfaced by the dispatch layer.

use hmproto::{Envelope, ErrorCode, HubError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// Wire `message` of the client-side pseudo-error for unreachable hubs.
pub const NETWORK_ERROR: &str = "NETWORK_ERROR";

/// Wire `message` used when rendering a malformed hub answer.
pub const PROTOCOL_ERROR: &str = "PROTOCOL_ERROR";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Connection refused, DNS failure, TLS failure
    Connect,
    Timeout,
    /// The connection broke while reading the answer
    Body,
    Other,
}

/// What went wrong below the protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl From<&reqwest::Error> for TransportFailure {
    fn from(error: &reqwest::Error) -> Self {
        let kind = if error.is_timeout() {
            FailureKind::Timeout
        } else if error.is_connect() {
            FailureKind::Connect
        } else if error.is_body() || error.is_decode() {
            FailureKind::Body
        } else {
            FailureKind::Other
        };
        Self {
            kind,
            message: error.to_string(),
        }
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            FailureKind::Connect => "connect",
            FailureKind::Timeout => "timeout",
            FailureKind::Body => "body",
            FailureKind::Other => "request",
        };
        write!(f, "{} failure: {}", kind, self.message)
    }
}

/// Errors that can occur when talking to the hub.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClientError {
    /// The hub answered with an error envelope
    #[error("Hub error: {0}")]
    Hub(HubError),

    /// The hub could not be reached
    #[error("Network error: {data}")]
    Network { data: TransportFailure },

    /// The hub answered with something that is not a valid envelope
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl ClientError {
    pub fn network(error: &reqwest::Error) -> Self {
        Self::Network { data: error.into() }
    }

    pub fn hub_error(&self) -> Option<&HubError> {
        match self {
            Self::Hub(error) => Some(error),
            _ => None,
        }
    }

    /// True for hub errors with the given code.
    pub fn is(&self, code: ErrorCode) -> bool {
        self.hub_error().is_some_and(|e| e.is(code))
    }

    /// The wire `message`, including the client-side pseudo-errors.
    pub fn message(&self) -> &str {
        match self {
            Self::Hub(error) => error.message(),
            Self::Network { .. } => NETWORK_ERROR,
            Self::Protocol(_) => PROTOCOL_ERROR,
        }
    }

    /// The error as the envelope a caller would have seen on the wire.
    pub fn to_envelope(&self) -> Value {
        match self {
            Self::Hub(error) => serde_json::to_value(Envelope::<Value>::error(error.clone()))
                .unwrap_or_else(|_| json!({"type": "error", "error": {"message": error.message()}})),
            Self::Network { data } => json!({
                "type": "error",
                "error": {"message": NETWORK_ERROR, "data": data},
            }),
            Self::Protocol(message) => json!({
                "type": "error",
                "error": {"message": PROTOCOL_ERROR, "data": message},
            }),
        }
    }
}

impl From<HubError> for ClientError {
    fn from(error: HubError) -> Self {
        Self::Hub(error)
    }
}
