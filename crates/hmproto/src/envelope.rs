//! Response envelope.
//!
//! Every call answers with exactly one of
//! `{"type": "ok", "data": {...}}` or `{"type": "error", "error": {...}}`.

use crate::error::HubError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `T` is the success payload, raw JSON unless narrowed to the kind's
/// response type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Envelope<T = Value> {
    /// Success with the kind's payload. Missing `data` reads as the default
    /// (null for raw JSON).
    Ok {
        #[serde(default)]
        data: T,
    },

    /// The hub refused or failed the request
    Error { error: HubError },
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self::Ok { data }
    }

    pub fn error(error: HubError) -> Self {
        Self::Error { error }
    }

    pub fn into_result(self) -> Result<T, HubError> {
        match self {
            Self::Ok { data } => Ok(data),
            Self::Error { error } => Err(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }
}

impl Envelope<Value> {
    /// Narrow a raw envelope to the typed payload of its request kind.
    pub fn narrow<T: DeserializeOwned>(self) -> serde_json::Result<Envelope<T>> {
        match self {
            Self::Ok { data } => decode_data(data).map(Envelope::ok),
            Self::Error { error } => Ok(Envelope::Error { error }),
        }
    }
}

impl<T> From<Result<T, HubError>> for Envelope<T> {
    fn from(result: Result<T, HubError>) -> Self {
        match result {
            Ok(data) => Self::Ok { data },
            Err(error) => Self::Error { error },
        }
    }
}

/// Decode a success payload into its typed shape. A null payload decodes as
/// an empty object so that `{}`-shaped responses tolerate a bare envelope.
pub fn decode_data<T: DeserializeOwned>(data: Value) -> serde_json::Result<T> {
    match data {
        Value::Null => serde_json::from_value(Value::Object(Map::new())),
        data => serde_json::from_value(data),
    }
}
