//! Typed hub errors.
//!
//! On the wire an error is `{"code": <status>, "message": "<CODE>", ...}`.
//! The `message` string is the discriminator; `code` is the HTTP-style status.
//! Some kinds carry extra fields (`object`, `paramName`, `text`).

use crate::params::ParameterPath;
use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Resource kinds a `NOT_FOUND` error can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObjectKind {
    Room,
    Device,
    DeviceType,
    Interaction,
    Routine,
    Plugin,
    Session,
    /// A kind this client does not know. The hub's name for it stays in
    /// [`HubError::extra`].
    #[serde(other)]
    Other,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Room => "room",
            ObjectKind::Device => "device",
            ObjectKind::DeviceType => "deviceType",
            ObjectKind::Interaction => "interaction",
            ObjectKind::Routine => "routine",
            ObjectKind::Plugin => "plugin",
            ObjectKind::Session => "session",
            ObjectKind::Other => "other",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload-free error identity, used by the registry and for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // === Request shape (every kind) ===
    InvalidRequest,
    InvalidRequestJson,
    InvalidRequestType,
    InternalServerError,
    TooManyRequests,

    // === Session ===
    TokenInvalid,
    SessionTooNew,

    // === Parameter validation (kinds with parameters) ===
    MissingParameter,
    InvalidParameter,
    ParameterOutOfRange,

    // === Kind-specific ===
    LoginPasswordIncorrect,
    LoginUserNotFound,
    NotFound,
    UsernameAlreadyTaken,
    RoomAlreadyExists,
    DeviceAlreadyExists,
    PluginAlreadyInstalled,
    RoomsNotEqual,
    DevicesNotEqual,
    RoutinesNotEqual,
    CustomPluginError,
}

impl ErrorCode {
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::InvalidRequest,
        ErrorCode::InvalidRequestJson,
        ErrorCode::InvalidRequestType,
        ErrorCode::InternalServerError,
        ErrorCode::TooManyRequests,
        ErrorCode::TokenInvalid,
        ErrorCode::SessionTooNew,
        ErrorCode::MissingParameter,
        ErrorCode::InvalidParameter,
        ErrorCode::ParameterOutOfRange,
        ErrorCode::LoginPasswordIncorrect,
        ErrorCode::LoginUserNotFound,
        ErrorCode::NotFound,
        ErrorCode::UsernameAlreadyTaken,
        ErrorCode::RoomAlreadyExists,
        ErrorCode::DeviceAlreadyExists,
        ErrorCode::PluginAlreadyInstalled,
        ErrorCode::RoomsNotEqual,
        ErrorCode::DevicesNotEqual,
        ErrorCode::RoutinesNotEqual,
        ErrorCode::CustomPluginError,
    ];

    /// The `message` string used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidRequest => "INVALID_REQUEST",
            ErrorCode::InvalidRequestJson => "INVALID_REQUEST_JSON",
            ErrorCode::InvalidRequestType => "INVALID_REQUEST_TYPE",
            ErrorCode::InternalServerError => "INTERNAL_SERVER_ERROR",
            ErrorCode::TooManyRequests => "TOO_MANY_REQUESTS",
            ErrorCode::TokenInvalid => "TOKEN_INVALID",
            ErrorCode::SessionTooNew => "SESSION_TOO_NEW",
            ErrorCode::MissingParameter => "MISSING_PARAMETER",
            ErrorCode::InvalidParameter => "INVALID_PARAMETER",
            ErrorCode::ParameterOutOfRange => "PARAMETER_OUT_OF_RANGE",
            ErrorCode::LoginPasswordIncorrect => "LOGIN_PASSWORD_INCORRECT",
            ErrorCode::LoginUserNotFound => "LOGIN_USER_NOT_FOUND",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::UsernameAlreadyTaken => "USERNAME_ALREADY_TAKEN",
            ErrorCode::RoomAlreadyExists => "ROOM_ALREADY_EXISTS",
            ErrorCode::DeviceAlreadyExists => "DEVICE_ALREADY_EXISTS",
            ErrorCode::PluginAlreadyInstalled => "PLUGIN_ALREADY_INSTALLED",
            ErrorCode::RoomsNotEqual => "ROOMS_NOT_EQUAL",
            ErrorCode::DevicesNotEqual => "DEVICES_NOT_EQUAL",
            ErrorCode::RoutinesNotEqual => "ROUTINES_NOT_EQUAL",
            ErrorCode::CustomPluginError => "CUSTOM_PLUGIN_ERROR",
        }
    }

    /// HTTP-style status the hub sends with this error.
    pub fn status(&self) -> u16 {
        match self {
            ErrorCode::InvalidRequest
            | ErrorCode::InvalidRequestJson
            | ErrorCode::InvalidRequestType
            | ErrorCode::MissingParameter
            | ErrorCode::InvalidParameter
            | ErrorCode::ParameterOutOfRange
            | ErrorCode::UsernameAlreadyTaken
            | ErrorCode::RoomAlreadyExists
            | ErrorCode::DeviceAlreadyExists
            | ErrorCode::PluginAlreadyInstalled
            | ErrorCode::RoomsNotEqual
            | ErrorCode::DevicesNotEqual
            | ErrorCode::RoutinesNotEqual => 400,
            ErrorCode::TokenInvalid | ErrorCode::LoginPasswordIncorrect => 401,
            ErrorCode::SessionTooNew => 403,
            ErrorCode::NotFound | ErrorCode::LoginUserNotFound => 404,
            ErrorCode::TooManyRequests => 429,
            ErrorCode::InternalServerError | ErrorCode::CustomPluginError => 500,
        }
    }

    pub fn from_message(message: &str) -> Option<Self> {
        ErrorCode::ALL.iter().copied().find(|c| c.as_str() == message)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error identity as listed in the registry: the code plus, for `NOT_FOUND`,
/// the kind of object that was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ErrorSignature {
    pub code: ErrorCode,
    pub object: Option<ObjectKind>,
}

impl ErrorSignature {
    pub const fn of(code: ErrorCode) -> Self {
        Self { code, object: None }
    }

    pub const fn not_found(object: ObjectKind) -> Self {
        Self {
            code: ErrorCode::NotFound,
            object: Some(object),
        }
    }
}

impl fmt::Display for ErrorSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.object {
            Some(object) => write!(f, "{}({})", self.code, object),
            None => write!(f, "{}", self.code),
        }
    }
}

/// Error payload, discriminated by the `message` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "message", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    InvalidRequest,
    InvalidRequestJson,
    InvalidRequestType,
    InternalServerError,
    TooManyRequests,
    TokenInvalid,
    SessionTooNew,
    MissingParameter {
        #[serde(rename = "paramName")]
        param_name: ParameterPath,
    },
    InvalidParameter {
        #[serde(rename = "paramName")]
        param_name: ParameterPath,
    },
    ParameterOutOfRange {
        #[serde(rename = "paramName")]
        param_name: ParameterPath,
    },
    LoginPasswordIncorrect,
    LoginUserNotFound,
    NotFound {
        object: ObjectKind,
    },
    UsernameAlreadyTaken,
    RoomAlreadyExists,
    DeviceAlreadyExists,
    PluginAlreadyInstalled,
    RoomsNotEqual,
    DevicesNotEqual,
    RoutinesNotEqual,
    CustomPluginError {
        text: String,
    },
    /// A message this client does not know, or a known message whose fields
    /// do not fit. Newer hubs may send these. Never produced by serde
    /// directly; [`HubError`] builds it and keeps the remaining fields.
    #[serde(skip)]
    Unrecognized { message: String },
}

impl ErrorKind {
    /// The payload-free code, `None` for unrecognized messages.
    pub fn error_code(&self) -> Option<ErrorCode> {
        let code = match self {
            ErrorKind::InvalidRequest => ErrorCode::InvalidRequest,
            ErrorKind::InvalidRequestJson => ErrorCode::InvalidRequestJson,
            ErrorKind::InvalidRequestType => ErrorCode::InvalidRequestType,
            ErrorKind::InternalServerError => ErrorCode::InternalServerError,
            ErrorKind::TooManyRequests => ErrorCode::TooManyRequests,
            ErrorKind::TokenInvalid => ErrorCode::TokenInvalid,
            ErrorKind::SessionTooNew => ErrorCode::SessionTooNew,
            ErrorKind::MissingParameter { .. } => ErrorCode::MissingParameter,
            ErrorKind::InvalidParameter { .. } => ErrorCode::InvalidParameter,
            ErrorKind::ParameterOutOfRange { .. } => ErrorCode::ParameterOutOfRange,
            ErrorKind::LoginPasswordIncorrect => ErrorCode::LoginPasswordIncorrect,
            ErrorKind::LoginUserNotFound => ErrorCode::LoginUserNotFound,
            ErrorKind::NotFound { .. } => ErrorCode::NotFound,
            ErrorKind::UsernameAlreadyTaken => ErrorCode::UsernameAlreadyTaken,
            ErrorKind::RoomAlreadyExists => ErrorCode::RoomAlreadyExists,
            ErrorKind::DeviceAlreadyExists => ErrorCode::DeviceAlreadyExists,
            ErrorKind::PluginAlreadyInstalled => ErrorCode::PluginAlreadyInstalled,
            ErrorKind::RoomsNotEqual => ErrorCode::RoomsNotEqual,
            ErrorKind::DevicesNotEqual => ErrorCode::DevicesNotEqual,
            ErrorKind::RoutinesNotEqual => ErrorCode::RoutinesNotEqual,
            ErrorKind::CustomPluginError { .. } => ErrorCode::CustomPluginError,
            ErrorKind::Unrecognized { .. } => return None,
        };
        Some(code)
    }

    /// The path carried by parameter-validation errors.
    pub fn parameter(&self) -> Option<&ParameterPath> {
        match self {
            ErrorKind::MissingParameter { param_name }
            | ErrorKind::InvalidParameter { param_name }
            | ErrorKind::ParameterOutOfRange { param_name } => Some(param_name),
            _ => None,
        }
    }
}

/// An error answered by the hub.
///
/// Decoding never loses data: fields the typed [`ErrorKind`] does not carry,
/// or carries differently, are kept in `extra` and written back on encode, so
/// an error passes through this type unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct HubError {
    /// HTTP-style status code, 0 when the hub left it out
    pub code: u16,
    pub kind: ErrorKind,
    pub extra: Map<String, Value>,
}

impl HubError {
    /// Create an error with the canonical status for its kind.
    pub fn new(kind: ErrorKind) -> Self {
        let code = kind.error_code().map(|c| c.status()).unwrap_or(500);
        Self {
            code,
            kind,
            extra: Map::new(),
        }
    }

    pub fn unrecognized(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            kind: ErrorKind::Unrecognized {
                message: message.into(),
            },
            extra: Map::new(),
        }
    }

    pub fn not_found(object: ObjectKind) -> Self {
        Self::new(ErrorKind::NotFound { object })
    }

    pub fn custom_plugin_error(text: impl Into<String>) -> Self {
        Self::new(ErrorKind::CustomPluginError { text: text.into() })
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        self.kind.error_code()
    }

    pub fn signature(&self) -> Option<ErrorSignature> {
        let code = self.kind.error_code()?;
        let object = match &self.kind {
            ErrorKind::NotFound { object } => Some(*object),
            _ => None,
        };
        Some(ErrorSignature { code, object })
    }

    pub fn is(&self, code: ErrorCode) -> bool {
        self.kind.error_code() == Some(code)
    }

    /// The wire `message` string, as the hub sent it.
    pub fn message(&self) -> &str {
        match &self.kind {
            ErrorKind::Unrecognized { message } => message.as_str(),
            kind => kind.error_code().map(|c| c.as_str()).unwrap_or_default(),
        }
    }

    /// `message` plus the payload fields of the typed kind.
    fn typed_fields(&self) -> serde_json::Result<Map<String, Value>> {
        match &self.kind {
            ErrorKind::Unrecognized { message } => {
                let mut fields = Map::new();
                fields.insert("message".to_string(), Value::String(message.clone()));
                Ok(fields)
            }
            kind => match serde_json::to_value(kind)? {
                Value::Object(fields) => Ok(fields),
                _ => Ok(Map::new()),
            },
        }
    }
}

impl Serialize for HubError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut fields = self.typed_fields().map_err(S::Error::custom)?;
        fields.insert("code".to_string(), Value::from(self.code));
        for (key, value) in &self.extra {
            fields.insert(key.clone(), value.clone());
        }
        fields.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for HubError {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut raw = Map::<String, Value>::deserialize(deserializer)?;

        let code = match raw.remove("code") {
            None | Some(Value::Null) => 0,
            Some(value) => value
                .as_u64()
                .and_then(|c| u16::try_from(c).ok())
                .ok_or_else(|| D::Error::custom(format!("invalid error code: {}", value)))?,
        };

        let message = match raw.get("message") {
            Some(Value::String(message)) => message.clone(),
            Some(other) => {
                return Err(D::Error::custom(format!("invalid error message: {}", other)))
            }
            None => return Err(D::Error::missing_field("message")),
        };

        let kind = match ErrorCode::from_message(&message) {
            Some(_) => serde_json::from_value(Value::Object(raw.clone()))
                .unwrap_or(ErrorKind::Unrecognized { message }),
            None => ErrorKind::Unrecognized { message },
        };

        let mut error = Self {
            code,
            kind,
            extra: Map::new(),
        };
        let typed = error.typed_fields().map_err(D::Error::custom)?;
        error.extra = raw
            .into_iter()
            .filter(|(key, value)| typed.get(key) != Some(value))
            .collect();
        Ok(error)
    }
}

impl fmt::Display for HubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message())?;
        match &self.kind {
            ErrorKind::NotFound { object } => match self.extra.get("object").and_then(Value::as_str) {
                Some(raw) => write!(f, " ({})", raw),
                None => write!(f, " ({})", object),
            },
            ErrorKind::CustomPluginError { text } => write!(f, ": {}", text),
            kind => match kind.parameter() {
                Some(path) => write!(f, " at {}", path),
                None => Ok(()),
            },
        }
    }
}

impl std::error::Error for HubError {}

impl From<ErrorKind> for HubError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}
