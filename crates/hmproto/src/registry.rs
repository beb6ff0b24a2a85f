//! Per-kind contract: parameters, success shape, and the closed error set.
//!
//! The registry is a pure, total mapping over [`RequestKind`]. Every error set
//! is assembled from three layers:
//!
//! 1. generic request-shape errors, present for every kind
//! 2. `TOKEN_INVALID` for every kind except `account.login`, and the
//!    parameter-validation errors for every kind that takes parameters
//! 3. the kind's own errors, listed in [`RequestKind::spec`]

use crate::error::{ErrorCode, ErrorSignature, HubError, ObjectKind};
use crate::request::RequestKind;
use serde_json::Value;
use std::collections::BTreeSet;

/// Errors every request can fail with.
pub const GENERIC_ERRORS: &[ErrorCode] = &[
    ErrorCode::InvalidRequest,
    ErrorCode::InvalidRequestJson,
    ErrorCode::InvalidRequestType,
    ErrorCode::InternalServerError,
    ErrorCode::TooManyRequests,
];

/// Errors of requests that carry at least one parameter.
pub const PARAMETER_ERRORS: &[ErrorCode] = &[
    ErrorCode::MissingParameter,
    ErrorCode::InvalidParameter,
    ErrorCode::ParameterOutOfRange,
];

/// Top-level fields of a success payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResponseShape {
    /// Name of the payload type in `hmproto::responses`
    pub name: &'static str,
    pub fields: &'static [&'static str],
}

impl ResponseShape {
    const fn new(name: &'static str, fields: &'static [&'static str]) -> Self {
        Self { name, fields }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True if `data` is an object carrying every declared field.
    /// `null` counts as `{}`.
    pub fn matches(&self, data: &Value) -> bool {
        match data {
            Value::Object(map) => self.fields.iter().all(|f| map.contains_key(*f)),
            Value::Null => self.fields.is_empty(),
            _ => false,
        }
    }
}

const EMPTY: ResponseShape = ResponseShape::new("EmptyResponse", &[]);
const TOKEN: ResponseShape = ResponseShape::new("TokenResponse", &["token"]);
const PLUGINS: ResponseShape = ResponseShape::new("PluginsResponse", &["plugins"]);

/// Static description of one request kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestSpec {
    pub kind: RequestKind,
    /// Wire names of the parameters besides `type`
    pub params: &'static [&'static str],
    pub response: ResponseShape,
    /// Errors specific to this kind, on top of the generic layers
    pub errors: &'static [ErrorSignature],
}

impl RequestSpec {
    pub fn has_params(&self) -> bool {
        !self.params.is_empty()
    }
}

// Struct literals (not fn calls) so the error tables promote to 'static.
macro_rules! e {
    ($code:ident) => {
        ErrorSignature {
            code: ErrorCode::$code,
            object: None,
        }
    };
}

macro_rules! nf {
    ($object:ident) => {
        ErrorSignature {
            code: ErrorCode::NotFound,
            object: Some(ObjectKind::$object),
        }
    };
}

type Row = (
    &'static [&'static str],
    ResponseShape,
    &'static [ErrorSignature],
);

fn row(
    params: &'static [&'static str],
    response: ResponseShape,
    errors: &'static [ErrorSignature],
) -> Row {
    (params, response, errors)
}

impl RequestKind {
    /// The registry row for this kind.
    pub fn spec(self) -> RequestSpec {
        let (params, response, errors): Row = match self {
            RequestKind::Empty => row(&[], EMPTY, &[]),
            RequestKind::GetVersion => row(&[], ResponseShape::new("VersionResponse", &["version"]), &[]),

            RequestKind::AccountLogin => row(
                &["username", "password", "device"],
                TOKEN,
                &[e!(LoginUserNotFound), e!(LoginPasswordIncorrect)],
            ),
            RequestKind::AccountLogout => row(&[], EMPTY, &[]),
            RequestKind::AccountGetSessions => row(&[], ResponseShape::new("SessionsResponse", &["sessions"]), &[]),
            RequestKind::AccountLogoutSession => row(&["id"], EMPTY, &[nf!(Session)]),
            RequestKind::AccountLogoutOtherSessions => row(&[], ResponseShape::new("CountResponse", &["count"]), &[]),
            RequestKind::AccountChangePassword => row(
                &["oldPassword", "newPassword"],
                EMPTY,
                &[e!(LoginPasswordIncorrect), e!(SessionTooNew)],
            ),
            RequestKind::AccountChangeUsername => row(
                &["username"],
                TOKEN,
                &[e!(UsernameAlreadyTaken), e!(SessionTooNew)],
            ),
            RequestKind::AccountCheckUsernameAvailable => row(
                &["username"],
                ResponseShape::new("UsernameAvailableResponse", &["available"]),
                &[],
            ),

            RequestKind::RoomsGetRooms => row(&[], ResponseShape::new("RoomsResponse", &["rooms"]), &[]),
            RequestKind::RoomsGetRoom => row(
                &["id"],
                ResponseShape::new("RoomResponse", &["room"]),
                &[nf!(Room)],
            ),
            RequestKind::RoomsAddRoom => row(&["room"], EMPTY, &[e!(RoomAlreadyExists)]),
            RequestKind::RoomsEditRoom => row(&["room"], EMPTY, &[nf!(Room)]),
            RequestKind::RoomsRemoveRoom => row(&["id"], EMPTY, &[nf!(Room)]),
            RequestKind::RoomsChangeRoomOrder => row(&["ids"], EMPTY, &[e!(RoomsNotEqual)]),

            RequestKind::DevicesGetDevices => row(
                &["roomId"],
                ResponseShape::new("DevicesResponse", &["devices"]),
                &[nf!(Room)],
            ),
            RequestKind::DevicesGetDeviceInfo => row(
                &["roomId", "id"],
                ResponseShape::new("DeviceInfoResponse", &["info"]),
                &[nf!(Room), nf!(Device), e!(CustomPluginError)],
            ),
            RequestKind::DevicesAddDevice => row(
                &["roomId", "device"],
                EMPTY,
                &[
                    nf!(Room),
                    nf!(DeviceType),
                    e!(DeviceAlreadyExists),
                    e!(CustomPluginError),
                ],
            ),
            RequestKind::DevicesEditDevice => row(
                &["roomId", "device"],
                EMPTY,
                &[nf!(Room), nf!(Device), e!(CustomPluginError)],
            ),
            RequestKind::DevicesDeleteDevice => row(&["roomId", "id"], EMPTY, &[nf!(Room), nf!(Device)]),
            RequestKind::DevicesChangeDeviceOrder => row(
                &["roomId", "ids"],
                EMPTY,
                &[nf!(Room), e!(DevicesNotEqual)],
            ),
            RequestKind::DevicesMoveDevice => row(
                &["roomId", "id", "newRoomId"],
                EMPTY,
                &[nf!(Room), nf!(Device), e!(DeviceAlreadyExists)],
            ),
            RequestKind::DevicesGetDeviceTypes => row(
                &["controllerType"],
                ResponseShape::new("DeviceTypesResponse", &["types"]),
                &[],
            ),
            RequestKind::DevicesGetFavoriteDevices => row(
                &[],
                ResponseShape::new("FavoriteDevicesResponse", &["devices"]),
                &[],
            ),
            RequestKind::DevicesToggleIsFavorite => row(
                &["roomId", "id", "isFavorite"],
                EMPTY,
                &[nf!(Room), nf!(Device)],
            ),
            RequestKind::DevicesSendAction => row(
                &["roomId", "deviceId", "interactionId", "action"],
                EMPTY,
                &[
                    nf!(Room),
                    nf!(Device),
                    nf!(Interaction),
                    e!(CustomPluginError),
                ],
            ),

            RequestKind::AutomationGetRoutines => row(
                &[],
                ResponseShape::new("RoutinesResponse", &["routines", "order"]),
                &[],
            ),
            RequestKind::AutomationAddRoutine => row(&["routine"], ResponseShape::new("RoutineIdResponse", &["id"]), &[]),
            RequestKind::AutomationEditRoutine => row(&["id", "routine"], EMPTY, &[nf!(Routine)]),
            RequestKind::AutomationDeleteRoutine => row(&["id"], EMPTY, &[nf!(Routine)]),
            RequestKind::AutomationChangeRoutineOrder => row(&["ids"], EMPTY, &[e!(RoutinesNotEqual)]),
            RequestKind::AutomationTriggerRoutine => row(&["id"], EMPTY, &[nf!(Routine), e!(CustomPluginError)]),

            RequestKind::PluginsGetInstalled => row(&[], PLUGINS, &[]),
            RequestKind::PluginsSearch => row(&["text"], PLUGINS, &[]),
            RequestKind::PluginsGetDetails => row(
                &["id"],
                ResponseShape::new("PluginResponse", &["plugin"]),
                &[nf!(Plugin)],
            ),
            RequestKind::PluginsInstall => row(&["id"], EMPTY, &[nf!(Plugin), e!(PluginAlreadyInstalled)]),
            RequestKind::PluginsUninstall => row(&["id"], EMPTY, &[nf!(Plugin)]),
            RequestKind::PluginsToggleActivated => row(&["id", "isActivated"], EMPTY, &[nf!(Plugin)]),
            RequestKind::PluginsGetSettings => row(
                &["id"],
                ResponseShape::new("PluginSettingsResponse", &["fields", "values"]),
                &[nf!(Plugin)],
            ),
            RequestKind::PluginsUpdateSettings => row(
                &["id", "values"],
                EMPTY,
                &[nf!(Plugin), e!(CustomPluginError)],
            ),
        };

        RequestSpec {
            kind: self,
            params,
            response,
            errors,
        }
    }
}

/// Success payload shape of a request kind.
pub fn response_for(kind: RequestKind) -> ResponseShape {
    kind.spec().response
}

/// Every error the hub may answer a request of this kind with.
pub fn error_set_for(kind: RequestKind) -> ErrorSet {
    let spec = kind.spec();
    let mut set = BTreeSet::new();

    set.extend(GENERIC_ERRORS.iter().map(|c| ErrorSignature::of(*c)));
    if kind.requires_token() {
        set.insert(ErrorSignature::of(ErrorCode::TokenInvalid));
    }
    if spec.has_params() {
        set.extend(PARAMETER_ERRORS.iter().map(|c| ErrorSignature::of(*c)));
    }
    set.extend(spec.errors.iter().copied());

    ErrorSet(set)
}

/// Closed, ordered set of error signatures.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorSet(BTreeSet<ErrorSignature>);

impl ErrorSet {
    /// True if a concrete hub error is allowed by this set.
    ///
    /// `NOT_FOUND` must match on the object kind too; unrecognized errors are
    /// never contained.
    pub fn contains(&self, error: &HubError) -> bool {
        match error.signature() {
            Some(sig) => self.0.contains(&sig),
            None => false,
        }
    }

    /// True if any signature carries this code.
    pub fn includes(&self, code: ErrorCode) -> bool {
        self.0.iter().any(|s| s.code == code)
    }

    pub fn codes(&self) -> BTreeSet<ErrorCode> {
        self.0.iter().map(|s| s.code).collect()
    }

    /// `NOT_FOUND` object kinds reachable for this request.
    pub fn not_found_objects(&self) -> Vec<ObjectKind> {
        self.0.iter().filter_map(|s| s.object).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ErrorSignature> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{response_template, HubRequest};
    use pretty_assertions::assert_eq;

    #[test]
    fn generic_errors_everywhere() {
        for kind in RequestKind::ALL {
            let set = error_set_for(*kind);
            for code in GENERIC_ERRORS {
                assert!(set.includes(*code), "{} lacks {}", kind, code);
            }
        }
    }

    #[test]
    fn token_invalid_everywhere_but_login() {
        for kind in RequestKind::ALL {
            let set = error_set_for(*kind);
            assert_eq!(
                set.includes(ErrorCode::TokenInvalid),
                *kind != RequestKind::AccountLogin,
                "{}",
                kind
            );
        }
    }

    #[test]
    fn parameter_errors_follow_params() {
        for kind in RequestKind::ALL {
            let set = error_set_for(*kind);
            let has_params = kind.spec().has_params();
            for code in PARAMETER_ERRORS {
                assert_eq!(set.includes(*code), has_params, "{} / {}", kind, code);
            }
        }
        assert!(!error_set_for(RequestKind::AccountLogout).includes(ErrorCode::MissingParameter));
        assert!(error_set_for(RequestKind::AccountLogin).includes(ErrorCode::MissingParameter));
    }

    #[test]
    fn registry_is_pure() {
        for kind in RequestKind::ALL {
            assert_eq!(error_set_for(*kind), error_set_for(*kind));
            assert_eq!(response_for(*kind), response_for(*kind));
        }
    }

    #[test]
    fn params_match_request_types() {
        for kind in RequestKind::ALL {
            let json = serde_json::to_value(HubRequest::template(*kind)).unwrap();
            let mut keys: Vec<&str> = json
                .as_object()
                .unwrap()
                .keys()
                .map(|k| k.as_str())
                .filter(|k| *k != "type")
                .collect();
            keys.sort_unstable();

            let mut declared = kind.spec().params.to_vec();
            declared.sort_unstable();
            assert_eq!(keys, declared, "{}", kind);
        }
    }

    #[test]
    fn response_shapes_match_response_types() {
        for kind in RequestKind::ALL {
            let template = response_template(*kind);
            let shape = response_for(*kind);
            let mut keys: Vec<&str> = template
                .as_object()
                .unwrap()
                .keys()
                .map(|k| k.as_str())
                .collect();
            keys.sort_unstable();

            let mut declared = shape.fields.to_vec();
            declared.sort_unstable();
            assert_eq!(keys, declared, "{}", kind);
            assert!(shape.matches(&template));
        }
    }

    #[test]
    fn not_found_objects_are_exact() {
        let set = error_set_for(RequestKind::DevicesSendAction);
        assert_eq!(
            set.not_found_objects(),
            vec![ObjectKind::Room, ObjectKind::Device, ObjectKind::Interaction]
        );
        assert!(set.contains(&HubError::not_found(ObjectKind::Device)));
        assert!(!set.contains(&HubError::not_found(ObjectKind::Plugin)));
        assert!(!set.contains(&HubError::unrecognized(418, "TEAPOT")));
    }

    #[test]
    fn login_error_set() {
        let codes = error_set_for(RequestKind::AccountLogin).codes();
        let expected: BTreeSet<_> = [
            ErrorCode::InvalidRequest,
            ErrorCode::InvalidRequestJson,
            ErrorCode::InvalidRequestType,
            ErrorCode::InternalServerError,
            ErrorCode::TooManyRequests,
            ErrorCode::MissingParameter,
            ErrorCode::InvalidParameter,
            ErrorCode::ParameterOutOfRange,
            ErrorCode::LoginUserNotFound,
            ErrorCode::LoginPasswordIncorrect,
        ]
        .into_iter()
        .collect();
        assert_eq!(codes, expected);
    }

    #[test]
    fn shape_matching() {
        let token = response_for(RequestKind::AccountLogin);
        assert!(token.matches(&serde_json::json!({"token": "t"})));
        assert!(!token.matches(&serde_json::json!({})));
        assert!(!token.matches(&Value::Null));
        assert!(response_for(RequestKind::AccountLogout).matches(&Value::Null));
    }
}
