//! Typed requests for the hub API.
//!
//! The request catalog is declared once in the `hub_requests!` invocation
//! below. It produces:
//! - [`RequestKind`]: the closed set of kinds with their wire `type` strings
//! - [`HubRequest`]: the serializable request, tagged by `type`
//! - a [`HubCall`] impl per request struct, binding it to its response type

use crate::domain::{Device, Room, Routine};
use crate::responses::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// A request struct that maps to exactly one request kind and response type.
pub trait HubCall: Into<HubRequest> + Send {
    const KIND: RequestKind;
    type Response: DeserializeOwned + Serialize + fmt::Debug + Send;
}

macro_rules! hub_requests {
    ($( $(#[$doc:meta])* $variant:ident($request:ident) => $wire:literal -> $response:ty; )*) => {
        /// Every request kind the hub understands.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum RequestKind {
            $( $(#[$doc])* $variant, )*
        }

        impl RequestKind {
            pub const ALL: &'static [RequestKind] = &[ $( RequestKind::$variant, )* ];

            /// The wire `type` string.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( RequestKind::$variant => $wire, )*
                }
            }

            pub fn from_type(type_name: &str) -> Option<Self> {
                match type_name {
                    $( $wire => Some(RequestKind::$variant), )*
                    _ => None,
                }
            }
        }

        /// A request ready to be sent. Serializes to `{"type": "...", ...params}`.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(tag = "type")]
        pub enum HubRequest {
            $( $(#[$doc])* #[serde(rename = $wire)] $variant($request), )*
        }

        impl HubRequest {
            pub fn kind(&self) -> RequestKind {
                match self {
                    $( HubRequest::$variant(_) => RequestKind::$variant, )*
                }
            }

            /// A request of the given kind with every parameter at its default
            /// value. Useful as a skeleton to fill in.
            pub fn template(kind: RequestKind) -> Self {
                match kind {
                    $( RequestKind::$variant => HubRequest::$variant($request::default()), )*
                }
            }
        }

        #[cfg(test)]
        pub(crate) fn response_template(kind: RequestKind) -> Value {
            match kind {
                $( RequestKind::$variant => serde_json::to_value(<$response>::default())
                    .unwrap_or(Value::Null), )*
            }
        }

        $(
            impl From<$request> for HubRequest {
                fn from(request: $request) -> Self {
                    HubRequest::$variant(request)
                }
            }

            impl HubCall for $request {
                const KIND: RequestKind = RequestKind::$variant;
                type Response = $response;
            }
        )*
    };
}

hub_requests! {
    // ==========================================================================
    // Generic
    // ==========================================================================
    /// No-op, answers with an empty payload
    Empty(EmptyRequest) => "empty" -> EmptyResponse;
    /// Hub version string
    GetVersion(GetVersionRequest) => "getVersion" -> VersionResponse;

    // ==========================================================================
    // Account
    // ==========================================================================
    /// Exchange credentials for a session token
    AccountLogin(LoginRequest) => "account.login" -> TokenResponse;
    /// End the current session
    AccountLogout(LogoutRequest) => "account.logout" -> EmptyResponse;
    /// List active sessions of the current user
    AccountGetSessions(GetSessionsRequest) => "account.getSessions" -> SessionsResponse;
    /// End one session by id
    AccountLogoutSession(LogoutSessionRequest) => "account.logoutSession" -> EmptyResponse;
    /// End every session except the current one
    AccountLogoutOtherSessions(LogoutOtherSessionsRequest) => "account.logoutOtherSessions" -> CountResponse;
    AccountChangePassword(ChangePasswordRequest) => "account.changePassword" -> EmptyResponse;
    /// Rename the user; the hub issues a fresh token
    AccountChangeUsername(ChangeUsernameRequest) => "account.changeUsername" -> TokenResponse;
    AccountCheckUsernameAvailable(CheckUsernameAvailableRequest) => "account.checkUsernameAvailable" -> UsernameAvailableResponse;

    // ==========================================================================
    // Rooms
    // ==========================================================================
    RoomsGetRooms(GetRoomsRequest) => "rooms.getRooms" -> RoomsResponse;
    RoomsGetRoom(GetRoomRequest) => "rooms.getRoom" -> RoomResponse;
    RoomsAddRoom(AddRoomRequest) => "rooms.addRoom" -> EmptyResponse;
    RoomsEditRoom(EditRoomRequest) => "rooms.editRoom" -> EmptyResponse;
    RoomsRemoveRoom(RemoveRoomRequest) => "rooms.removeRoom" -> EmptyResponse;
    /// Reorder rooms; `ids` must be a permutation of the existing room ids
    RoomsChangeRoomOrder(ChangeRoomOrderRequest) => "rooms.changeRoomOrder" -> EmptyResponse;

    // ==========================================================================
    // Devices
    // ==========================================================================
    DevicesGetDevices(GetDevicesRequest) => "devices.getDevices" -> DevicesResponse;
    DevicesGetDeviceInfo(GetDeviceInfoRequest) => "devices.getDeviceInfo" -> DeviceInfoResponse;
    DevicesAddDevice(AddDeviceRequest) => "devices.addDevice" -> EmptyResponse;
    DevicesEditDevice(EditDeviceRequest) => "devices.editDevice" -> EmptyResponse;
    DevicesDeleteDevice(DeleteDeviceRequest) => "devices.deleteDevice" -> EmptyResponse;
    DevicesChangeDeviceOrder(ChangeDeviceOrderRequest) => "devices.changeDeviceOrder" -> EmptyResponse;
    /// Move a device to another room, keeping its id
    DevicesMoveDevice(MoveDeviceRequest) => "devices.moveDevice" -> EmptyResponse;
    /// Device types available for a room controller type
    DevicesGetDeviceTypes(GetDeviceTypesRequest) => "devices.getDeviceTypes" -> DeviceTypesResponse;
    DevicesGetFavoriteDevices(GetFavoriteDevicesRequest) => "devices.getFavoriteDevices" -> FavoriteDevicesResponse;
    DevicesToggleIsFavorite(ToggleIsFavoriteRequest) => "devices.toggleIsFavorite" -> EmptyResponse;
    /// Forward a UI interaction (button press, slider move) to the device
    DevicesSendAction(SendActionRequest) => "devices.interactions.sendAction" -> EmptyResponse;

    // ==========================================================================
    // Automation
    // ==========================================================================
    AutomationGetRoutines(GetRoutinesRequest) => "automation.getRoutines" -> RoutinesResponse;
    AutomationAddRoutine(AddRoutineRequest) => "automation.addRoutine" -> RoutineIdResponse;
    AutomationEditRoutine(EditRoutineRequest) => "automation.editRoutine" -> EmptyResponse;
    AutomationDeleteRoutine(DeleteRoutineRequest) => "automation.deleteRoutine" -> EmptyResponse;
    AutomationChangeRoutineOrder(ChangeRoutineOrderRequest) => "automation.changeRoutineOrder" -> EmptyResponse;
    /// Run a routine's actions now, regardless of its triggers
    AutomationTriggerRoutine(TriggerRoutineRequest) => "automation.triggerRoutine" -> EmptyResponse;

    // ==========================================================================
    // Plugins
    // ==========================================================================
    PluginsGetInstalled(GetInstalledPluginsRequest) => "plugins.getInstalledPlugins" -> PluginsResponse;
    /// Search the plugin registry
    PluginsSearch(SearchPluginsRequest) => "plugins.search" -> PluginsResponse;
    PluginsGetDetails(GetPluginDetailsRequest) => "plugins.getPluginDetails" -> PluginResponse;
    PluginsInstall(InstallPluginRequest) => "plugins.installPlugin" -> EmptyResponse;
    PluginsUninstall(UninstallPluginRequest) => "plugins.uninstallPlugin" -> EmptyResponse;
    PluginsToggleActivated(TogglePluginIsActivatedRequest) => "plugins.togglePluginIsActivated" -> EmptyResponse;
    PluginsGetSettings(GetPluginSettingsRequest) => "plugins.settings.getSettings" -> PluginSettingsResponse;
    PluginsUpdateSettings(UpdatePluginSettingsRequest) => "plugins.settings.updateSettings" -> EmptyResponse;
}

impl RequestKind {
    /// Only the login request may be sent without a valid token.
    pub fn requires_token(&self) -> bool {
        *self != RequestKind::AccountLogin
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RequestKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RequestKind::from_type(s).ok_or_else(|| format!("unknown request type: {}", s))
    }
}

// =============================================================================
// Generic
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EmptyRequest {}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GetVersionRequest {}

// =============================================================================
// Account
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    /// Client descriptor shown in the active sessions list
    pub device: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LogoutRequest {}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GetSessionsRequest {}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LogoutSessionRequest {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LogoutOtherSessionsRequest {}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChangeUsernameRequest {
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CheckUsernameAvailableRequest {
    pub username: String,
}

// =============================================================================
// Rooms
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GetRoomsRequest {}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GetRoomRequest {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AddRoomRequest {
    pub room: Room,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EditRoomRequest {
    pub room: Room,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RemoveRoomRequest {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChangeRoomOrderRequest {
    pub ids: Vec<String>,
}

// =============================================================================
// Devices
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetDevicesRequest {
    pub room_id: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetDeviceInfoRequest {
    pub room_id: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddDeviceRequest {
    pub room_id: String,
    pub device: Device,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditDeviceRequest {
    pub room_id: String,
    pub device: Device,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDeviceRequest {
    pub room_id: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeDeviceOrderRequest {
    pub room_id: String,
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveDeviceRequest {
    pub room_id: String,
    pub id: String,
    pub new_room_id: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetDeviceTypesRequest {
    pub controller_type: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GetFavoriteDevicesRequest {}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleIsFavoriteRequest {
    pub room_id: String,
    pub id: String,
    pub is_favorite: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendActionRequest {
    pub room_id: String,
    pub device_id: String,
    pub interaction_id: String,
    /// Interaction-specific action record
    pub action: Value,
}

// =============================================================================
// Automation
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GetRoutinesRequest {}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AddRoutineRequest {
    pub routine: Routine,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EditRoutineRequest {
    pub id: String,
    pub routine: Routine,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeleteRoutineRequest {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChangeRoutineOrderRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TriggerRoutineRequest {
    pub id: String,
}

// =============================================================================
// Plugins
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GetInstalledPluginsRequest {}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchPluginsRequest {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GetPluginDetailsRequest {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InstallPluginRequest {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UninstallPluginRequest {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TogglePluginIsActivatedRequest {
    pub id: String,
    pub is_activated: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GetPluginSettingsRequest {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdatePluginSettingsRequest {
    pub id: String,
    pub values: BTreeMap<String, Value>,
}
