//! Success payloads, one type per response shape.
//!
//! Several request kinds share a shape (most mutations answer with
//! [`EmptyResponse`]). The kind-to-shape mapping lives in the request catalog;
//! [`crate::registry::response_for`] exposes it at runtime.

use crate::domain::{
    DeviceInfo, DeviceType, Device, FavoriteDevice, PluginInfo, Room, Routine, SessionInfo,
    SettingsField,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// `{}`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EmptyResponse {}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VersionResponse {
    pub version: String,
}

/// Issued by login and username change.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionsResponse {
    pub sessions: Vec<SessionInfo>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UsernameAvailableResponse {
    pub available: bool,
}

// =============================================================================
// Rooms & Devices
// =============================================================================

/// Rooms keyed by id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoomsResponse {
    pub rooms: BTreeMap<String, Room>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoomResponse {
    pub room: Room,
}

/// Devices of one room, keyed by id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DevicesResponse {
    pub devices: BTreeMap<String, Device>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeviceInfoResponse {
    pub info: DeviceInfo,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeviceTypesResponse {
    pub types: Vec<DeviceType>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FavoriteDevicesResponse {
    pub devices: Vec<FavoriteDevice>,
}

// =============================================================================
// Automation
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoutinesResponse {
    /// Routines keyed by id
    pub routines: BTreeMap<String, Routine>,
    /// Display order of routine ids
    pub order: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoutineIdResponse {
    pub id: String,
}

// =============================================================================
// Plugins
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PluginsResponse {
    pub plugins: Vec<PluginInfo>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PluginResponse {
    pub plugin: PluginInfo,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PluginSettingsResponse {
    pub fields: Vec<SettingsField>,
    pub values: BTreeMap<String, Value>,
}
