//! Domain records shared by requests and responses.
//!
//! These mirror what the hub stores: rooms hold devices, routines automate
//! them, plugins provide the device types. Field names are camelCase on the
//! wire.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Rooms & Devices
// ============================================================================

/// A room as stored by the hub.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub name: String,
    pub icon: String,
    /// Room controller type id (`"plugin:controllerName"`)
    pub controller_type: String,
    /// Controller-specific settings
    pub controller_config: Map<String, Value>,
}

/// A device inside a room.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: String,
    pub name: String,
    pub icon: String,
    /// Device type id (`"plugin:typeName"`)
    #[serde(rename = "type")]
    pub device_type: String,
    pub config: Map<String, Value>,
}

/// One line of the device info sheet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeviceInfoField {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub fields: Vec<DeviceInfoField>,
}

/// A device type offered by an installed plugin.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceType {
    pub id: String,
    pub name: String,
    /// Room controller types this device type works with (`"*"` for all)
    pub for_room_controller: String,
    pub settings: Vec<SettingsField>,
}

/// Reference to a device marked as favorite.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteDevice {
    pub room_id: String,
    pub device_id: String,
    pub name: String,
    pub icon: String,
}

// ============================================================================
// Account
// ============================================================================

/// An active login session, as listed by `account.getSessions`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub id: String,
    /// Device descriptor given at login
    pub device: String,
    /// Milliseconds since the unix epoch
    pub login_time: i64,
    pub is_current: bool,
}

// ============================================================================
// Automation
// ============================================================================

/// An automation routine. Triggers and actions are plugin-defined records.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    pub name: String,
    pub icon: String,
    pub enabled: bool,
    pub triggers: Vec<Value>,
    pub actions: Vec<Value>,
}

// ============================================================================
// Plugins
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginInfo {
    pub id: String,
    pub name: String,
    pub version: String,
    pub author: String,
    pub description: String,
    pub is_installed: bool,
    pub is_activated: bool,
    pub is_compatible: bool,
}

/// A settings form field, used by plugin settings and device types.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SettingsField {
    pub id: String,
    pub label: String,
    /// Field widget type (`"text"`, `"number"`, `"select"`, ...)
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub required: bool,
}
