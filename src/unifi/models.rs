//! Vendor record shapes
//!
//! Each struct mirrors the JSON the controller returns. Every field defaults
//! when absent; nothing beyond decodability is checked locally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Untyped JSON object, used where the vendor shape is open-ended
pub type JsonObject = serde_json::Map<String, Value>;

// Protect

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProtectDevice {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub model: String,
    pub firmware_version: String,
    pub status: String,
    pub mac: String,
    pub ip: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProtectCamera {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub model: String,
    pub firmware_version: String,
    pub status: String,
    pub mac: String,
    pub ip: String,
    pub recording: bool,
    pub motion: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_motion: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProtectSensor {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub model: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_event: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_event_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProtectLight {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub model: String,
    pub status: String,
    pub on: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProtectChime {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub model: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtectEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub camera: String,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<JsonObject>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProtectSystemInfo {
    pub application_version: String,
    pub version: String,
    pub unique_id: String,
    pub system_type: String,
}

// Network

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkDevice {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub model: String,
    pub mac: String,
    pub ip: String,
    pub connected: bool,
    pub last_seen: i64,
    pub uptime: i64,
    #[serde(rename = "signal", skip_serializing_if = "Option::is_none")]
    pub signal_strength: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkSite {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub external_id: String,
    pub desc: String,
    pub role: String,
    pub status: String,
    pub num_sta: i64,
    pub rx_packets: i64,
    pub tx_packets: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkWifiNetwork {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub ssid: String,
    pub security: String,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<i64>,
    pub band: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkVpnServer {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub desc: String,
}
