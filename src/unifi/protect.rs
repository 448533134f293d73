//! UniFi Protect client
//!
//! Protect splits its endpoints across two header conventions. Collection
//! listings under the integration API take `X-API-KEY` and answer bare JSON;
//! per-resource reads and every write take a bearer token, and writes under
//! the private API wrap their answer in `data`. Both families share one
//! backend and one key.

use std::sync::Arc;

use log::{debug, warn};
use reqwest::Method;
use serde_json::{Value, json};

use super::api::{ApiClient, Envelope, decode};
use super::models::{
    JsonObject, ProtectCamera, ProtectChime, ProtectDevice, ProtectEvent, ProtectLight, ProtectSensor,
    ProtectSystemInfo,
};
use super::transport::{AuthScheme, HttpBackend};
use crate::config::ClientConfig;
use crate::error::{GatewayError, Result};

const INTEGRATION: &str = "/proxy/protect/integration/v1";
const PRIVATE: &str = "/proxy/protect/api/v1";

/// Protect resource kinds addressable by id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectResource {
    Camera,
    Sensor,
    Light,
    Chime,
    Viewer,
    Liveview,
}

impl ProtectResource {
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Camera => "cameras",
            Self::Sensor => "sensors",
            Self::Light => "lights",
            Self::Chime => "chimes",
            Self::Viewer => "viewers",
            Self::Liveview => "liveviews",
        }
    }
}

#[derive(Clone)]
pub struct ProtectClient {
    listing: ApiClient,
    resource: ApiClient,
}

impl ProtectClient {
    pub fn new(config: &ClientConfig, backend: Arc<dyn HttpBackend>) -> Self {
        Self {
            listing: ApiClient::new(&config.base_url, &config.api_key, AuthScheme::ApiKeyHeader, backend.clone()),
            resource: ApiClient::new(&config.base_url, &config.api_key, AuthScheme::Bearer, backend),
        }
    }

    pub fn authenticate(&self) -> Result<()> {
        self.listing.authenticate()
    }

    pub async fn get_cameras(&self) -> Result<Vec<ProtectCamera>> {
        let cameras: Vec<ProtectCamera> = self.list("cameras").await?;
        debug!("Retrieved {} cameras", cameras.len());
        Ok(cameras)
    }

    pub async fn get_sensors(&self) -> Result<Vec<ProtectSensor>> {
        let sensors: Vec<ProtectSensor> = self.list("sensors").await?;
        debug!("Retrieved {} sensors", sensors.len());
        Ok(sensors)
    }

    pub async fn get_lights(&self) -> Result<Vec<ProtectLight>> {
        let lights: Vec<ProtectLight> = self.list("lights").await?;
        debug!("Retrieved {} lights", lights.len());
        Ok(lights)
    }

    pub async fn get_chimes(&self) -> Result<Vec<ProtectChime>> {
        let chimes: Vec<ProtectChime> = self.list("chimes").await?;
        debug!("Retrieved {} chimes", chimes.len());
        Ok(chimes)
    }

    pub async fn get_devices(&self) -> Result<Vec<ProtectDevice>> {
        let devices: Vec<ProtectDevice> = self.list("devices").await?;
        debug!("Retrieved {} devices", devices.len());
        Ok(devices)
    }

    pub async fn get_system_info(&self) -> Result<ProtectSystemInfo> {
        self.listing
            .get(&format!("{}/meta/info", INTEGRATION), Envelope::Bare)
            .await
    }

    /// Events page; a 404 means the controller predates the events API
    pub async fn get_events(&self, limit: i64, offset: i64) -> Result<Vec<ProtectEvent>> {
        let path = format!("{}/events?limit={}&offset={}", INTEGRATION, limit, offset);
        let response = self.listing.send_raw(Method::GET, &path, None).await?;

        if response.status == 404 {
            warn!("Events endpoint not available on this Protect version, returning no events");
            return Ok(Vec::new());
        }
        if !response.is_success() {
            return Err(GatewayError::RemoteRequest {
                status: response.status,
                body: response.body,
            });
        }

        let events: Vec<ProtectEvent> = decode(&response, Envelope::Bare)?;
        debug!("Retrieved {} events", events.len());
        Ok(events)
    }

    /// Single resource by id, as the vendor returns it
    pub async fn get_detailed(&self, kind: ProtectResource, id: &str) -> Result<JsonObject> {
        debug!("Fetching {} detail for {}", kind.collection(), id);
        self.resource
            .get(&format!("{}/{}/{}", INTEGRATION, kind.collection(), id), Envelope::Bare)
            .await
    }

    pub async fn get_nvr(&self) -> Result<Value> {
        self.resource
            .get(&format!("{}/nvrs", INTEGRATION), Envelope::Bare)
            .await
    }

    pub async fn get_viewers(&self) -> Result<Vec<JsonObject>> {
        self.resource
            .get(&format!("{}/viewers", INTEGRATION), Envelope::Bare)
            .await
    }

    pub async fn get_liveviews(&self) -> Result<Vec<JsonObject>> {
        self.resource
            .get(&format!("{}/liveviews", INTEGRATION), Envelope::Bare)
            .await
    }

    pub async fn patch(&self, kind: ProtectResource, id: &str, settings: JsonObject) -> Result<JsonObject> {
        debug!("Updating {} settings for {}", kind.collection(), id);
        self.resource
            .patch(
                &format!("{}/{}/{}", PRIVATE, kind.collection(), id),
                Value::Object(settings),
                Envelope::OptionalData,
            )
            .await
    }

    pub async fn create_liveview(&self, config: JsonObject) -> Result<JsonObject> {
        self.private_post("liveviews", Value::Object(config)).await
    }

    pub async fn start_ptz_patrol(&self, camera_id: &str, slot: u32) -> Result<JsonObject> {
        self.private_post(&format!("cameras/{}/ptz/patrol/start/{}", camera_id, slot), json!({}))
            .await
    }

    pub async fn stop_ptz_patrol(&self, camera_id: &str) -> Result<JsonObject> {
        self.private_post(&format!("cameras/{}/ptz/patrol/stop", camera_id), json!({}))
            .await
    }

    pub async fn goto_ptz_preset(&self, camera_id: &str, slot: u32) -> Result<JsonObject> {
        self.private_post(&format!("cameras/{}/ptz/goto/{}", camera_id, slot), json!({}))
            .await
    }

    pub async fn create_rtsps_stream(&self, camera_id: &str, config: JsonObject) -> Result<JsonObject> {
        self.private_post(&format!("cameras/{}/rtsps-stream", camera_id), Value::Object(config))
            .await
    }

    pub async fn create_talkback_session(&self, camera_id: &str, config: JsonObject) -> Result<JsonObject> {
        self.private_post(&format!("cameras/{}/talkback-session", camera_id), Value::Object(config))
            .await
    }

    pub async fn disable_mic_permanently(&self, camera_id: &str) -> Result<JsonObject> {
        self.private_post(&format!("cameras/{}/disable-mic-permanently", camera_id), json!({}))
            .await
    }

    pub async fn trigger_webhook_alarm(&self, webhook_id: &str, payload: JsonObject) -> Result<JsonObject> {
        self.private_post(&format!("alarm-manager/webhook/{}", webhook_id), Value::Object(payload))
            .await
    }

    async fn list<T: serde::de::DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>> {
        debug!("Fetching {} from Protect", collection);
        self.listing
            .get(&format!("{}/{}", INTEGRATION, collection), Envelope::Bare)
            .await
    }

    async fn private_post(&self, path: &str, body: Value) -> Result<JsonObject> {
        debug!("POST {}/{}", PRIVATE, path);
        self.resource
            .post(&format!("{}/{}", PRIVATE, path), body, Envelope::OptionalData)
            .await
    }
}
