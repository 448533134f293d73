//! UniFi Network client
//!
//! Every Network endpoint takes `X-API-KEY`. The legacy controller API
//! (`/api/s/<site>/...`) and the integration API both wrap payloads in
//! `data`; only `integration/v1/info` answers bare.

use std::sync::Arc;

use log::{debug, warn};
use reqwest::Method;
use serde_json::{Value, json};

use super::api::{ApiClient, Envelope};
use super::models::{JsonObject, NetworkDevice, NetworkSite, NetworkVpnServer, NetworkWifiNetwork};
use super::transport::{AuthScheme, HttpBackend};
use crate::config::ClientConfig;
use crate::error::{GatewayError, Result};

const PREFIX: &str = "/proxy/network";

/// Site-scoped `rest/<collection>` resources that support detail, patch and create
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteCollection {
    WifiNetwork,
    FirewallZone,
    AclRule,
    HotspotVoucher,
    TrafficRule,
    VpnTunnel,
}

impl SiteCollection {
    pub fn rest_name(&self) -> &'static str {
        match self {
            Self::WifiNetwork => "networkconf",
            Self::FirewallZone => "firewallzone",
            Self::AclRule => "rule",
            Self::HotspotVoucher => "hotspotop",
            Self::TrafficRule => "trafficrule",
            Self::VpnTunnel => "vpnserverconfig",
        }
    }
}

#[derive(Clone)]
pub struct NetworkClient {
    api: ApiClient,
}

impl NetworkClient {
    pub fn new(config: &ClientConfig, backend: Arc<dyn HttpBackend>) -> Self {
        Self {
            api: ApiClient::new(&config.base_url, &config.api_key, AuthScheme::ApiKeyHeader, backend),
        }
    }

    pub fn authenticate(&self) -> Result<()> {
        self.api.authenticate()
    }

    pub async fn get_sites(&self) -> Result<Vec<NetworkSite>> {
        let sites: Vec<NetworkSite> = self.data("/api/self/sites").await?;
        debug!("Retrieved {} sites", sites.len());
        Ok(sites)
    }

    pub async fn get_devices(&self, site_id: &str) -> Result<Vec<NetworkDevice>> {
        let devices: Vec<NetworkDevice> = self.data(&format!("/api/s/{}/stat/device", site_id)).await?;
        debug!("Retrieved {} devices for site {}", devices.len(), site_id);
        Ok(devices)
    }

    /// The controller has no per-device endpoint; select from the site listing
    pub async fn get_device_detailed(&self, site_id: &str, device_id: &str) -> Result<NetworkDevice> {
        self.get_devices(site_id)
            .await?
            .into_iter()
            .find(|d| d.id == device_id)
            .ok_or_else(|| GatewayError::ResourceNotFound(format!("device not found: {}", device_id)))
    }

    pub async fn get_wifi_networks(&self, site_id: &str) -> Result<Vec<NetworkWifiNetwork>> {
        let networks: Vec<NetworkWifiNetwork> = self.data(&format!("/api/s/{}/rest/networkconf", site_id)).await?;
        debug!("Retrieved {} WiFi networks", networks.len());
        Ok(networks)
    }

    pub async fn get_clients(&self, site_id: &str, limit: i64, offset: i64) -> Result<Vec<JsonObject>> {
        debug!("Fetching clients for site {} (limit {}, offset {})", site_id, limit, offset);
        let clients: Vec<JsonObject> = self
            .data(&format!("/api/s/{}/stat/sta?limit={}&offset={}", site_id, limit, offset))
            .await?;
        debug!("Retrieved {} clients", clients.len());
        Ok(clients)
    }

    pub async fn get_client_detailed(&self, site_id: &str, client_mac: &str) -> Result<JsonObject> {
        self.data(&format!("/integration/v1/sites/{}/clients/{}", site_id, client_mac))
            .await
    }

    /// First health record of the site, or an empty object
    pub async fn get_site_health(&self, site_id: &str) -> Result<JsonObject> {
        let records: Vec<JsonObject> = self
            .data(&format!("/integration/v1/sites/{}/health", site_id))
            .await?;
        Ok(records.into_iter().next().unwrap_or_default())
    }

    pub async fn get_info(&self) -> Result<JsonObject> {
        self.api
            .get(&format!("{}/integration/v1/info", PREFIX), Envelope::Bare)
            .await
    }

    /// Reachability probe; only transport failures are errors
    pub async fn check_endpoint_health(&self) -> Result<JsonObject> {
        let response = self
            .api
            .send_raw(Method::GET, &format!("{}/integration/v1/info", PREFIX), None)
            .await?;

        let mut health = JsonObject::new();
        health.insert("status".to_string(), json!("healthy"));
        health.insert("code".to_string(), json!(response.status));

        if response.status != 200 {
            warn!("Network endpoint health check failed with status {}", response.status);
            health.insert("status".to_string(), json!("unhealthy"));
            health.insert("error".to_string(), json!(response.body));
            return Ok(health);
        }

        #[derive(serde::Deserialize)]
        struct InfoEnvelope {
            #[serde(default)]
            data: JsonObject,
        }

        match serde_json::from_str::<InfoEnvelope>(&response.body) {
            Ok(info) => {
                if let Some(version) = info.data.get("version") {
                    health.insert("version".to_string(), version.clone());
                }
            }
            Err(_) => {
                health.insert("status".to_string(), json!("unhealthy"));
                health.insert("error".to_string(), json!("Failed to decode response"));
            }
        }
        Ok(health)
    }

    pub async fn get_wifi_broadcasts(&self, site_id: &str) -> Result<Vec<JsonObject>> {
        self.data(&format!("/integration/v1/sites/{}/wifi/broadcasts", site_id)).await
    }

    pub async fn get_firewall_zones(&self, site_id: &str) -> Result<Vec<JsonObject>> {
        self.data(&format!("/integration/v1/sites/{}/firewall/zones", site_id)).await
    }

    pub async fn get_acl_rules(&self, site_id: &str) -> Result<Vec<JsonObject>> {
        self.data(&format!("/integration/v1/sites/{}/acl-rules", site_id)).await
    }

    pub async fn get_hotspot_vouchers(&self, site_id: &str) -> Result<Vec<JsonObject>> {
        self.data(&format!("/integration/v1/sites/{}/hotspot/vouchers", site_id)).await
    }

    pub async fn get_vpn_servers(&self, site_id: &str) -> Result<Vec<NetworkVpnServer>> {
        let servers: Vec<NetworkVpnServer> = self
            .data(&format!("/integration/v1/sites/{}/vpn/servers", site_id))
            .await?;
        debug!("Retrieved {} VPN servers", servers.len());
        Ok(servers)
    }

    pub async fn get_pending_devices(&self) -> Result<Vec<JsonObject>> {
        self.data("/integration/v1/pending-devices").await
    }

    pub async fn get_dpi_categories(&self) -> Result<Vec<JsonObject>> {
        self.data("/integration/v1/dpi/categories").await
    }

    pub async fn get_dpi_applications(&self) -> Result<Vec<JsonObject>> {
        self.data("/api/v1/dpi/applications").await
    }

    /// `rest/<name>` listing for collections without a typed record
    pub async fn get_rest_list(&self, site_id: &str, rest_name: &str) -> Result<Vec<JsonObject>> {
        debug!("Fetching {} for site {}", rest_name, site_id);
        self.data(&format!("/api/s/{}/rest/{}", site_id, rest_name)).await
    }

    pub async fn get_item(&self, site_id: &str, collection: SiteCollection, id: &str) -> Result<JsonObject> {
        debug!("Fetching {} {}", collection.rest_name(), id);
        self.data(&format!("/api/s/{}/rest/{}/{}", site_id, collection.rest_name(), id))
            .await
    }

    pub async fn patch_item(
        &self,
        site_id: &str,
        collection: SiteCollection,
        id: &str,
        settings: JsonObject,
    ) -> Result<JsonObject> {
        debug!("Updating {} {}", collection.rest_name(), id);
        self.api
            .patch(
                &format!("{}/api/s/{}/rest/{}/{}", PREFIX, site_id, collection.rest_name(), id),
                Value::Object(settings),
                Envelope::Data,
            )
            .await
    }

    pub async fn create_item(&self, site_id: &str, collection: SiteCollection, config: JsonObject) -> Result<JsonObject> {
        debug!("Creating {}", collection.rest_name());
        self.api
            .post(
                &format!("{}/api/s/{}/rest/{}", PREFIX, site_id, collection.rest_name()),
                Value::Object(config),
                Envelope::Data,
            )
            .await
    }

    async fn data<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.api.get(&format!("{}{}", PREFIX, path), Envelope::Data).await
    }
}
