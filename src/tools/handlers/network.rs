//! UniFi Network tool handlers

use std::sync::Arc;

use super::{call_remote, detail, listing, outcome, page};
use crate::tools::arguments::Arguments;
use crate::tools::context::ToolContext;
use crate::tools::result::ToolResult;
use crate::unifi::SiteCollection;

pub const DEFAULT_CLIENT_LIMIT: i64 = 50;

/// Result key, id parameter and human label for each editable collection
fn collection_meta(collection: SiteCollection) -> (&'static str, &'static str, &'static str) {
    match collection {
        SiteCollection::WifiNetwork => ("wifi_network", "network_id", "WiFi network"),
        SiteCollection::FirewallZone => ("firewall_zone", "zone_id", "firewall zone"),
        SiteCollection::AclRule => ("acl_rule", "rule_id", "ACL rule"),
        SiteCollection::HotspotVoucher => ("hotspot_voucher", "voucher_id", "hotspot voucher"),
        SiteCollection::TrafficRule => ("traffic_rule", "rule_id", "traffic rule"),
        SiteCollection::VpnTunnel => ("vpn_tunnel", "tunnel_id", "VPN tunnel"),
    }
}

pub fn id_param(collection: SiteCollection) -> &'static str {
    collection_meta(collection).1
}

// Controller-wide

pub async fn get_network_sites(ctx: Arc<ToolContext>, _args: Arguments) -> ToolResult {
    outcome(async move {
        let n = &ctx.network;
        let sites = call_remote(&ctx, n.authenticate(), "Failed to get sites", n.get_sites()).await?;
        listing("sites", sites)
    })
    .await
}

pub async fn get_network_info(ctx: Arc<ToolContext>, _args: Arguments) -> ToolResult {
    outcome(async move {
        let n = &ctx.network;
        let info = call_remote(&ctx, n.authenticate(), "Failed to get network info", n.get_info()).await?;
        Ok(info.into())
    })
    .await
}

pub async fn check_network_health(ctx: Arc<ToolContext>, _args: Arguments) -> ToolResult {
    outcome(async move {
        let n = &ctx.network;
        let health = call_remote(
            &ctx,
            n.authenticate(),
            "Failed to check network health",
            n.check_endpoint_health(),
        )
        .await?;
        Ok(health.into())
    })
    .await
}

pub async fn get_network_pending_devices(ctx: Arc<ToolContext>, _args: Arguments) -> ToolResult {
    outcome(async move {
        let n = &ctx.network;
        let devices = call_remote(&ctx, n.authenticate(), "Failed to get pending devices", n.get_pending_devices()).await?;
        listing("devices", devices)
    })
    .await
}

pub async fn get_network_dpi_categories(ctx: Arc<ToolContext>, _args: Arguments) -> ToolResult {
    outcome(async move {
        let n = &ctx.network;
        let categories = call_remote(&ctx, n.authenticate(), "Failed to get DPI categories", n.get_dpi_categories()).await?;
        listing("categories", categories)
    })
    .await
}

pub async fn get_network_dpi_applications(ctx: Arc<ToolContext>, _args: Arguments) -> ToolResult {
    outcome(async move {
        let n = &ctx.network;
        let applications = call_remote(
            &ctx,
            n.authenticate(),
            "Failed to get DPI applications",
            n.get_dpi_applications(),
        )
        .await?;
        listing("applications", applications)
    })
    .await
}

// Site-scoped reads

pub async fn get_network_devices(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    outcome(async move {
        let site_id = args.required_str("site_id")?;
        let n = &ctx.network;
        let devices = call_remote(&ctx, n.authenticate(), "Failed to get devices", n.get_devices(site_id)).await?;
        listing("devices", devices)
    })
    .await
}

pub async fn get_network_device_detailed(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    outcome(async move {
        let site_id = args.required_str("site_id")?;
        let device_id = args.required_str("device_id")?;
        let n = &ctx.network;
        let device = call_remote(
            &ctx,
            n.authenticate(),
            "Failed to get device details",
            n.get_device_detailed(site_id, device_id),
        )
        .await?;
        detail("device", device, &[("site_id", site_id), ("device_id", device_id)])
    })
    .await
}

pub async fn get_network_clients(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    outcome(async move {
        let site_id = args.required_str("site_id")?;
        let limit = args.optional_i64("limit", DEFAULT_CLIENT_LIMIT)?;
        let offset = args.optional_i64("offset", 0)?;
        let n = &ctx.network;
        let clients = call_remote(
            &ctx,
            n.authenticate(),
            "Failed to get clients",
            n.get_clients(site_id, limit, offset),
        )
        .await?;
        page("clients", clients, limit, offset)
    })
    .await
}

pub async fn get_network_client_detailed(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    outcome(async move {
        let site_id = args.required_str("site_id")?;
        let client_mac = args.required_str("client_mac")?;
        let n = &ctx.network;
        let client = call_remote(
            &ctx,
            n.authenticate(),
            "Failed to get client details",
            n.get_client_detailed(site_id, client_mac),
        )
        .await?;
        detail("client", client, &[("site_id", site_id), ("client_mac", client_mac)])
    })
    .await
}

pub async fn get_network_health(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    outcome(async move {
        let site_id = args.required_str("site_id")?;
        let n = &ctx.network;
        let health = call_remote(&ctx, n.authenticate(), "Failed to get network health", n.get_site_health(site_id)).await?;
        Ok(health.into())
    })
    .await
}

pub async fn get_network_wifi_networks(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    outcome(async move {
        let site_id = args.required_str("site_id")?;
        let n = &ctx.network;
        let networks = call_remote(
            &ctx,
            n.authenticate(),
            "Failed to get WiFi networks",
            n.get_wifi_networks(site_id),
        )
        .await?;
        listing("wifi_networks", networks)
    })
    .await
}

pub async fn get_network_wifi_broadcasts(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    outcome(async move {
        let site_id = args.required_str("site_id")?;
        let n = &ctx.network;
        let broadcasts = call_remote(
            &ctx,
            n.authenticate(),
            "Failed to get WiFi broadcasts",
            n.get_wifi_broadcasts(site_id),
        )
        .await?;
        listing("broadcasts", broadcasts)
    })
    .await
}

pub async fn get_network_firewall_zones(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    outcome(async move {
        let site_id = args.required_str("site_id")?;
        let n = &ctx.network;
        let zones = call_remote(
            &ctx,
            n.authenticate(),
            "Failed to get firewall zones",
            n.get_firewall_zones(site_id),
        )
        .await?;
        listing("zones", zones)
    })
    .await
}

pub async fn get_network_acl_rules(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    outcome(async move {
        let site_id = args.required_str("site_id")?;
        let n = &ctx.network;
        let rules = call_remote(&ctx, n.authenticate(), "Failed to get ACL rules", n.get_acl_rules(site_id)).await?;
        listing("rules", rules)
    })
    .await
}

pub async fn get_network_hotspot_vouchers(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    outcome(async move {
        let site_id = args.required_str("site_id")?;
        let n = &ctx.network;
        let vouchers = call_remote(
            &ctx,
            n.authenticate(),
            "Failed to get hotspot vouchers",
            n.get_hotspot_vouchers(site_id),
        )
        .await?;
        listing("vouchers", vouchers)
    })
    .await
}

pub async fn get_network_vpn_servers(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    outcome(async move {
        let site_id = args.required_str("site_id")?;
        let n = &ctx.network;
        let servers = call_remote(&ctx, n.authenticate(), "Failed to get VPN servers", n.get_vpn_servers(site_id)).await?;
        listing("servers", servers)
    })
    .await
}

/// `rest/<name>` listing under `key`
async fn rest_listing(
    ctx: Arc<ToolContext>,
    args: Arguments,
    rest_name: &'static str,
    key: &'static str,
    failure: &'static str,
) -> ToolResult {
    outcome(async move {
        let site_id = args.required_str("site_id")?;
        let n = &ctx.network;
        let items = call_remote(&ctx, n.authenticate(), failure, n.get_rest_list(site_id, rest_name)).await?;
        listing(key, items)
    })
    .await
}

pub async fn get_network_traffic_rules(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    rest_listing(ctx, args, "trafficrule", "rules", "Failed to get traffic rules").await
}

pub async fn get_network_vpn_tunnels(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    rest_listing(ctx, args, "vpnserverconfig", "tunnels", "Failed to get VPN tunnels").await
}

pub async fn get_network_device_tags(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    rest_listing(ctx, args, "tag", "tags", "Failed to get device tags").await
}

pub async fn get_network_wan_config(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    rest_listing(ctx, args, "wanconf", "wan_configs", "Failed to get WAN configuration").await
}

pub async fn get_network_radius_profiles(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    rest_listing(ctx, args, "radiusprofile", "profiles", "Failed to get RADIUS profiles").await
}

// Editable collections

async fn get_item(ctx: Arc<ToolContext>, args: Arguments, collection: SiteCollection) -> ToolResult {
    let (key, param, label) = collection_meta(collection);
    outcome(async move {
        let site_id = args.required_str("site_id")?;
        let id = args.required_str(param)?;
        let n = &ctx.network;
        let failure = format!("Failed to get {} details", label);
        let item = call_remote(&ctx, n.authenticate(), &failure, n.get_item(site_id, collection, id)).await?;
        detail(key, item, &[("site_id", site_id), (param, id)])
    })
    .await
}

async fn patch_item(ctx: Arc<ToolContext>, args: Arguments, collection: SiteCollection) -> ToolResult {
    let (_, param, label) = collection_meta(collection);
    outcome(async move {
        let site_id = args.required_str("site_id")?;
        let id = args.required_str(param)?;
        let settings = args.non_empty_object("settings")?;
        let n = &ctx.network;
        let failure = format!("Failed to update {}", label);
        let updated = call_remote(
            &ctx,
            n.authenticate(),
            &failure,
            n.patch_item(site_id, collection, id, settings),
        )
        .await?;
        Ok(updated.into())
    })
    .await
}

async fn create_item(ctx: Arc<ToolContext>, args: Arguments, collection: SiteCollection) -> ToolResult {
    let (_, _, label) = collection_meta(collection);
    outcome(async move {
        let site_id = args.required_str("site_id")?;
        let config = args.required_object("config")?;
        let n = &ctx.network;
        let failure = format!("Failed to create {}", label);
        let created = call_remote(&ctx, n.authenticate(), &failure, n.create_item(site_id, collection, config)).await?;
        Ok(created.into())
    })
    .await
}

pub async fn get_network_wifi_network_detailed(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    get_item(ctx, args, SiteCollection::WifiNetwork).await
}

pub async fn patch_network_wifi_network(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    patch_item(ctx, args, SiteCollection::WifiNetwork).await
}

pub async fn create_network_wifi_network(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    create_item(ctx, args, SiteCollection::WifiNetwork).await
}

pub async fn get_network_firewall_zone_detailed(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    get_item(ctx, args, SiteCollection::FirewallZone).await
}

pub async fn patch_network_firewall_zone(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    patch_item(ctx, args, SiteCollection::FirewallZone).await
}

pub async fn create_network_firewall_zone(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    create_item(ctx, args, SiteCollection::FirewallZone).await
}

pub async fn get_network_acl_rule_detailed(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    get_item(ctx, args, SiteCollection::AclRule).await
}

pub async fn patch_network_acl_rule(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    patch_item(ctx, args, SiteCollection::AclRule).await
}

pub async fn create_network_acl_rule(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    create_item(ctx, args, SiteCollection::AclRule).await
}

pub async fn get_network_hotspot_voucher_detailed(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    get_item(ctx, args, SiteCollection::HotspotVoucher).await
}

pub async fn patch_network_hotspot_voucher(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    patch_item(ctx, args, SiteCollection::HotspotVoucher).await
}

pub async fn create_network_hotspot_voucher(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    create_item(ctx, args, SiteCollection::HotspotVoucher).await
}

pub async fn get_network_traffic_rule_detailed(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    get_item(ctx, args, SiteCollection::TrafficRule).await
}

pub async fn patch_network_traffic_rule(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    patch_item(ctx, args, SiteCollection::TrafficRule).await
}

pub async fn create_network_traffic_rule(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    create_item(ctx, args, SiteCollection::TrafficRule).await
}

pub async fn create_network_vpn_tunnel(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    create_item(ctx, args, SiteCollection::VpnTunnel).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::unifi::MockBackend;
    use reqwest::Method;
    use serde_json::{Value, json};
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    fn context(mock: &Arc<MockBackend>) -> Arc<ToolContext> {
        let config = ClientConfig {
            base_url: "https://gw".to_string(),
            api_key: "key".to_string(),
            skip_tls_verify: false,
            timeout: Duration::from_secs(30),
        };
        Arc::new(ToolContext::new(&config, mock.clone(), CancellationToken::new()))
    }

    fn args(value: Value) -> Arguments {
        Arguments::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_site_scoped_tools_require_site_id() {
        let mock = Arc::new(MockBackend::new());
        let ctx = context(&mock);

        let result = get_network_devices(ctx.clone(), Arguments::default()).await;
        assert_eq!(result, ToolResult::error("Missing required parameter: site_id"));

        let result = get_network_device_tags(ctx, Arguments::default()).await;
        assert_eq!(result, ToolResult::error("Missing required parameter: site_id"));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_device_detailed_shape_and_miss() {
        let mock = Arc::new(MockBackend::new());
        mock.respond(
            Method::GET,
            "/proxy/network/api/s/default/stat/device",
            200,
            json!({"data": [{"_id": "d1", "name": "gw"}]}),
        );
        let ctx = context(&mock);

        let found = get_network_device_detailed(ctx.clone(), args(json!({"site_id": "default", "device_id": "d1"}))).await;
        let payload = found.payload().unwrap();
        assert_eq!(payload["device"]["name"], "gw");
        assert_eq!(payload["site_id"], "default");
        assert_eq!(payload["device_id"], "d1");

        let missing = get_network_device_detailed(ctx, args(json!({"site_id": "default", "device_id": "zz"}))).await;
        assert_eq!(
            missing,
            ToolResult::error_with_cause("Failed to get device details", "device not found: zz")
        );
    }

    #[tokio::test]
    async fn test_clients_echo_pagination() {
        let mock = Arc::new(MockBackend::new());
        mock.respond(
            Method::GET,
            "/proxy/network/api/s/default/stat/sta?limit=50&offset=0",
            200,
            json!({"data": [{"mac": "aa"}, {"mac": "bb"}]}),
        );

        let result = get_network_clients(context(&mock), args(json!({"site_id": "default"}))).await;
        let payload = result.payload().unwrap();
        assert_eq!(payload["count"], 2);
        assert_eq!(payload["limit"], 50);
        assert_eq!(payload["offset"], 0);
    }

    #[tokio::test]
    async fn test_wifi_network_detail_uses_network_id() {
        let mock = Arc::new(MockBackend::new());
        mock.respond(
            Method::GET,
            "/proxy/network/api/s/default/rest/networkconf/n1",
            200,
            json!({"data": {"_id": "n1", "name": "Home"}}),
        );

        let result = get_network_wifi_network_detailed(
            context(&mock),
            args(json!({"site_id": "default", "network_id": "n1"})),
        )
        .await;
        assert_eq!(
            result.payload().unwrap(),
            &json!({"wifi_network": {"_id": "n1", "name": "Home"}, "site_id": "default", "network_id": "n1"})
        );
    }

    #[tokio::test]
    async fn test_patch_firewall_zone_requires_settings() {
        let mock = Arc::new(MockBackend::new());
        let result = patch_network_firewall_zone(
            context(&mock),
            args(json!({"site_id": "default", "zone_id": "z1"})),
        )
        .await;
        assert_eq!(result, ToolResult::error("Missing required parameter: settings"));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_create_failure_message() {
        let mock = Arc::new(MockBackend::new());
        mock.respond_text(
            Method::POST,
            "/proxy/network/api/s/default/rest/hotspotop",
            400,
            "bad voucher",
        );

        let result = create_network_hotspot_voucher(
            context(&mock),
            args(json!({"site_id": "default", "config": {"quota": 1}})),
        )
        .await;
        assert_eq!(
            result,
            ToolResult::error_with_cause("Failed to create hotspot voucher", "request failed with status 400: bad voucher")
        );
    }

    #[tokio::test]
    async fn test_rest_listing_key() {
        let mock = Arc::new(MockBackend::new());
        mock.respond(
            Method::GET,
            "/proxy/network/api/s/default/rest/radiusprofile",
            200,
            json!({"data": [{"name": "Default"}]}),
        );

        let result = get_network_radius_profiles(context(&mock), args(json!({"site_id": "default"}))).await;
        assert_eq!(result.payload().unwrap()["profiles"][0]["name"], "Default");
        assert_eq!(result.payload().unwrap()["count"], 1);
    }
}
