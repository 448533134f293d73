//! The fixed tool catalog
//!
//! Registration order here is the order `tools/list` reports.

use crate::error::Result;
use crate::unifi::SiteCollection;

use super::definition::{ParamType, ToolDescriptor};
use super::handlers::{network, protect};
use super::registry::{RegistryBuilder, ToolHandler, ToolRegistry};

/// Protect tools, plus Network tools when enabled
pub fn standard_registry(network_tools: bool) -> Result<ToolRegistry> {
    let mut builder = RegistryBuilder::new();
    register_protect_tools(&mut builder)?;
    if network_tools {
        register_network_tools(&mut builder)?;
    }
    Ok(builder.build())
}

fn camera_id(tool: ToolDescriptor) -> ToolDescriptor {
    tool.with_required("camera_id", ParamType::String, "Camera ID")
}

fn site_id(tool: ToolDescriptor) -> ToolDescriptor {
    tool.with_required("site_id", ParamType::String, "Site ID (e.g. \"default\")")
}

pub fn register_protect_tools(b: &mut RegistryBuilder) -> Result<()> {
    // Device listings
    b.register(
        ToolDescriptor::new("get_protect_cameras", "Get all cameras from Unifi Protect"),
        protect::get_protect_cameras,
    )?;
    b.register(
        ToolDescriptor::new("get_protect_sensors", "Get all sensors from Unifi Protect"),
        protect::get_protect_sensors,
    )?;
    b.register(
        ToolDescriptor::new("get_protect_lights", "Get all lights from Unifi Protect"),
        protect::get_protect_lights,
    )?;
    b.register(
        ToolDescriptor::new("get_protect_chimes", "Get all chimes from Unifi Protect"),
        protect::get_protect_chimes,
    )?;
    b.register(
        ToolDescriptor::new("get_protect_liveviews", "Get all live views from Unifi Protect"),
        protect::get_protect_liveviews,
    )?;
    b.register(
        ToolDescriptor::new("get_protect_devices", "Get all adopted devices from Unifi Protect"),
        protect::get_protect_devices,
    )?;

    // Detail lookups
    b.register(
        ToolDescriptor::new("get_camera_detailed", "Get detailed information about a specific camera")
            .with_required("camera_id", ParamType::String, "Camera ID (required)"),
        protect::get_camera_detailed,
    )?;
    b.register(
        ToolDescriptor::new("get_sensor_detailed", "Get detailed information about a specific sensor")
            .with_required("sensor_id", ParamType::String, "Sensor ID (required)"),
        protect::get_sensor_detailed,
    )?;
    b.register(
        ToolDescriptor::new("get_light_detailed", "Get detailed information about a specific light")
            .with_required("light_id", ParamType::String, "Light ID (required)"),
        protect::get_light_detailed,
    )?;
    b.register(
        ToolDescriptor::new("get_chime_detailed", "Get detailed information about a specific chime")
            .with_required("chime_id", ParamType::String, "Chime ID (required)"),
        protect::get_chime_detailed,
    )?;
    b.register(
        ToolDescriptor::new("get_liveview_detailed", "Get detailed information about a specific live view")
            .with_required("liveview_id", ParamType::String, "Live view ID (required)"),
        protect::get_liveview_detailed,
    )?;

    // System
    b.register(
        ToolDescriptor::new("get_protect_info", "Get system information from Unifi Protect"),
        protect::get_protect_info,
    )?;
    b.register(
        ToolDescriptor::new("get_protect_nvr", "Get NVR information from Unifi Protect"),
        protect::get_protect_nvr,
    )?;
    b.register(
        ToolDescriptor::new("get_protect_viewers", "Get all viewers from Unifi Protect"),
        protect::get_protect_viewers,
    )?;
    b.register(
        ToolDescriptor::new("get_protect_viewer_detailed", "Get detailed information about a specific viewer")
            .with_required("id", ParamType::String, "Viewer ID"),
        protect::get_protect_viewer_detailed,
    )?;

    // Updates
    register_patch(b, "patch_protect_viewer", "viewer", protect::patch_protect_viewer)?;
    register_patch(b, "patch_protect_camera", "camera", protect::patch_protect_camera)?;
    register_patch(b, "patch_protect_sensor", "sensor", protect::patch_protect_sensor)?;
    register_patch(b, "patch_protect_light", "light", protect::patch_protect_light)?;
    register_patch(b, "patch_protect_chime", "chime", protect::patch_protect_chime)?;
    register_patch(b, "patch_protect_liveview", "live view", protect::patch_protect_liveview)?;
    b.register(
        ToolDescriptor::new("create_protect_liveview", "Create a new live view")
            .with_required("config", ParamType::Object, "Live view configuration"),
        protect::create_protect_liveview,
    )?;

    // Camera controls
    b.register(
        camera_id(ToolDescriptor::new("camera_start_ptz_patrol", "Start a PTZ patrol on a camera"))
            .with_param("slot", ParamType::Integer, "Patrol slot number (default 0)"),
        protect::camera_start_ptz_patrol,
    )?;
    b.register(
        camera_id(ToolDescriptor::new("camera_stop_ptz_patrol", "Stop a PTZ patrol on a camera")),
        protect::camera_stop_ptz_patrol,
    )?;
    b.register(
        camera_id(ToolDescriptor::new("camera_goto_ptz_preset", "Move camera to a PTZ preset position"))
            .with_param("slot", ParamType::Integer, "Preset slot number (default 0)"),
        protect::camera_goto_ptz_preset,
    )?;
    b.register(
        camera_id(ToolDescriptor::new("camera_create_rtsps_stream", "Create an RTSPS stream for a camera"))
            .with_param("config", ParamType::Object, "RTSPS stream configuration"),
        protect::camera_create_rtsps_stream,
    )?;
    b.register(
        camera_id(ToolDescriptor::new(
            "camera_create_talkback_session",
            "Create a talkback session with a camera",
        ))
        .with_param("config", ParamType::Object, "Talkback session configuration"),
        protect::camera_create_talkback_session,
    )?;
    b.register(
        camera_id(ToolDescriptor::new(
            "camera_disable_mic_permanently",
            "Disable microphone permanently on a camera",
        )),
        protect::camera_disable_mic_permanently,
    )?;
    b.register(
        ToolDescriptor::new("trigger_webhook_alarm", "Trigger a configured alarm webhook")
            .with_required("webhook_id", ParamType::String, "Webhook ID")
            .with_param("payload", ParamType::Object, "Alarm trigger payload (optional)"),
        protect::trigger_webhook_alarm,
    )?;

    // Events
    b.register(
        ToolDescriptor::new("get_protect_events", "Get events from Unifi Protect")
            .with_param("limit", ParamType::Integer, "Number of events to retrieve (optional, default 50)")
            .with_param("offset", ParamType::Integer, "Offset for pagination (optional, default 0)"),
        protect::get_protect_events,
    )?;

    Ok(())
}

fn register_patch<H>(b: &mut RegistryBuilder, name: &str, noun: &str, handler: H) -> Result<()>
where
    H: ToolHandler + 'static,
{
    b.register(
        ToolDescriptor::new(name, format!("Update {} settings", noun))
            .with_required("id", ParamType::String, &format!("{} ID", capitalize(noun)))
            .with_required("settings", ParamType::Object, &format!("{} settings to update", capitalize(noun))),
        handler,
    )
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Detail, patch and create tools for one editable site collection
fn register_collection<G, P, C>(
    b: &mut RegistryBuilder,
    collection: SiteCollection,
    (stem, noun): (&str, &str),
    (get, patch, create): (G, P, C),
) -> Result<()>
where
    G: ToolHandler + 'static,
    P: ToolHandler + 'static,
    C: ToolHandler + 'static,
{
    let id = network::id_param(collection);
    let id_desc = format!("{} ID", capitalize(noun));

    b.register(
        site_id(ToolDescriptor::new(
            format!("get_network_{}_detailed", stem),
            format!("Get detailed information about a specific {}", noun),
        ))
        .with_required(id, ParamType::String, &id_desc),
        get,
    )?;
    b.register(
        site_id(ToolDescriptor::new(
            format!("patch_network_{}", stem),
            format!("Update {} settings", noun),
        ))
        .with_required(id, ParamType::String, &id_desc)
        .with_required("settings", ParamType::Object, "Settings to update"),
        patch,
    )?;
    b.register(
        site_id(ToolDescriptor::new(
            format!("create_network_{}", stem),
            format!("Create a new {}", noun),
        ))
        .with_required("config", ParamType::Object, &format!("{} configuration", capitalize(noun))),
        create,
    )
}

pub fn register_network_tools(b: &mut RegistryBuilder) -> Result<()> {
    // Controller
    b.register(
        ToolDescriptor::new("get_network_sites", "Get all sites from Unifi Network"),
        network::get_network_sites,
    )?;
    b.register(
        ToolDescriptor::new("get_network_info", "Get application information from Unifi Network"),
        network::get_network_info,
    )?;
    b.register(
        ToolDescriptor::new("check_network_health", "Check reachability of the Unifi Network endpoint"),
        network::check_network_health,
    )?;

    // Devices and clients
    b.register(
        site_id(ToolDescriptor::new("get_network_devices", "Get all devices of a site")),
        network::get_network_devices,
    )?;
    b.register(
        site_id(ToolDescriptor::new(
            "get_network_device_detailed",
            "Get detailed information about a specific device",
        ))
        .with_required("device_id", ParamType::String, "Device ID"),
        network::get_network_device_detailed,
    )?;
    b.register(
        site_id(ToolDescriptor::new("get_network_clients", "Get connected clients of a site"))
            .with_param("limit", ParamType::Integer, "Number of clients to retrieve (optional, default 50)")
            .with_param("offset", ParamType::Integer, "Offset for pagination (optional, default 0)"),
        network::get_network_clients,
    )?;
    b.register(
        site_id(ToolDescriptor::new(
            "get_network_client_detailed",
            "Get detailed information about a specific client",
        ))
        .with_required("client_mac", ParamType::String, "Client MAC address"),
        network::get_network_client_detailed,
    )?;
    b.register(
        site_id(ToolDescriptor::new("get_network_health", "Get health summary of a site")),
        network::get_network_health,
    )?;

    // WiFi
    b.register(
        site_id(ToolDescriptor::new("get_network_wifi_networks", "Get WiFi networks of a site")),
        network::get_network_wifi_networks,
    )?;
    register_collection(
        b,
        SiteCollection::WifiNetwork,
        ("wifi_network", "WiFi network"),
        (
            network::get_network_wifi_network_detailed,
            network::patch_network_wifi_network,
            network::create_network_wifi_network,
        ),
    )?;
    b.register(
        site_id(ToolDescriptor::new("get_network_wifi_broadcasts", "Get WiFi broadcasts of a site")),
        network::get_network_wifi_broadcasts,
    )?;

    // Firewall and ACL
    b.register(
        site_id(ToolDescriptor::new("get_network_firewall_zones", "Get firewall zones of a site")),
        network::get_network_firewall_zones,
    )?;
    register_collection(
        b,
        SiteCollection::FirewallZone,
        ("firewall_zone", "firewall zone"),
        (
            network::get_network_firewall_zone_detailed,
            network::patch_network_firewall_zone,
            network::create_network_firewall_zone,
        ),
    )?;
    b.register(
        site_id(ToolDescriptor::new("get_network_acl_rules", "Get ACL rules of a site")),
        network::get_network_acl_rules,
    )?;
    register_collection(
        b,
        SiteCollection::AclRule,
        ("acl_rule", "ACL rule"),
        (
            network::get_network_acl_rule_detailed,
            network::patch_network_acl_rule,
            network::create_network_acl_rule,
        ),
    )?;

    // Hotspot
    b.register(
        site_id(ToolDescriptor::new("get_network_hotspot_vouchers", "Get hotspot vouchers of a site")),
        network::get_network_hotspot_vouchers,
    )?;
    register_collection(
        b,
        SiteCollection::HotspotVoucher,
        ("hotspot_voucher", "hotspot voucher"),
        (
            network::get_network_hotspot_voucher_detailed,
            network::patch_network_hotspot_voucher,
            network::create_network_hotspot_voucher,
        ),
    )?;

    // Traffic rules
    b.register(
        site_id(ToolDescriptor::new("get_network_traffic_rules", "Get traffic matching rules of a site")),
        network::get_network_traffic_rules,
    )?;
    register_collection(
        b,
        SiteCollection::TrafficRule,
        ("traffic_rule", "traffic rule"),
        (
            network::get_network_traffic_rule_detailed,
            network::patch_network_traffic_rule,
            network::create_network_traffic_rule,
        ),
    )?;

    // VPN
    b.register(
        site_id(ToolDescriptor::new("get_network_vpn_servers", "Get VPN servers of a site")),
        network::get_network_vpn_servers,
    )?;
    b.register(
        site_id(ToolDescriptor::new("get_network_vpn_tunnels", "Get site-to-site VPN tunnels of a site")),
        network::get_network_vpn_tunnels,
    )?;
    b.register(
        site_id(ToolDescriptor::new("create_network_vpn_tunnel", "Create a new site-to-site VPN tunnel"))
            .with_required("config", ParamType::Object, "VPN tunnel configuration"),
        network::create_network_vpn_tunnel,
    )?;

    // Site configuration
    b.register(
        site_id(ToolDescriptor::new("get_network_device_tags", "Get device tags of a site")),
        network::get_network_device_tags,
    )?;
    b.register(
        site_id(ToolDescriptor::new("get_network_wan_config", "Get WAN configuration of a site")),
        network::get_network_wan_config,
    )?;
    b.register(
        site_id(ToolDescriptor::new("get_network_radius_profiles", "Get RADIUS profiles of a site")),
        network::get_network_radius_profiles,
    )?;

    // Controller-wide catalogs
    b.register(
        ToolDescriptor::new("get_network_pending_devices", "Get devices pending adoption"),
        network::get_network_pending_devices,
    )?;
    b.register(
        ToolDescriptor::new("get_network_dpi_categories", "Get DPI categories"),
        network::get_network_dpi_categories,
    )?;
    b.register(
        ToolDescriptor::new("get_network_dpi_applications", "Get DPI applications"),
        network::get_network_dpi_applications,
    )?;

    Ok(())
}
