//! UniFi Protect tool handlers

use std::sync::Arc;

use serde_json::json;

use super::{call_remote, detail, listing, outcome, page};
use crate::tools::arguments::Arguments;
use crate::tools::context::ToolContext;
use crate::tools::result::ToolResult;
use crate::unifi::ProtectResource;

pub const DEFAULT_EVENT_LIMIT: i64 = 50;

// Listings

pub async fn get_protect_cameras(ctx: Arc<ToolContext>, _args: Arguments) -> ToolResult {
    outcome(async move {
        let p = &ctx.protect;
        let cameras = call_remote(&ctx, p.authenticate(), "Failed to get cameras", p.get_cameras()).await?;
        listing("cameras", cameras)
    })
    .await
}

pub async fn get_protect_sensors(ctx: Arc<ToolContext>, _args: Arguments) -> ToolResult {
    outcome(async move {
        let p = &ctx.protect;
        let sensors = call_remote(&ctx, p.authenticate(), "Failed to get sensors", p.get_sensors()).await?;
        listing("sensors", sensors)
    })
    .await
}

pub async fn get_protect_lights(ctx: Arc<ToolContext>, _args: Arguments) -> ToolResult {
    outcome(async move {
        let p = &ctx.protect;
        let lights = call_remote(&ctx, p.authenticate(), "Failed to get lights", p.get_lights()).await?;
        listing("lights", lights)
    })
    .await
}

pub async fn get_protect_chimes(ctx: Arc<ToolContext>, _args: Arguments) -> ToolResult {
    outcome(async move {
        let p = &ctx.protect;
        let chimes = call_remote(&ctx, p.authenticate(), "Failed to get chimes", p.get_chimes()).await?;
        listing("chimes", chimes)
    })
    .await
}

pub async fn get_protect_liveviews(ctx: Arc<ToolContext>, _args: Arguments) -> ToolResult {
    outcome(async move {
        let p = &ctx.protect;
        let liveviews = call_remote(&ctx, p.authenticate(), "Failed to get liveviews", p.get_liveviews()).await?;
        listing("liveviews", liveviews)
    })
    .await
}

pub async fn get_protect_devices(ctx: Arc<ToolContext>, _args: Arguments) -> ToolResult {
    outcome(async move {
        let p = &ctx.protect;
        let devices = call_remote(&ctx, p.authenticate(), "Failed to get devices", p.get_devices()).await?;
        listing("devices", devices)
    })
    .await
}

pub async fn get_protect_viewers(ctx: Arc<ToolContext>, _args: Arguments) -> ToolResult {
    outcome(async move {
        let p = &ctx.protect;
        let viewers = call_remote(&ctx, p.authenticate(), "Failed to get viewers", p.get_viewers()).await?;
        listing("viewers", viewers)
    })
    .await
}

pub async fn get_protect_events(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    outcome(async move {
        let limit = args.optional_i64("limit", DEFAULT_EVENT_LIMIT)?;
        let offset = args.optional_i64("offset", 0)?;
        let p = &ctx.protect;
        let events = call_remote(&ctx, p.authenticate(), "Failed to get events", p.get_events(limit, offset)).await?;
        page("events", events, limit, offset)
    })
    .await
}

// Detail lookups

async fn get_detailed(ctx: Arc<ToolContext>, args: Arguments, kind: ProtectResource) -> ToolResult {
    let (key, param, failure) = match kind {
        ProtectResource::Camera => ("camera", "camera_id", "Failed to get camera details"),
        ProtectResource::Sensor => ("sensor", "sensor_id", "Failed to get sensor details"),
        ProtectResource::Light => ("light", "light_id", "Failed to get light details"),
        ProtectResource::Chime => ("chime", "chime_id", "Failed to get chime details"),
        ProtectResource::Liveview => ("liveview", "liveview_id", "Failed to get liveview details"),
        ProtectResource::Viewer => ("viewer", "id", "Failed to get viewer details"),
    };

    outcome(async move {
        let id = args.lookup_id(param)?;
        let p = &ctx.protect;
        let item = call_remote(&ctx, p.authenticate(), failure, p.get_detailed(kind, id)).await?;
        detail(key, item, &[(param, id)])
    })
    .await
}

pub async fn get_camera_detailed(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    get_detailed(ctx, args, ProtectResource::Camera).await
}

pub async fn get_sensor_detailed(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    get_detailed(ctx, args, ProtectResource::Sensor).await
}

pub async fn get_light_detailed(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    get_detailed(ctx, args, ProtectResource::Light).await
}

pub async fn get_chime_detailed(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    get_detailed(ctx, args, ProtectResource::Chime).await
}

pub async fn get_liveview_detailed(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    get_detailed(ctx, args, ProtectResource::Liveview).await
}

/// Viewer detail answers with the vendor payload as-is
pub async fn get_protect_viewer_detailed(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    outcome(async move {
        let id = args.required_str("id")?;
        let p = &ctx.protect;
        let viewer = call_remote(
            &ctx,
            p.authenticate(),
            "Failed to get viewer details",
            p.get_detailed(ProtectResource::Viewer, id),
        )
        .await?;
        Ok(viewer.into())
    })
    .await
}

// System

pub async fn get_protect_info(ctx: Arc<ToolContext>, _args: Arguments) -> ToolResult {
    outcome(async move {
        let p = &ctx.protect;
        let info = call_remote(&ctx, p.authenticate(), "Failed to get system info", p.get_system_info()).await?;
        Ok(json!({
            "version": info.version,
            "application_version": info.application_version,
            "unique_id": info.unique_id,
            "system_type": info.system_type,
        }))
    })
    .await
}

pub async fn get_protect_nvr(ctx: Arc<ToolContext>, _args: Arguments) -> ToolResult {
    outcome(async move {
        let p = &ctx.protect;
        call_remote(&ctx, p.authenticate(), "Failed to get NVR information", p.get_nvr()).await
    })
    .await
}

// Updates

async fn patch(ctx: Arc<ToolContext>, args: Arguments, kind: ProtectResource) -> ToolResult {
    let failure = match kind {
        ProtectResource::Camera => "Failed to update camera",
        ProtectResource::Sensor => "Failed to update sensor",
        ProtectResource::Light => "Failed to update light",
        ProtectResource::Chime => "Failed to update chime",
        ProtectResource::Viewer => "Failed to update viewer",
        ProtectResource::Liveview => "Failed to update liveview",
    };

    outcome(async move {
        let id = args.required_str("id")?;
        let settings = args.non_empty_object("settings")?;
        let p = &ctx.protect;
        let updated = call_remote(&ctx, p.authenticate(), failure, p.patch(kind, id, settings)).await?;
        Ok(updated.into())
    })
    .await
}

pub async fn patch_protect_viewer(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    patch(ctx, args, ProtectResource::Viewer).await
}

pub async fn patch_protect_camera(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    patch(ctx, args, ProtectResource::Camera).await
}

pub async fn patch_protect_sensor(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    patch(ctx, args, ProtectResource::Sensor).await
}

pub async fn patch_protect_light(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    patch(ctx, args, ProtectResource::Light).await
}

pub async fn patch_protect_chime(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    patch(ctx, args, ProtectResource::Chime).await
}

pub async fn patch_protect_liveview(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    patch(ctx, args, ProtectResource::Liveview).await
}

pub async fn create_protect_liveview(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    outcome(async move {
        let config = args.required_object("config")?;
        let p = &ctx.protect;
        let created = call_remote(&ctx, p.authenticate(), "Failed to create liveview", p.create_liveview(config)).await?;
        Ok(created.into())
    })
    .await
}

// Camera controls

/// Slot defaults to 0; negatives never reach the controller
fn slot(args: &Arguments) -> Result<u32, ToolResult> {
    let slot = args.optional_i64("slot", 0)?;
    u32::try_from(slot).map_err(|_| ToolResult::error("Invalid slot number"))
}

pub async fn camera_start_ptz_patrol(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    outcome(async move {
        let camera_id = args.required_str("camera_id")?;
        let slot = slot(&args)?;
        let p = &ctx.protect;
        let result = call_remote(
            &ctx,
            p.authenticate(),
            "Failed to start PTZ patrol",
            p.start_ptz_patrol(camera_id, slot),
        )
        .await?;
        Ok(result.into())
    })
    .await
}

pub async fn camera_stop_ptz_patrol(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    outcome(async move {
        let camera_id = args.required_str("camera_id")?;
        let p = &ctx.protect;
        let result = call_remote(&ctx, p.authenticate(), "Failed to stop PTZ patrol", p.stop_ptz_patrol(camera_id)).await?;
        Ok(result.into())
    })
    .await
}

pub async fn camera_goto_ptz_preset(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    outcome(async move {
        let camera_id = args.required_str("camera_id")?;
        let slot = slot(&args)?;
        let p = &ctx.protect;
        let result = call_remote(
            &ctx,
            p.authenticate(),
            "Failed to move to PTZ preset",
            p.goto_ptz_preset(camera_id, slot),
        )
        .await?;
        Ok(result.into())
    })
    .await
}

pub async fn camera_create_rtsps_stream(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    outcome(async move {
        let camera_id = args.required_str("camera_id")?;
        let config = args.optional_object("config")?;
        let p = &ctx.protect;
        let stream = call_remote(
            &ctx,
            p.authenticate(),
            "Failed to create RTSPS stream",
            p.create_rtsps_stream(camera_id, config),
        )
        .await?;
        Ok(stream.into())
    })
    .await
}

pub async fn camera_create_talkback_session(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    outcome(async move {
        let camera_id = args.required_str("camera_id")?;
        let config = args.optional_object("config")?;
        let p = &ctx.protect;
        let session = call_remote(
            &ctx,
            p.authenticate(),
            "Failed to create talkback session",
            p.create_talkback_session(camera_id, config),
        )
        .await?;
        Ok(session.into())
    })
    .await
}

pub async fn camera_disable_mic_permanently(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    outcome(async move {
        let camera_id = args.required_str("camera_id")?;
        let p = &ctx.protect;
        let result = call_remote(
            &ctx,
            p.authenticate(),
            "Failed to disable microphone",
            p.disable_mic_permanently(camera_id),
        )
        .await?;
        Ok(result.into())
    })
    .await
}

pub async fn trigger_webhook_alarm(ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
    outcome(async move {
        let webhook_id = args.required_str("webhook_id")?;
        let payload = args.optional_object("payload")?;
        let p = &ctx.protect;
        let result = call_remote(
            &ctx,
            p.authenticate(),
            "Failed to trigger webhook alarm",
            p.trigger_webhook_alarm(webhook_id, payload),
        )
        .await?;
        Ok(result.into())
    })
    .await
}
