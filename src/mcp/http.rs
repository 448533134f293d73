//! HTTP transport (axum)
//!
//! `POST /mcp` carries one JSON-RPC message per request; `GET /health` is a
//! liveness probe that never touches the vendor API.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{info, warn};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use super::messages::RpcResponse;
use super::server::McpServer;
use crate::error::{GatewayError, Result};

pub fn build_router(server: Arc<McpServer>) -> Router {
    Router::new()
        .route("/health", get(cmd_health))
        .route("/mcp", post(cmd_mcp))
        .with_state(server)
}

/// Bind `addr` and serve until `cancel` fires, then drain open requests
pub async fn serve_http(addr: &str, server: Arc<McpServer>, cancel: CancellationToken) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| GatewayError::Server(format!("Failed to bind {}: {}", addr, e)))?;
    info!("Serving MCP over HTTP on {}", addr);

    axum::serve(listener, build_router(server))
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await?;

    info!("HTTP transport stopped");
    Ok(())
}

async fn cmd_health() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}

async fn cmd_mcp(State(server): State<Arc<McpServer>>, body: Bytes) -> Response {
    let message: Value = match serde_json::from_slice(&body) {
        Ok(message) => message,
        Err(e) => {
            warn!("Malformed request body: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(RpcResponse::parse_error(format!("Parse error: {}", e))),
            )
                .into_response();
        }
    };

    match server.handle_value(message).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}
