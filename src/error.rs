//! Error types for unifi-mcp
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in the gateway
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Missing or malformed tool argument, rejected before any I/O
    #[error("Invalid argument: {0}")]
    Validation(String),

    /// Local credential precondition failed
    #[error("{0}")]
    Auth(String),

    /// Vendor API answered with a non-2xx status
    #[error("request failed with status {status}: {body}")]
    RemoteRequest { status: u16, body: String },

    /// Connect, TLS or timeout failure talking to the vendor API
    #[error("request failed: {0}")]
    RemoteTransport(String),

    /// Vendor API answered with a body that does not match the endpoint shape
    #[error("failed to decode response: {0}")]
    RemoteDecode(String),

    /// A client-side lookup over a vendor listing found nothing
    #[error("{0}")]
    ResourceNotFound(String),

    /// Dispatch miss
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Two tools registered under the same name
    #[error("Duplicate tool registration: {0}")]
    DuplicateTool(String),

    /// Shutdown started while a call was in flight
    #[error("Server is shutting down")]
    Cancelled,

    /// Startup configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Agent-facing transport error
    #[error("Server error: {0}")]
    Server(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GatewayError {
    /// HTTP status for `RemoteRequest`, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::RemoteRequest { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;
