//! Agent protocol layer - MCP over JSON-RPC 2.0
//!
//! This module provides:
//! - JSON-RPC message types
//! - Method handling over the tool dispatcher
//! - stdio and HTTP transports

pub mod codec;
pub mod http;
pub mod messages;
pub mod server;
pub mod stdio;

pub use codec::NdJsonCodec;
pub use http::{build_router, serve_http};
pub use messages::{ErrorCode, Methods, RpcError, RpcRequest, RpcResponse};
pub use server::{McpServer, SERVER_NAME, SUPPORTED_PROTOCOL_VERSIONS};
pub use stdio::{serve_stdio, serve_stream};
