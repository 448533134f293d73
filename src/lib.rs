//! unifi-mcp - UniFi Protect and UniFi Network as MCP agent tools
//!
//! An agent speaks MCP (JSON-RPC 2.0) over stdio or HTTP; each tool call is
//! validated, dispatched to a handler, and turned into one call against the
//! UniFi controller's HTTP API.

pub mod config;
pub mod error;
pub mod mcp;
pub mod tools;
pub mod unifi;

pub use error::{GatewayError, Result};
