//! MCP method handling, shared by both transports

use std::sync::Arc;

use log::{debug, info};
use serde_json::{Value, json};

use super::messages::{Methods, RpcError, RpcRequest, RpcResponse};
use crate::error::GatewayError;
use crate::tools::{Arguments, Dispatcher, ToolInvocation};

pub const SERVER_NAME: &str = "unifi-protect-mcp";

/// Protocol revisions this server speaks, newest first
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2025-06-18", "2025-03-26", "2024-11-05"];

pub struct McpServer {
    dispatcher: Arc<Dispatcher>,
}

impl McpServer {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Handle one parsed message; `None` for notifications.
    pub async fn handle_value(&self, value: Value) -> Option<RpcResponse> {
        match RpcRequest::from_value(value) {
            Ok(request) => self.handle(request).await,
            Err(response) => Some(response),
        }
    }

    pub async fn handle(&self, request: RpcRequest) -> Option<RpcResponse> {
        let RpcRequest { id, method, params, .. } = request;
        let Some(id) = id else {
            debug!("Notification: {}", method);
            return None;
        };

        let outcome = match method.as_str() {
            Methods::INITIALIZE => Ok(self.initialize(params.as_ref())),
            Methods::PING => Ok(json!({})),
            Methods::TOOLS_LIST => Ok(self.list_tools()),
            Methods::TOOLS_CALL => self.call_tool(params).await,
            other => Err(RpcError::method_not_found(other)),
        };

        Some(match outcome {
            Ok(result) => RpcResponse::success(id, result),
            Err(error) => RpcResponse::error(id, error),
        })
    }

    fn initialize(&self, params: Option<&Value>) -> Value {
        let requested = params
            .and_then(|p| p.get("protocolVersion"))
            .and_then(Value::as_str);
        let version = match requested {
            Some(v) if SUPPORTED_PROTOCOL_VERSIONS.contains(&v) => v,
            _ => SUPPORTED_PROTOCOL_VERSIONS[0],
        };
        info!("Client initialized with protocol {}", version);

        json!({
            "protocolVersion": version,
            "capabilities": {
                "tools": { "listChanged": false }
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            }
        })
    }

    fn list_tools(&self) -> Value {
        json!({ "tools": self.dispatcher.registry().list() })
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value, RpcError> {
        let params = params.unwrap_or(Value::Null);
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| RpcError::invalid_params("Missing tool name"))?
            .to_string();
        let arguments = Arguments::from_value(params.get("arguments").cloned().unwrap_or(Value::Null))
            .ok_or_else(|| RpcError::invalid_params("Tool arguments must be an object"))?;

        match self.dispatcher.dispatch(ToolInvocation::new(name, arguments)).await {
            Ok(result) => Ok(result.to_mcp()),
            Err(e @ GatewayError::UnknownTool(_)) => Err(RpcError::invalid_params(e.to_string())),
            Err(e) => Err(RpcError::internal_error(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::mcp::messages::ErrorCode;
    use crate::tools::{ToolContext, ToolDescriptor, ToolRegistry, ToolResult, RegistryBuilder};
    use crate::unifi::MockBackend;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    async fn greet(_ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
        match args.required_str("who") {
            Ok(who) => ToolResult::success(json!({ "greeting": format!("hello {}", who) })),
            Err(e) => e.into(),
        }
    }

    fn registry() -> ToolRegistry {
        let mut builder = RegistryBuilder::new();
        builder
            .register(
                ToolDescriptor::new("greet", "Say hello").with_required(
                    "who",
                    crate::tools::ParamType::String,
                    "Name",
                ),
                greet,
            )
            .unwrap();
        builder.build()
    }

    fn server() -> McpServer {
        let config = ClientConfig {
            base_url: "https://nvr".to_string(),
            api_key: "key".to_string(),
            skip_tls_verify: false,
            timeout: Duration::from_secs(30),
        };
        let context = Arc::new(ToolContext::new(&config, Arc::new(MockBackend::new()), CancellationToken::new()));
        McpServer::new(Arc::new(Dispatcher::new(registry(), context)))
    }

    #[tokio::test]
    async fn test_initialize_echoes_supported_version() {
        let resp = server()
            .handle(RpcRequest::new(1, "initialize", json!({"protocolVersion": "2024-11-05"})))
            .await
            .unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result["protocolVersion"], "2024-11-05");
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
        assert!(result["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_initialize_falls_back_to_newest() {
        let resp = server()
            .handle(RpcRequest::new(1, "initialize", json!({"protocolVersion": "1999-01-01"})))
            .await
            .unwrap();
        assert_eq!(resp.result.unwrap()["protocolVersion"], SUPPORTED_PROTOCOL_VERSIONS[0]);
    }

    #[tokio::test]
    async fn test_notifications_get_no_response() {
        assert!(server().handle(RpcRequest::notification("notifications/initialized")).await.is_none());
    }

    #[tokio::test]
    async fn test_ping() {
        let resp = server().handle(RpcRequest::new("p", "ping", json!({}))).await.unwrap();
        assert_eq!(resp.id, json!("p"));
        assert_eq!(resp.result, Some(json!({})));
    }

    #[tokio::test]
    async fn test_tools_list() {
        let resp = server().handle(RpcRequest::new(2, "tools/list", json!({}))).await.unwrap();
        let tools = resp.result.unwrap()["tools"].clone();
        assert_eq!(tools[0]["name"], "greet");
        assert_eq!(tools[0]["inputSchema"]["required"], json!(["who"]));
    }

    #[tokio::test]
    async fn test_tools_call_success_and_error() {
        let server = server();
        let resp = server
            .handle(RpcRequest::new(3, "tools/call", json!({"name": "greet", "arguments": {"who": "nvr"}})))
            .await
            .unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result["isError"], false);
        assert_eq!(result["structuredContent"]["greeting"], "hello nvr");

        let resp = server
            .handle(RpcRequest::new(4, "tools/call", json!({"name": "greet"})))
            .await
            .unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result["isError"], true);
        assert_eq!(result["content"][0]["text"], "Missing required parameter: who");
    }

    #[tokio::test]
    async fn test_tools_call_protocol_errors() {
        let server = server();
        let resp = server
            .handle(RpcRequest::new(5, "tools/call", json!({"name": "nonexistent_tool"})))
            .await
            .unwrap();
        let error = resp.error.unwrap();
        assert_eq!(error.code, ErrorCode::INVALID_PARAMS);
        assert_eq!(error.message, "Unknown tool: nonexistent_tool");

        let resp = server
            .handle(RpcRequest::new(6, "tools/call", json!({"name": "greet", "arguments": [1]})))
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap().code, ErrorCode::INVALID_PARAMS);

        let resp = server
            .handle(RpcRequest::new(7, "tools/call", json!({})))
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap().code, ErrorCode::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let resp = server().handle(RpcRequest::new(8, "resources/list", json!({}))).await.unwrap();
        assert_eq!(resp.error.unwrap().code, ErrorCode::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_handle_value_invalid_request() {
        let resp = server().handle_value(json!({"jsonrpc": "2.0", "id": 9})).await.unwrap();
        assert_eq!(resp.id, json!(9));
        assert_eq!(resp.error.unwrap().code, ErrorCode::INVALID_REQUEST);
    }
}
