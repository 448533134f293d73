//! JSON-RPC 2.0 message types for the agent protocol.
//!
//! A request without an `id` is a notification and never gets a response.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

/// Request or notification sent by the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    /// Correlation ID; absent on notifications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Method name (e.g., "tools/call").
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl RpcRequest {
    /// Create a new request with the given id, method and params.
    pub fn new(id: impl Into<Value>, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Some(id.into()),
            method: method.into(),
            params: Some(params),
        }
    }

    /// Create a notification (no id).
    pub fn notification(method: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: None,
            method: method.into(),
            params: None,
        }
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    /// Validate an already-parsed JSON message.
    ///
    /// On failure, returns the error response to send back (carrying the
    /// message's id when one could be read).
    pub fn from_value(value: Value) -> Result<Self, RpcResponse> {
        let id = value.get("id").cloned().unwrap_or(Value::Null);
        if !value.is_object() {
            return Err(RpcResponse::error(id, RpcError::invalid_request("Request must be an object")));
        }
        let request: Self = serde_json::from_value(value)
            .map_err(|e| RpcResponse::error(id.clone(), RpcError::invalid_request(e.to_string())))?;
        if request.jsonrpc != JSONRPC_VERSION {
            return Err(RpcResponse::error(
                id,
                RpcError::invalid_request(format!("Unsupported jsonrpc version: {}", request.jsonrpc)),
            ));
        }
        Ok(request)
    }
}

/// Response to one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    /// Request ID this response corresponds to; `null` when it could not be read.
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    /// Create a success response.
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Value, error: RpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Parse error reply for a message that was not valid JSON.
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::error(Value::Null, RpcError::parse_error(message))
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Error details in a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Parse error (-32700).
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PARSE_ERROR, message)
    }

    /// Invalid request error (-32600).
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::INVALID_REQUEST, message)
    }

    /// Method not found error (-32601).
    pub fn method_not_found(method: &str) -> Self {
        Self::new(ErrorCode::METHOD_NOT_FOUND, format!("Method not found: {}", method))
    }

    /// Invalid params error (-32602).
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::INVALID_PARAMS, message)
    }

    /// Internal error (-32603).
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::INTERNAL_ERROR, message)
    }
}

/// Standard error codes.
pub struct ErrorCode;

impl ErrorCode {
    /// Invalid JSON.
    pub const PARSE_ERROR: i32 = -32700;
    /// Invalid request object.
    pub const INVALID_REQUEST: i32 = -32600;
    /// Unknown method.
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Invalid parameters, including an unknown tool.
    pub const INVALID_PARAMS: i32 = -32602;
    /// Internal server error.
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// Known method names as constants.
pub struct Methods;

impl Methods {
    pub const INITIALIZE: &'static str = "initialize";
    pub const INITIALIZED: &'static str = "notifications/initialized";
    pub const PING: &'static str = "ping";
    pub const TOOLS_LIST: &'static str = "tools/list";
    pub const TOOLS_CALL: &'static str = "tools/call";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_new() {
        let req = RpcRequest::new(1, Methods::TOOLS_LIST, json!({}));
        assert_eq!(req.id, Some(json!(1)));
        assert!(!req.is_notification());
        let text = serde_json::to_string(&req).unwrap();
        assert!(text.contains("\"jsonrpc\":\"2.0\""));
        assert!(text.contains("\"method\":\"tools/list\""));
    }

    #[test]
    fn test_notification_has_no_id() {
        let req = RpcRequest::notification(Methods::INITIALIZED);
        assert!(req.is_notification());
        let text = serde_json::to_string(&req).unwrap();
        assert!(!text.contains("\"id\""));
        assert!(!text.contains("\"params\""));
    }

    #[test]
    fn test_from_value_accepts_string_ids() {
        let req = RpcRequest::from_value(json!({"jsonrpc": "2.0", "id": "abc", "method": "ping"})).unwrap();
        assert_eq!(req.id, Some(json!("abc")));
        assert_eq!(req.params, None);
    }

    #[test]
    fn test_from_value_rejects_bad_shapes() {
        let resp = RpcRequest::from_value(json!([1, 2])).unwrap_err();
        assert_eq!(resp.error.unwrap().code, ErrorCode::INVALID_REQUEST);

        let resp = RpcRequest::from_value(json!({"jsonrpc": "2.0", "id": 7})).unwrap_err();
        assert_eq!(resp.id, json!(7));
        assert_eq!(resp.error.unwrap().code, ErrorCode::INVALID_REQUEST);

        let resp = RpcRequest::from_value(json!({"jsonrpc": "1.0", "id": 8, "method": "ping"})).unwrap_err();
        assert_eq!(resp.id, json!(8));
        assert!(resp.error.unwrap().message.contains("1.0"));
    }

    #[test]
    fn test_response_serialization() {
        let ok = serde_json::to_value(RpcResponse::success(json!(1), json!({}))).unwrap();
        assert_eq!(ok, json!({"jsonrpc": "2.0", "id": 1, "result": {}}));

        let err = serde_json::to_value(RpcResponse::parse_error("bad json")).unwrap();
        assert_eq!(
            err,
            json!({"jsonrpc": "2.0", "id": null, "error": {"code": -32700, "message": "bad json"}})
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(RpcError::method_not_found("nope").code, -32601);
        assert_eq!(RpcError::method_not_found("nope").message, "Method not found: nope");
        assert_eq!(RpcError::invalid_params("x").code, -32602);
        assert_eq!(RpcError::internal_error("x").code, -32603);
    }
}
