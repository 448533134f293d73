//! Uniform tool result envelope

use serde_json::{Value, json};

use super::arguments::ArgumentError;

/// Outcome of one invocation. Handlers always produce one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolResult {
    Success(Value),
    Error { message: String, cause: Option<String> },
}

impl ToolResult {
    pub fn success(payload: Value) -> Self {
        Self::Success(payload)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
            cause: None,
        }
    }

    pub fn error_with_cause(message: impl Into<String>, cause: impl ToString) -> Self {
        Self::Error {
            message: message.into(),
            cause: Some(cause.to_string()),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Success(payload) => Some(payload),
            Self::Error { .. } => None,
        }
    }

    /// Agent-facing text: pretty JSON on success, `<message>: <cause>` on error
    pub fn text(&self) -> String {
        match self {
            Self::Success(payload) => serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string()),
            Self::Error { message, cause: Some(cause) } => format!("{}: {}", message, cause),
            Self::Error { message, cause: None } => message.clone(),
        }
    }

    /// MCP `tools/call` result object
    pub fn to_mcp(&self) -> Value {
        let mut result = json!({
            "content": [{"type": "text", "text": self.text()}],
            "isError": self.is_error(),
        });
        if let (Self::Success(payload), Some(obj)) = (self, result.as_object_mut()) {
            obj.insert("structuredContent".to_string(), payload.clone());
        }
        result
    }
}

impl From<ArgumentError> for ToolResult {
    fn from(err: ArgumentError) -> Self {
        Self::error(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success() {
        let result = ToolResult::success(json!({"count": 0}));
        assert!(!result.is_error());
        assert_eq!(result.payload(), Some(&json!({"count": 0})));
    }

    #[test]
    fn test_error_text() {
        assert_eq!(ToolResult::error("Invalid slot number").text(), "Invalid slot number");
        assert_eq!(
            ToolResult::error_with_cause("Failed to get cameras", "request failed with status 500: boom").text(),
            "Failed to get cameras: request failed with status 500: boom"
        );
    }

    #[test]
    fn test_from_argument_error() {
        let result: ToolResult = ArgumentError::MissingId("camera_id".to_string()).into();
        assert_eq!(result, ToolResult::error("camera_id is required"));
    }

    #[test]
    fn test_to_mcp_success() {
        let mcp = ToolResult::success(json!({"cameras": [], "count": 0})).to_mcp();
        assert_eq!(mcp["isError"], false);
        assert_eq!(mcp["content"][0]["type"], "text");
        assert_eq!(mcp["structuredContent"]["count"], 0);

        let text = mcp["content"][0]["text"].as_str().unwrap();
        let reparsed: Value = serde_json::from_str(text).unwrap();
        assert_eq!(reparsed["count"], 0);
    }

    #[test]
    fn test_to_mcp_error() {
        let mcp = ToolResult::error_with_cause("Authentication failed", "API key not configured").to_mcp();
        assert_eq!(mcp["isError"], true);
        assert_eq!(mcp["content"][0]["text"], "Authentication failed: API key not configured");
        assert!(mcp.get("structuredContent").is_none());
    }
}
