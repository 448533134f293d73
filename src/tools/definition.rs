//! Tool descriptors
//!
//! Name, description and input schema as advertised to the agent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// JSON type of a declared parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Object,
}

impl ParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Object => "object",
        }
    }
}

/// A tool as listed to the agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    /// Tool name (e.g., "get_protect_cameras")
    pub name: String,
    /// Human-readable description for the agent
    pub description: String,
    /// JSON schema for input parameters
    pub input_schema: Value,
}

impl ToolDescriptor {
    /// Create a descriptor with an empty object schema
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        }
    }

    /// Declare an optional parameter
    pub fn with_param(mut self, name: &str, kind: ParamType, description: &str) -> Self {
        if let Some(properties) = self.properties_mut() {
            properties.insert(
                name.to_string(),
                json!({"type": kind.as_str(), "description": description}),
            );
        }
        self
    }

    /// Declare a required parameter
    pub fn with_required(self, name: &str, kind: ParamType, description: &str) -> Self {
        let mut tool = self.with_param(name, kind, description);
        if let Some(schema) = tool.input_schema.as_object_mut() {
            let required = schema.entry("required").or_insert_with(|| Value::Array(Vec::new()));
            if let Some(list) = required.as_array_mut() {
                list.push(Value::String(name.to_string()));
            }
        }
        tool
    }

    /// Replace the whole input schema
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.input_schema = schema;
        self
    }

    /// Names of required parameters
    pub fn required_params(&self) -> Vec<&str> {
        self.input_schema
            .get("required")
            .and_then(Value::as_array)
            .map(|list| list.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    fn properties_mut(&mut self) -> Option<&mut Map<String, Value>> {
        self.input_schema
            .as_object_mut()?
            .entry("properties")
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_empty_object_schema() {
        let tool = ToolDescriptor::new("get_protect_cameras", "Get all cameras");
        assert_eq!(tool.input_schema["type"], "object");
        assert!(tool.input_schema["properties"].as_object().unwrap().is_empty());
        assert!(tool.required_params().is_empty());
    }

    #[test]
    fn test_params_and_required() {
        let tool = ToolDescriptor::new("camera_goto_ptz_preset", "Move camera to a PTZ preset position")
            .with_required("camera_id", ParamType::String, "Camera ID")
            .with_param("slot", ParamType::Integer, "Preset slot number");

        assert_eq!(tool.input_schema["properties"]["camera_id"]["type"], "string");
        assert_eq!(tool.input_schema["properties"]["slot"]["type"], "integer");
        assert_eq!(tool.input_schema["properties"]["slot"]["description"], "Preset slot number");
        assert_eq!(tool.required_params(), vec!["camera_id"]);
    }

    #[test]
    fn test_serializes_input_schema_camel_case() {
        let tool = ToolDescriptor::new("ping", "Ping");
        let value = serde_json::to_value(&tool).unwrap();
        assert!(value.get("inputSchema").is_some());
        assert!(value.get("input_schema").is_none());
    }

    #[test]
    fn test_with_schema_replaces() {
        let tool = ToolDescriptor::new("x", "y").with_schema(json!({"type": "object", "properties": {"a": {}}}));
        assert!(tool.input_schema["properties"].get("a").is_some());
    }
}
