//! Typed extraction over an invocation's argument bag

use serde_json::Value;
use thiserror::Error;

use super::definition::ParamType;
use crate::unifi::models::JsonObject;

/// Why an argument could not be extracted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    #[error("Missing required parameter: {0}")]
    Missing(String),

    /// Missing identifier on a detail lookup
    #[error("{0} is required")]
    MissingId(String),

    #[error("Invalid parameter {name}: expected {}", expected.as_str())]
    WrongType { name: String, expected: ParamType },
}

impl ArgumentError {
    fn wrong_type(name: &str, expected: ParamType) -> Self {
        Self::WrongType {
            name: name.to_string(),
            expected,
        }
    }
}

/// Arguments of one invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: JsonObject,
}

impl Arguments {
    pub fn new(values: JsonObject) -> Self {
        Self { values }
    }

    /// Build from a raw JSON value; `null` is an empty bag, any other non-object is rejected
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(values) => Some(Self { values }),
            Value::Null => Some(Self::default()),
            _ => None,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name).filter(|v| !v.is_null())
    }

    /// Non-empty string argument
    pub fn required_str(&self, name: &str) -> Result<&str, ArgumentError> {
        match self.get(name) {
            None => Err(ArgumentError::Missing(name.to_string())),
            Some(Value::String(s)) if s.is_empty() => Err(ArgumentError::Missing(name.to_string())),
            Some(Value::String(s)) => Ok(s.as_str()),
            Some(_) => Err(ArgumentError::wrong_type(name, ParamType::String)),
        }
    }

    /// Identifier for a detail lookup; reports `<name> is required` when absent
    pub fn lookup_id(&self, name: &str) -> Result<&str, ArgumentError> {
        self.required_str(name).map_err(|e| match e {
            ArgumentError::Missing(name) => ArgumentError::MissingId(name),
            other => other,
        })
    }

    /// Integer argument with a default. Accepts integral numbers and numeric strings.
    pub fn optional_i64(&self, name: &str, default: i64) -> Result<i64, ArgumentError> {
        let Some(value) = self.get(name) else {
            return Ok(default);
        };
        match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().and_then(integral_f64))
                .ok_or_else(|| ArgumentError::wrong_type(name, ParamType::Integer)),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| ArgumentError::wrong_type(name, ParamType::Integer)),
            _ => Err(ArgumentError::wrong_type(name, ParamType::Integer)),
        }
    }

    /// Object argument that must be present (may be empty)
    pub fn required_object(&self, name: &str) -> Result<JsonObject, ArgumentError> {
        match self.get(name) {
            None => Err(ArgumentError::Missing(name.to_string())),
            Some(Value::Object(map)) => Ok(map.clone()),
            Some(_) => Err(ArgumentError::wrong_type(name, ParamType::Object)),
        }
    }

    /// Object argument with at least one key, as patch settings must be
    pub fn non_empty_object(&self, name: &str) -> Result<JsonObject, ArgumentError> {
        let map = self.required_object(name)?;
        if map.is_empty() {
            return Err(ArgumentError::Missing(name.to_string()));
        }
        Ok(map)
    }

    /// Object argument; absent means empty
    pub fn optional_object(&self, name: &str) -> Result<JsonObject, ArgumentError> {
        match self.get(name) {
            None => Ok(JsonObject::new()),
            Some(Value::Object(map)) => Ok(map.clone()),
            Some(_) => Err(ArgumentError::wrong_type(name, ParamType::Object)),
        }
    }
}

/// Whole floats inside the i64 range; `as` would saturate anything else
fn integral_f64(f: f64) -> Option<i64> {
    // 2^63 is the first float past i64::MAX
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if f.is_finite() && f.fract() == 0.0 && (-LIMIT..LIMIT).contains(&f) {
        Some(f as i64)
    } else {
        None
    }
}

impl From<JsonObject> for Arguments {
    fn from(values: JsonObject) -> Self {
        Self::new(values)
    }
}
