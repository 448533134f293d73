//! One vendor-subsystem family: base URL, key, auth convention, backend

use std::sync::Arc;

use reqwest::Method;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::transport::{ApiRequest, ApiResponse, AuthScheme, HttpBackend};
use crate::error::{GatewayError, Result};

/// Fixed per-endpoint response shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// Payload is the whole body
    Bare,
    /// Payload lives under a top-level `data` key
    Data,
    /// Like `Data`, but a missing or null `data` (or an empty body) is an empty object.
    /// Writes and actions answer this way once the change is applied.
    OptionalData,
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct OptionalDataEnvelope<T> {
    data: Option<T>,
}

/// Authenticated HTTP access to one family of vendor endpoints
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    api_key: String,
    auth: AuthScheme,
    backend: Arc<dyn HttpBackend>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        auth: AuthScheme,
        backend: Arc<dyn HttpBackend>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            auth,
            backend,
        }
    }

    pub fn auth_scheme(&self) -> AuthScheme {
        self.auth
    }

    /// Local precondition only: the key is present
    pub fn authenticate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(GatewayError::Auth("API key not configured".to_string()));
        }
        Ok(())
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, envelope: Envelope) -> Result<T> {
        let response = self.execute(Method::GET, path, None).await?;
        decode(&response, envelope)
    }

    pub async fn patch<T: DeserializeOwned>(&self, path: &str, body: Value, envelope: Envelope) -> Result<T> {
        let response = self.execute(Method::PATCH, path, Some(body)).await?;
        decode(&response, envelope)
    }

    pub async fn post<T: DeserializeOwned>(&self, path: &str, body: Value, envelope: Envelope) -> Result<T> {
        let response = self.execute(Method::POST, path, Some(body)).await?;
        decode(&response, envelope)
    }

    /// Send one request without interpreting the status
    pub async fn send_raw(&self, method: Method, path: &str, body: Option<Value>) -> Result<ApiResponse> {
        self.backend.send(self.request(method, path, body)).await
    }

    /// Send one request; non-2xx becomes `RemoteRequest`
    pub async fn execute(&self, method: Method, path: &str, body: Option<Value>) -> Result<ApiResponse> {
        let response = self.send_raw(method, path, body).await?;
        if !response.is_success() {
            return Err(GatewayError::RemoteRequest {
                status: response.status,
                body: response.body,
            });
        }
        Ok(response)
    }

    fn request(&self, method: Method, path: &str, body: Option<Value>) -> ApiRequest {
        let (auth_name, auth_value) = self.auth.header(&self.api_key);
        let mut headers = vec![
            (auth_name.to_string(), auth_value),
            ("Accept".to_string(), "application/json".to_string()),
        ];
        if body.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }

        ApiRequest {
            method,
            url: format!("{}{}", self.base_url, path),
            path: path.to_string(),
            headers,
            body,
        }
    }
}

/// Decode a successful response body with the endpoint's envelope
pub fn decode<T: DeserializeOwned>(response: &ApiResponse, envelope: Envelope) -> Result<T> {
    let decoded = match envelope {
        Envelope::Bare => serde_json::from_str::<T>(&response.body),
        Envelope::Data => serde_json::from_str::<DataEnvelope<T>>(&response.body).map(|e| e.data),
        Envelope::OptionalData => decode_optional_data(&response.body),
    };
    decoded.map_err(|e| GatewayError::RemoteDecode(e.to_string()))
}

fn decode_optional_data<T: DeserializeOwned>(body: &str) -> serde_json::Result<T> {
    let data = if body.trim().is_empty() {
        None
    } else {
        serde_json::from_str::<OptionalDataEnvelope<T>>(body)?.data
    };
    match data {
        Some(data) => Ok(data),
        None => serde_json::from_value(Value::Object(serde_json::Map::new())),
    }
}
