//! HTTP transport seam between the vendor clients and the network
//!
//! The clients build `ApiRequest`s and hand them to an `HttpBackend`. The
//! production backend is reqwest; tests plug in `MockBackend`.

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Method};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{GatewayError, Result};

/// Header carrying the API key for the key-header convention
pub const API_KEY_HEADER: &str = "X-API-KEY";

/// How a vendor-subsystem family presents the API key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `X-API-KEY: <key>`
    ApiKeyHeader,
    /// `Authorization: Bearer <key>`
    Bearer,
}

impl AuthScheme {
    /// Header name and value for the given key
    pub fn header(&self, api_key: &str) -> (&'static str, String) {
        match self {
            Self::ApiKeyHeader => (API_KEY_HEADER, api_key.to_string()),
            Self::Bearer => ("Authorization", format!("Bearer {}", api_key)),
        }
    }
}

/// One outbound request, fully resolved
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Absolute URL (base + path)
    pub url: String,
    /// Path relative to the base URL, including any query string
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Look up a header value (case-insensitive name)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response: status and body text, not yet interpreted
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends exactly one request; never retries
#[async_trait]
pub trait HttpBackend: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// reqwest-backed transport
pub struct ReqwestBackend {
    client: Client,
}

impl ReqwestBackend {
    /// Build the shared HTTP client from the client configuration
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.skip_tls_verify)
            .build()
            .map_err(|e| GatewayError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        debug!("{} {}", request.method, request.url);

        let mut builder = self.client.request(request.method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| GatewayError::RemoteTransport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::RemoteTransport(e.to_string()))?;

        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_auth_scheme_api_key_header() {
        let (name, value) = AuthScheme::ApiKeyHeader.header("secret");
        assert_eq!(name, "X-API-KEY");
        assert_eq!(value, "secret");
    }

    #[test]
    fn test_auth_scheme_bearer() {
        let (name, value) = AuthScheme::Bearer.header("secret");
        assert_eq!(name, "Authorization");
        assert_eq!(value, "Bearer secret");
    }

    #[test]
    fn test_api_response_success_range() {
        assert!(ApiResponse::new(200, "").is_success());
        assert!(ApiResponse::new(201, "").is_success());
        assert!(ApiResponse::new(204, "").is_success());
        assert!(!ApiResponse::new(301, "").is_success());
        assert!(!ApiResponse::new(404, "").is_success());
        assert!(!ApiResponse::new(500, "").is_success());
    }

    #[test]
    fn test_request_header_lookup_is_case_insensitive() {
        let request = ApiRequest {
            method: Method::GET,
            url: "https://nvr/x".to_string(),
            path: "/x".to_string(),
            headers: vec![("Accept".to_string(), "application/json".to_string())],
            body: None,
        };
        assert_eq!(request.header("accept"), Some("application/json"));
        assert_eq!(request.header("X-API-KEY"), None);
    }

    #[test]
    fn test_reqwest_backend_builds() {
        let config = ClientConfig {
            base_url: "https://192.168.1.1".to_string(),
            api_key: "key".to_string(),
            skip_tls_verify: true,
            timeout: Duration::from_secs(30),
        };
        assert!(ReqwestBackend::new(&config).is_ok());
    }
}
