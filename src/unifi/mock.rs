//! In-memory `HttpBackend` that serves canned responses and records requests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use super::transport::{ApiRequest, ApiResponse, HttpBackend};
use crate::error::{GatewayError, Result};

#[derive(Debug, Clone)]
enum Canned {
    Respond(ApiResponse),
    Fail(String),
}

/// Routes are keyed by method and the request path (query string included).
/// Unrouted requests answer 404.
#[derive(Debug, Default)]
pub struct MockBackend {
    routes: Mutex<HashMap<(Method, String), Canned>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer with a JSON body
    pub fn respond(&self, method: Method, path: &str, status: u16, body: Value) {
        self.respond_text(method, path, status, body.to_string());
    }

    /// Answer with a raw text body
    pub fn respond_text(&self, method: Method, path: &str, status: u16, body: impl Into<String>) {
        self.insert(method, path, Canned::Respond(ApiResponse::new(status, body)));
    }

    /// Fail at the transport level
    pub fn fail(&self, method: Method, path: &str, cause: impl Into<String>) {
        self.insert(method, path, Canned::Fail(cause.into()));
    }

    fn insert(&self, method: Method, path: &str, canned: Canned) {
        if let Ok(mut routes) = self.routes.lock() {
            routes.insert((method, path.to_string()), canned);
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests.lock().ok().and_then(|r| r.last().cloned())
    }
}

#[async_trait]
impl HttpBackend for MockBackend {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let key = (request.method.clone(), request.path.clone());
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        let canned = self.routes.lock().ok().and_then(|routes| routes.get(&key).cloned());
        match canned {
            Some(Canned::Respond(response)) => Ok(response),
            Some(Canned::Fail(cause)) => Err(GatewayError::RemoteTransport(cause)),
            None => Ok(ApiResponse::new(404, "Not Found")),
        }
    }
}
