//! Tool handlers
//!
//! Every handler follows the same steps: extract arguments, check the key is
//! configured, make one client call, shape the payload. Each step's failure
//! short-circuits into a `ToolResult::Error`.

pub mod network;
pub mod protect;

use std::future::Future;

use log::warn;
use serde::Serialize;
use serde_json::{Map, Value};

use super::context::ToolContext;
use super::result::ToolResult;
use crate::error::Result;

/// Run a handler body, folding its early exit into the result
pub(crate) async fn outcome<F>(body: F) -> ToolResult
where
    F: Future<Output = std::result::Result<Value, ToolResult>>,
{
    match body.await {
        Ok(payload) => ToolResult::success(payload),
        Err(error) => error,
    }
}

/// Check credentials, then await one client call unless shutdown starts first
pub(crate) async fn call_remote<T, F>(
    ctx: &ToolContext,
    auth: Result<()>,
    failure: &str,
    call: F,
) -> std::result::Result<T, ToolResult>
where
    F: Future<Output = Result<T>>,
{
    auth.map_err(|e| ToolResult::error_with_cause("Authentication failed", e))?;
    ctx.until_cancelled(call).await.map_err(|e| {
        warn!("{}: {}", failure, e);
        ToolResult::error_with_cause(failure, e)
    })
}

pub(crate) fn encode<T: Serialize>(value: T) -> std::result::Result<Value, ToolResult> {
    serde_json::to_value(value).map_err(|e| ToolResult::error_with_cause("Failed to encode result", e))
}

/// `{<key>: [...], count}`
pub(crate) fn listing<T: Serialize>(key: &str, items: Vec<T>) -> std::result::Result<Value, ToolResult> {
    let count = items.len();
    let mut result = Map::new();
    result.insert(key.to_string(), encode(items)?);
    result.insert("count".to_string(), Value::from(count));
    Ok(Value::Object(result))
}

/// `{<key>: [...], count, limit, offset}`
pub(crate) fn page<T: Serialize>(
    key: &str,
    items: Vec<T>,
    limit: i64,
    offset: i64,
) -> std::result::Result<Value, ToolResult> {
    let mut result = listing(key, items)?;
    if let Some(obj) = result.as_object_mut() {
        obj.insert("limit".to_string(), Value::from(limit));
        obj.insert("offset".to_string(), Value::from(offset));
    }
    Ok(result)
}

/// Detail payload plus the identifiers that selected it
pub(crate) fn detail<T: Serialize>(
    key: &str,
    item: T,
    ids: &[(&str, &str)],
) -> std::result::Result<Value, ToolResult> {
    let mut result = Map::new();
    result.insert(key.to_string(), encode(item)?);
    for (name, value) in ids {
        result.insert(name.to_string(), Value::from(*value));
    }
    Ok(Value::Object(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::error::GatewayError;
    use crate::unifi::MockBackend;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    fn context(cancel: CancellationToken) -> ToolContext {
        let config = ClientConfig {
            base_url: "https://nvr".to_string(),
            api_key: "key".to_string(),
            skip_tls_verify: false,
            timeout: Duration::from_secs(30),
        };
        ToolContext::new(&config, Arc::new(MockBackend::new()), cancel)
    }

    #[test]
    fn test_listing_count_matches_length() {
        for n in [0usize, 1, 7] {
            let items: Vec<u32> = (0..n as u32).collect();
            let value = listing("things", items).unwrap();
            assert_eq!(value["count"], json!(n));
            assert_eq!(value["things"].as_array().unwrap().len(), n);
        }
    }

    #[test]
    fn test_page_echoes_pagination() {
        let value = page("events", Vec::<u32>::new(), 50, 0).unwrap();
        assert_eq!(value, json!({"events": [], "count": 0, "limit": 50, "offset": 0}));
    }

    #[test]
    fn test_detail_carries_ids() {
        let value = detail("device", json!({"name": "ap"}), &[("site_id", "default"), ("device_id", "d1")]).unwrap();
        assert_eq!(value, json!({"device": {"name": "ap"}, "site_id": "default", "device_id": "d1"}));
    }

    #[tokio::test]
    async fn test_call_remote_auth_failure_skips_call() {
        let result = call_remote(
            &context(CancellationToken::new()),
            Err(GatewayError::Auth("API key not configured".to_string())),
            "Failed to get cameras",
            async { Ok::<_, GatewayError>(json!([])) },
        )
        .await;
        assert_eq!(
            result.unwrap_err(),
            ToolResult::error_with_cause("Authentication failed", "API key not configured")
        );
    }

    #[tokio::test]
    async fn test_call_remote_wraps_failure() {
        let result = call_remote(
            &context(CancellationToken::new()),
            Ok(()),
            "Failed to get cameras",
            async {
                Err::<Value, _>(GatewayError::RemoteRequest {
                    status: 500,
                    body: "boom".to_string(),
                })
            },
        )
        .await;
        assert_eq!(
            result.unwrap_err(),
            ToolResult::error_with_cause("Failed to get cameras", "request failed with status 500: boom")
        );
    }

    #[tokio::test]
    async fn test_call_remote_reports_shutdown() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = call_remote(
            &context(cancel),
            Ok(()),
            "Failed to get cameras",
            std::future::pending::<Result<Value>>(),
        )
        .await;
        assert_eq!(
            result.unwrap_err(),
            ToolResult::error_with_cause("Failed to get cameras", "Server is shutting down")
        );
    }

    #[tokio::test]
    async fn test_outcome() {
        assert_eq!(outcome(async { Ok(json!(1)) }).await, ToolResult::success(json!(1)));
        assert_eq!(
            outcome(async { Err(ToolResult::error("nope")) }).await,
            ToolResult::error("nope")
        );
    }
}
