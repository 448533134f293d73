//! Routes invocations to registered handlers

use std::sync::Arc;

use log::debug;

use super::arguments::Arguments;
use super::context::ToolContext;
use super::registry::ToolRegistry;
use super::result::ToolResult;
use crate::error::{GatewayError, Result};

/// One (name, arguments) request from the agent
#[derive(Debug, Clone)]
pub struct ToolInvocation {
    pub name: String,
    pub arguments: Arguments,
}

impl ToolInvocation {
    pub fn new(name: impl Into<String>, arguments: Arguments) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// Handlers see shutdown through the context's cancellation token
pub struct Dispatcher {
    registry: ToolRegistry,
    context: Arc<ToolContext>,
}

impl Dispatcher {
    pub fn new(registry: ToolRegistry, context: Arc<ToolContext>) -> Self {
        Self { registry, context }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Only a dispatch miss is an `Err`; everything else is a `ToolResult`
    pub async fn dispatch(&self, invocation: ToolInvocation) -> Result<ToolResult> {
        let tool = self
            .registry
            .get(&invocation.name)
            .ok_or_else(|| GatewayError::UnknownTool(invocation.name.clone()))?;

        if self.context.is_cancelled() {
            return Ok(ToolResult::error("Server is shutting down"));
        }

        debug!("Tool called: {}", invocation.name);
        let result = tool.handler.call(self.context.clone(), invocation.arguments).await;
        if let ToolResult::Error { message, cause } = &result {
            debug!("Tool {} failed: {} ({:?})", invocation.name, message, cause);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::tools::definition::ToolDescriptor;
    use crate::tools::registry::RegistryBuilder;
    use crate::unifi::MockBackend;
    use serde_json::json;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    async fn echo(_ctx: Arc<ToolContext>, args: Arguments) -> ToolResult {
        match args.required_str("text") {
            Ok(text) => ToolResult::success(json!({ "text": text })),
            Err(e) => e.into(),
        }
    }

    /// Waits on a remote call that never answers
    async fn stall(ctx: Arc<ToolContext>, _args: Arguments) -> ToolResult {
        match ctx.until_cancelled(std::future::pending::<crate::error::Result<()>>()).await {
            Ok(()) => ToolResult::success(json!({})),
            Err(e) => ToolResult::error_with_cause("Stalled call ended", e),
        }
    }

    fn dispatcher(cancel: CancellationToken) -> Dispatcher {
        let config = ClientConfig {
            base_url: "https://nvr".to_string(),
            api_key: "key".to_string(),
            skip_tls_verify: false,
            timeout: Duration::from_secs(30),
        };
        let context = Arc::new(ToolContext::new(&config, Arc::new(MockBackend::new()), cancel));
        let mut builder = RegistryBuilder::new();
        builder.register(ToolDescriptor::new("echo", "Echo"), echo).unwrap();
        builder.register(ToolDescriptor::new("stall", "Never finishes"), stall).unwrap();
        Dispatcher::new(builder.build(), context)
    }

    #[tokio::test]
    async fn test_dispatch_routes_by_name() {
        let dispatcher = dispatcher(CancellationToken::new());
        let mut args = crate::unifi::models::JsonObject::new();
        args.insert("text".to_string(), json!("hi"));

        let result = dispatcher
            .dispatch(ToolInvocation::new("echo", args.into()))
            .await
            .unwrap();
        assert_eq!(result, ToolResult::success(json!({"text": "hi"})));
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool() {
        let dispatcher = dispatcher(CancellationToken::new());
        let err = dispatcher
            .dispatch(ToolInvocation::new("nonexistent_tool", Arguments::default()))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::UnknownTool(ref name) if name == "nonexistent_tool"));
    }

    #[tokio::test]
    async fn test_handler_errors_are_results() {
        let dispatcher = dispatcher(CancellationToken::new());
        let result = dispatcher
            .dispatch(ToolInvocation::new("echo", Arguments::default()))
            .await
            .unwrap();
        assert_eq!(result, ToolResult::error("Missing required parameter: text"));
    }

    #[tokio::test]
    async fn test_cancelled_dispatch_refuses() {
        let cancel = CancellationToken::new();
        let dispatcher = dispatcher(cancel.clone());
        cancel.cancel();

        let result = dispatcher
            .dispatch(ToolInvocation::new("echo", Arguments::default()))
            .await
            .unwrap();
        assert_eq!(result, ToolResult::error("Server is shutting down"));
    }

    #[tokio::test]
    async fn test_in_flight_handler_observes_cancellation() {
        let cancel = CancellationToken::new();
        let dispatcher = Arc::new(dispatcher(cancel.clone()));

        let running = dispatcher.clone();
        let call = tokio::spawn(async move {
            running
                .dispatch(ToolInvocation::new("stall", Arguments::default()))
                .await
                .unwrap()
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();

        let result = tokio::time::timeout(Duration::from_secs(5), call)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result, ToolResult::error_with_cause("Stalled call ended", "Server is shutting down"));
    }
}
