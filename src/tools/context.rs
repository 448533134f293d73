//! Shared, read-only state handed to every handler

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::ClientConfig;
use crate::error::{GatewayError, Result};
use crate::unifi::{HttpBackend, NetworkClient, ProtectClient};

pub struct ToolContext {
    pub protect: ProtectClient,
    pub network: NetworkClient,
    cancel: CancellationToken,
}

impl ToolContext {
    /// Both subsystem clients over one backend, bound to the server's shutdown token
    pub fn new(config: &ClientConfig, backend: Arc<dyn HttpBackend>, cancel: CancellationToken) -> Self {
        Self {
            protect: ProtectClient::new(config, backend.clone()),
            network: NetworkClient::new(config, backend),
            cancel,
        }
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Await a remote call, abandoning it once shutdown starts
    pub async fn until_cancelled<T, F>(&self, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        tokio::select! {
            result = call => result,
            _ = self.cancel.cancelled() => Err(GatewayError::Cancelled),
        }
    }
}
