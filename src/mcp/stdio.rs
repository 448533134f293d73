//! stdio transport - newline-delimited JSON-RPC on stdin/stdout
//!
//! Requests are handled concurrently; each response is written as soon as it
//! is ready, so responses may arrive out of request order.

use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::codec::{FramedRead, FramedWrite};
use tokio_util::sync::CancellationToken;

use super::codec::NdJsonCodec;
use super::messages::RpcResponse;
use super::server::McpServer;
use crate::error::{GatewayError, Result};

/// Responses queued for the writer
const RESPONSE_CHANNEL_CAPACITY: usize = 64;

/// Serve the process's stdin/stdout until EOF or cancellation
pub async fn serve_stdio(server: Arc<McpServer>, cancel: CancellationToken) -> Result<()> {
    info!("Serving MCP over stdio");
    serve_stream(server, tokio::io::stdin(), tokio::io::stdout(), cancel).await
}

/// Serve one byte stream pair
pub async fn serve_stream<R, W>(server: Arc<McpServer>, reader: R, writer: W, cancel: CancellationToken) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let mut lines = FramedRead::new(reader, NdJsonCodec::<Value>::new());
    let (tx, rx) = mpsc::channel::<RpcResponse>(RESPONSE_CHANNEL_CAPACITY);
    let writer_task = tokio::spawn(write_responses(writer, rx));
    let mut in_flight = JoinSet::new();

    let read_result = loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => {
                info!("Shutdown requested, no longer reading requests");
                break Ok(());
            }
            next = lines.next() => next,
        };

        match next {
            None => {
                debug!("Input closed");
                break Ok(());
            }
            Some(Err(e)) => {
                error!("Failed to read request: {}", e);
                break Err(GatewayError::Io(e));
            }
            Some(Ok(Err(e))) => {
                warn!("Malformed request line: {}", e);
                if tx.send(RpcResponse::parse_error(format!("Parse error: {}", e))).await.is_err() {
                    break Err(GatewayError::Server("response writer stopped".to_string()));
                }
            }
            Some(Ok(Ok(message))) => {
                let server = server.clone();
                let tx = tx.clone();
                in_flight.spawn(async move {
                    let Some(response) = server.handle_value(message).await else {
                        return;
                    };
                    if tx.send(response).await.is_err() {
                        warn!("Dropped response, writer has stopped");
                    }
                });
            }
        }

        while in_flight.try_join_next().is_some() {}
    };

    let pending = in_flight.len();
    if pending > 0 {
        debug!("Waiting for {} in-flight requests", pending);
    }
    while in_flight.join_next().await.is_some() {}

    drop(tx);
    writer_task
        .await
        .map_err(|e| GatewayError::Server(format!("response writer panicked: {}", e)))??;

    read_result
}

async fn write_responses<W>(writer: W, mut rx: mpsc::Receiver<RpcResponse>) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut sink = FramedWrite::new(writer, NdJsonCodec::<RpcResponse>::new());
    while let Some(response) = rx.recv().await {
        sink.send(response).await?;
    }
    Ok(())
}
