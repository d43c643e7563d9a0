// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `WsBridgeService` — accepts websocket connections and bridges them onto
//! the bus: inbound frames are republished as `ws://inbound<path>`, and
//! anything published to `ws://outbound<path>` is forwarded back down the
//! socket.
//!
//! Grounded on `original_source/src/magic_foundation/websocket_service.py`:
//! same topic-naming convention and the same "one subscription per
//! connection, torn down when the connection closes" shape. One
//! deliberate deviation from the Python original: the inbound-read loop
//! there is a detached `asyncio.Task`; here it runs as a plain future
//! polled alongside its siblings in a `FuturesUnordered` inside `run`
//! rather than via `tokio::spawn`, because `ctx: &dyn ServiceContext`
//! isn't `'static` and `spawn` requires it to be. Concurrency across
//! connections is preserved; only the detachment mechanism differs.

use async_trait::async_trait;
use futures_util::stream::{FuturesUnordered, StreamExt};
use futures_util::{future::BoxFuture, SinkExt};
use harbor_core::service::LifecycleCell;
use harbor_core::{payload, Handler, Payload, Service, ServiceContext, ServiceState, ServiceStepError};
use parking_lot::Mutex as SyncMutex;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex as AsyncMutex;
use tokio_tungstenite::tungstenite::handshake::server::{Request, Response};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::accept_hdr_async;

/// A websocket bridge bound to `host:port`. Stateless beyond its own
/// lifecycle — every connection owns its own subscription and is torn down
/// independently when the socket closes.
pub struct WsBridgeService {
    lifecycle: LifecycleCell,
    host: String,
    port: u16,
}

impl WsBridgeService {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self { lifecycle: LifecycleCell::new(), host: host.into(), port }
    }

    async fn handle_connection(&self, stream: TcpStream, peer: SocketAddr, ctx: &dyn ServiceContext) {
        let path_holder: Arc<SyncMutex<String>> = Arc::new(SyncMutex::new(String::new()));
        let path_cb = path_holder.clone();
        let callback = move |request: &Request, response: Response| {
            *path_cb.lock() = request.uri().path().to_string();
            Ok(response)
        };

        let ws_stream = match accept_hdr_async(stream, callback).await {
            Ok(stream) => stream,
            Err(error) => {
                tracing::warn!(%peer, %error, "ws handshake failed");
                return;
            }
        };

        let path = path_holder.lock().clone();
        let inbound_topic = format!("ws://inbound{path}");
        let outbound_topic = format!("ws://outbound{path}");
        tracing::debug!(%peer, %path, "ws connection established");

        let (write, mut read) = ws_stream.split();
        let write = Arc::new(AsyncMutex::new(write));

        let outbound_write = write.clone();
        let handler: Handler = Arc::new(move |data: Payload| {
            let write = outbound_write.clone();
            Box::pin(async move {
                let text = data.as_str().map(str::to_string).unwrap_or_else(|| data.to_string());
                let mut guard = write.lock().await;
                if let Err(error) = guard.send(Message::Text(text.into())).await {
                    tracing::debug!(%error, "ws outbound send failed");
                }
            })
        });

        let handler_id = ctx.subscribe(&outbound_topic, handler).await;

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    ctx.publish(&inbound_topic, payload(serde_json::Value::String(text.to_string()))).await;
                }
                Ok(Message::Close(frame)) => {
                    tracing::debug!(%peer, ?frame, "ws close frame");
                    break;
                }
                Ok(_) => {}
                Err(error) => {
                    tracing::debug!(%peer, %error, "ws inbound error");
                    break;
                }
            }
        }

        ctx.unsubscribe(&outbound_topic, handler_id).await;
        tracing::debug!(%peer, %path, "ws connection closed");
    }
}

#[async_trait]
impl Service for WsBridgeService {
    fn name(&self) -> &str {
        "ws-bridge"
    }

    fn lifecycle(&self) -> &LifecycleCell {
        &self.lifecycle
    }

    async fn initialize(&self, _ctx: &dyn ServiceContext) -> Result<(), ServiceStepError> {
        tracing::info!(host = %self.host, port = self.port, "ws bridge initialize");
        Ok(())
    }

    async fn run(&self, ctx: &dyn ServiceContext) -> Result<(), ServiceStepError> {
        let listener = TcpListener::bind((self.host.as_str(), self.port)).await?;
        tracing::info!(host = %self.host, port = self.port, "ws bridge listening");

        let mut connections: FuturesUnordered<BoxFuture<'_, ()>> = FuturesUnordered::new();

        while self.state() == ServiceState::Running {
            tokio::select! {
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => connections.push(Box::pin(self.handle_connection(stream, peer, ctx))),
                        Err(error) => tracing::warn!(%error, "ws accept failed"),
                    }
                }
                Some(()) = connections.next(), if !connections.is_empty() => {}
                _ = tokio::time::sleep(Duration::from_millis(200)) => {}
            }
        }

        Ok(())
    }

    async fn terminate(&self, _ctx: &dyn ServiceContext) -> Result<(), ServiceStepError> {
        tracing::info!(host = %self.host, port = self.port, "ws bridge terminate");
        Ok(())
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
