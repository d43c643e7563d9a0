// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `FileSinkService` — subscribes to a topic and appends every payload it
//! receives to a file as a JSON line, flushing on a timer.
//!
//! Grounded on `original_source/src/magic_foundation/logging_service.py`:
//! same topic-naming convention (`log://<path>`), same "subscribe once in
//! `run`, flush on an interval, unsubscribe in `terminate`" shape. The
//! `aiofiles` append-mode writer becomes a `tokio::fs::File` opened with
//! `OpenOptions::append(true)`.

use async_trait::async_trait;
use harbor_core::service::LifecycleCell;
use harbor_core::{Handler, HandlerId, Payload, Service, ServiceContext, ServiceState, ServiceStepError};
use parking_lot::Mutex as SyncMutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex as AsyncMutex;

/// Appends every payload published on `log://{file_path}` to `file_path`,
/// one JSON value per line, flushing every `flush_interval`.
pub struct FileSinkService {
    lifecycle: LifecycleCell,
    file_path: PathBuf,
    flush_interval: Duration,
    topic: String,
    writer: Arc<AsyncMutex<Option<File>>>,
    subscription: SyncMutex<Option<HandlerId>>,
}

impl FileSinkService {
    pub fn new(file_path: impl Into<PathBuf>, flush_interval: Duration) -> Self {
        let file_path = file_path.into();
        let topic = format!("log://{}", file_path.display());
        Self {
            lifecycle: LifecycleCell::new(),
            file_path,
            flush_interval,
            topic,
            writer: Arc::new(AsyncMutex::new(None)),
            subscription: SyncMutex::new(None),
        }
    }

    fn append_handler(&self) -> Handler {
        let writer = self.writer.clone();
        let path = self.file_path.clone();
        Arc::new(move |data: Payload| {
            let writer = writer.clone();
            let path = path.clone();
            Box::pin(async move {
                let mut line = data.to_string();
                line.push('\n');
                let mut guard = writer.lock().await;
                if let Some(file) = guard.as_mut() {
                    if let Err(error) = file.write_all(line.as_bytes()).await {
                        tracing::error!(path = %path.display(), %error, "file sink write failed");
                    }
                }
            })
        })
    }
}

#[async_trait]
impl Service for FileSinkService {
    fn name(&self) -> &str {
        "file-sink"
    }

    fn lifecycle(&self) -> &LifecycleCell {
        &self.lifecycle
    }

    async fn initialize(&self, _ctx: &dyn ServiceContext) -> Result<(), ServiceStepError> {
        tracing::info!(path = %self.file_path.display(), "file sink initialize");
        let file = OpenOptions::new().append(true).create(true).open(&self.file_path).await?;
        *self.writer.lock().await = Some(file);
        Ok(())
    }

    async fn run(&self, ctx: &dyn ServiceContext) -> Result<(), ServiceStepError> {
        tracing::info!(path = %self.file_path.display(), topic = %self.topic, "file sink run");
        let handler_id = ctx.subscribe(&self.topic, self.append_handler()).await;
        *self.subscription.lock() = Some(handler_id);

        while self.state() == ServiceState::Running {
            tracing::debug!(path = %self.file_path.display(), "file sink flush");
            {
                let mut guard = self.writer.lock().await;
                if let Some(file) = guard.as_mut() {
                    file.flush().await?;
                }
            }
            tokio::time::sleep(self.flush_interval).await;
        }
        Ok(())
    }

    async fn terminate(&self, ctx: &dyn ServiceContext) -> Result<(), ServiceStepError> {
        tracing::info!(path = %self.file_path.display(), "file sink terminate");
        if let Some(handler_id) = self.subscription.lock().take() {
            ctx.unsubscribe(&self.topic, handler_id).await;
        }
        let mut guard = self.writer.lock().await;
        if let Some(file) = guard.as_mut() {
            file.flush().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
