// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The pool container: one dedicated OS thread, one private current-thread
//! Tokio runtime acting as its cooperative scheduler, one inbound queue, and
//! the services it starts and stops.

use crate::bus::Bus;
use crate::context::PoolContext;
use crate::scheduler::SchedulerHandle;
use harbor_core::service::{start, stop};
use harbor_core::{Event, Service, ServiceContext};
use std::io;
use std::sync::Arc;
use std::thread::{self, ThreadId};
use tokio::sync::mpsc;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

/// An unstarted pool: a key and its ordered service list.
pub struct Pool {
    key: String,
    services: Vec<Arc<dyn Service>>,
}

impl Pool {
    pub fn new(key: impl Into<String>, services: Vec<Arc<dyn Service>>) -> Self {
        Self { key: key.into(), services }
    }

    /// Spawn this pool's worker thread and return a handle used to signal
    /// shutdown and join it. The thread builds its own runtime, starts every
    /// service, runs inbound dispatch, and tears down cleanly on `stop()`.
    pub fn spawn(self, bus: Arc<Bus>) -> io::Result<PoolHandle> {
        let shutdown = Arc::new(Notify::new());
        let shutdown_for_thread = shutdown.clone();
        let key = self.key.clone();
        let services = self.services;

        let thread = thread::Builder::new()
            .name(key.clone())
            .spawn(move || run_pool_thread(key, services, bus, shutdown_for_thread))?;

        Ok(PoolHandle { thread: Some(thread), shutdown })
    }
}

/// Handle to a running pool, held by the orchestrator.
pub struct PoolHandle {
    thread: Option<thread::JoinHandle<()>>,
    shutdown: Arc<Notify>,
}

impl PoolHandle {
    /// Signal this pool to begin its shutdown sequence. Does not block;
    /// call [`PoolHandle::join`] to wait for the worker thread to exit.
    pub fn stop(&self) {
        self.shutdown.notify_one();
    }

    /// Block until the pool's worker thread has exited. Its `stop()`
    /// sequence (§4.2) has already run to completion by the time this
    /// returns.
    pub fn join(mut self) {
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::error!("pool worker thread panicked");
            }
        }
    }
}

fn run_pool_thread(key: String, services: Vec<Arc<dyn Service>>, bus: Arc<Bus>, shutdown: Arc<Notify>) {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            tracing::error!(pool = %key, %error, "failed to build pool runtime");
            return;
        }
    };

    let thread_id = thread::current().id();
    let scheduler = SchedulerHandle::new(runtime.handle().clone());
    let (sender, receiver) = mpsc::unbounded_channel::<Event>();
    let ctx: Arc<dyn ServiceContext> =
        Arc::new(PoolContext::new(thread_id, sender, scheduler.clone(), bus.clone()));

    runtime.block_on(async {
        tracing::info!(pool = %key, services = services.len(), "starting pool");
        // Spawned, not awaited: `run()` stays active for as long as the
        // service is `Running`, so awaiting it here would never return.
        for service in services.iter() {
            let ctx = ctx.clone();
            let service = service.clone();
            scheduler.spawn(async move {
                start(service.as_ref(), ctx.as_ref()).await;
            });
        }

        let cancel = CancellationToken::new();
        let dispatch = tokio::spawn(dispatch_loop(key.clone(), thread_id, receiver, bus.clone(), cancel.clone()));

        shutdown.notified().await;
        tracing::info!(pool = %key, "shutdown requested, cancelling dispatch");
        cancel.cancel();
        if dispatch.await.is_err() {
            tracing::error!(pool = %key, "dispatch task panicked");
        }

        tracing::info!(pool = %key, "stopping services in reverse order");
        futures::future::join_all(services.iter().rev().map(|service| {
            let ctx = ctx.clone();
            let service = service.clone();
            async move { stop(service.as_ref(), ctx.as_ref()).await }
        }))
        .await;
    });

    tracing::info!(pool = %key, "pool thread exiting");
}

async fn dispatch_loop(
    key: String,
    thread_id: ThreadId,
    mut receiver: mpsc::UnboundedReceiver<Event>,
    bus: Arc<Bus>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!(pool = %key, "dispatch loop cancelled");
                return;
            }
            event = receiver.recv() => {
                match event {
                    Some(event) => deliver(&key, thread_id, &bus, event),
                    None => {
                        let error = harbor_core::DispatchError::ChannelClosed;
                        tracing::error!(pool = %key, %error, "dispatch loop exiting");
                        return;
                    }
                }
            }
        }
    }
}

fn deliver(key: &str, thread_id: ThreadId, bus: &Bus, event: Event) {
    let handlers = bus.handlers_for(thread_id, &event.topic);
    if handlers.is_empty() {
        return;
    }
    for (handler_id, handler) in handlers {
        let payload = event.payload.clone();
        tracing::trace!(pool = key, handler = %handler_id, topic = %event.topic, "dispatching");
        tokio::spawn(async move {
            handler(payload).await;
        });
    }
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod tests;
