// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A pool's cooperative scheduler handle.
//!
//! Each pool drives a private single-threaded Tokio runtime
//! (`new_current_thread`), so every task spawned through that runtime's
//! [`tokio::runtime::Handle`] runs on exactly one OS thread — the pool's
//! worker thread — no matter which thread called `spawn`. That's the whole
//! mechanism behind "route cross-pool queue puts through the owning pool's
//! scheduler": a `SchedulerHandle` is just a cloneable, `Send + Sync` wrapper
//! around that `Handle`.

use std::future::Future;

#[derive(Clone)]
pub struct SchedulerHandle(tokio::runtime::Handle);

impl SchedulerHandle {
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self(handle)
    }

    /// Submit `fut` to run on this scheduler's owning thread and await its
    /// completion. Used by the bus to hand a cross-pool publish off to the
    /// target pool rather than mutating its queue directly. Returns `None`
    /// if the submitted task panicked or the runtime was already shutting
    /// down — the caller logs and moves on rather than treating it as fatal.
    pub async fn submit<F, T>(&self, fut: F) -> Option<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        self.0.spawn(fut).await.ok()
    }

    /// Spawn `fut` on this scheduler without waiting for it — used for
    /// same-pool work (starting a service, dispatching a handler) where the
    /// caller is already running on this scheduler and has no need to await
    /// the submission round trip.
    pub fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.0.spawn(fut);
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
