// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service lifecycle: the state machine and the two free functions
//! (`start`/`stop`) that drive it.
//!
//! A service's own `run` step is expected to loop on `self.state() ==
//! ServiceState::Running`; setting `Terminated` before calling `terminate`
//! is what makes that loop observe the shutdown and exit (see §4.1 of
//! SPEC_FULL.md).

use crate::context::ServiceContext;
use crate::error::ServiceStepError;
use async_trait::async_trait;
use parking_lot::Mutex;

/// Lifecycle state of a [`Service`]. Transitions strictly forward:
///
/// ```text
/// Uninitialized -> Initialized -> Running -> Terminated
///                                        \-> Error (from any step, any time)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Uninitialized,
    Initialized,
    Running,
    Terminated,
    Error,
}

crate::simple_display! {
    ServiceState {
        Uninitialized => "uninitialized",
        Initialized => "initialized",
        Running => "running",
        Terminated => "terminated",
        Error => "error",
    }
}

/// Interior-mutable holder for a service's [`ServiceState`].
///
/// A plain `parking_lot::Mutex` rather than an atomic bit-pack: the state
/// only ever changes at `start`/`stop` transition points, never on a hot
/// path, so the simpler representation wins.
#[derive(Debug)]
pub struct LifecycleCell(Mutex<ServiceState>);

impl Default for LifecycleCell {
    fn default() -> Self {
        Self(Mutex::new(ServiceState::Uninitialized))
    }
}

impl LifecycleCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> ServiceState {
        *self.0.lock()
    }

    pub fn set(&self, state: ServiceState) {
        *self.0.lock() = state;
    }
}

/// A long-lived entity hosted by a pool. Concrete services implement this
/// trait; dispatch holds them behind `Arc<dyn Service>` — the one place in
/// this repo dynamic dispatch is used by design, mirroring how the rest of
/// the system keeps every other seam monomorphic.
#[async_trait]
pub trait Service: Send + Sync + 'static {
    /// Human-readable name, used in logs and diagnostics.
    fn name(&self) -> &str;

    /// The cell backing this service's [`ServiceState`]. Implementors
    /// typically just return a reference to a `LifecycleCell` field.
    fn lifecycle(&self) -> &LifecycleCell;

    /// Current lifecycle state.
    fn state(&self) -> ServiceState {
        self.lifecycle().get()
    }

    async fn initialize(&self, ctx: &dyn ServiceContext) -> Result<(), ServiceStepError>;
    async fn run(&self, ctx: &dyn ServiceContext) -> Result<(), ServiceStepError>;
    async fn terminate(&self, ctx: &dyn ServiceContext) -> Result<(), ServiceStepError>;
}

/// Drive one service through `initialize` (if uninitialized) and into `run`
/// (if initialized). A fresh service therefore passes through both
/// transitions in a single `start` call. Any step failure sets state to
/// `Error`, is logged, and does not propagate — siblings are unaffected.
pub async fn start(service: &dyn Service, ctx: &dyn ServiceContext) {
    if service.state() == ServiceState::Uninitialized {
        service.lifecycle().set(ServiceState::Initialized);
        tracing::debug!(service = service.name(), "initializing");
        if let Err(error) = service.initialize(ctx).await {
            service.lifecycle().set(ServiceState::Error);
            tracing::error!(service = service.name(), %error, "initialize step failed");
        }
    }

    if service.state() == ServiceState::Initialized {
        service.lifecycle().set(ServiceState::Running);
        tracing::debug!(service = service.name(), "running");
        if let Err(error) = service.run(ctx).await {
            service.lifecycle().set(ServiceState::Error);
            tracing::error!(service = service.name(), %error, "run step failed");
        }
    }
}

/// Drive one service's shutdown: if it reached `Running`, mark it
/// `Terminated` (so its own `run` loop observes the transition) and invoke
/// `terminate`. Failures set `Error` and are swallowed.
pub async fn stop(service: &dyn Service, ctx: &dyn ServiceContext) {
    if service.state() == ServiceState::Running {
        service.lifecycle().set(ServiceState::Terminated);
        tracing::debug!(service = service.name(), "terminating");
        if let Err(error) = service.terminate(ctx).await {
            service.lifecycle().set(ServiceState::Error);
            tracing::error!(service = service.name(), %error, "terminate step failed");
        }
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
