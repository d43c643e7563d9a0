// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for the service host.
//!
//! Errors are isolated at the boundary that produced them: a `ServiceStepError`
//! never escapes `start`/`stop`, a `DispatchError` never escapes a pool's
//! inbound dispatch loop. Only `ConfigError` is meant to surface to a caller.

use thiserror::Error;

/// An author-supplied `initialize`/`run`/`terminate` step failed.
///
/// Caught at the pool boundary: the failing service's state becomes
/// [`crate::service::ServiceState::Error`] and the error is logged, but it
/// never propagates past `start`/`stop` so sibling services are unaffected.
#[derive(Debug, Error)]
pub enum ServiceStepError {
    #[error("{0}")]
    Other(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServiceStepError {
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

/// An unexpected failure inside a pool's inbound dispatch loop.
///
/// Logged and fatal to that pool's dispatch task only: the pool's services
/// keep running (they may still publish), but no further inbound events are
/// delivered to them.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("inbound channel for pool closed unexpectedly")]
    ChannelClosed,
}

/// Misuse at construction time. Raised synchronously to the orchestrator's caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Orchestrator is a singleton and has already been constructed")]
    AlreadyConstructed,

    #[error("Orchestrator::run() called with no pools configured")]
    NoPools,
}
