// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Handler identity.
//!
//! Rust closures carry no structural identity the way a Python bound method
//! does, so `subscribe` hands back a `HandlerId` that the caller must keep
//! and pass to `unsubscribe`. Subscribing "the same" closure twice produces
//! two distinct ids (and therefore two deliveries per publish), which is the
//! Rust-shaped equivalent of the source's "duplicate subscriptions produce
//! duplicate deliveries" behaviour.

use crate::payload::Payload;
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;

/// An author-supplied callback invoked with a payload on the registering
/// pool's thread. Boxed as a trait object so services can subscribe with
/// arbitrary closures, not just named types.
pub type Handler = Arc<dyn Fn(Payload) -> BoxFuture<'static, ()> + Send + Sync>;

/// Opaque token identifying one `subscribe` call, returned so the same call
/// can later be reversed with `unsubscribe`.
///
/// Minted by whichever bus implementation backs a [`crate::context::ServiceContext`]
/// (an atomic counter, in `harbor-runtime`) — `harbor-core` only needs the
/// token to be a `Copy`, comparable, and displayable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

impl HandlerId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handler#{}", self.0)
    }
}
