// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-service context facade.
//!
//! `ServiceContext` is defined here as a trait, not a struct, because its
//! real implementation (`harbor-runtime::context::PoolContext`) needs to know
//! about the owning pool's thread id, scheduler handle, and the shared bus —
//! none of which `harbor-core` has any business depending on. A `Service`
//! only needs to know it can `publish`/`subscribe`/`unsubscribe`/`dump_registry`;
//! this trait is the seam between the two crates.

use crate::event::Event;
use crate::handler::{Handler, HandlerId};
use crate::payload::Payload;
use async_trait::async_trait;

#[async_trait]
pub trait ServiceContext: Send + Sync {
    /// Publish `payload` under `topic`. A no-op if nobody subscribes to
    /// `topic`. Never fails: a publish that reaches no subscribers, or whose
    /// subscribers later error, is indistinguishable from a quiet success.
    async fn publish(&self, topic: &str, payload: Payload);

    /// Register `handler` against `topic` from this context's owning pool.
    /// Returns the id needed to reverse the subscription later. Subscribing
    /// twice — even with "the same" closure — registers two independent
    /// deliveries.
    async fn subscribe(&self, topic: &str, handler: Handler) -> HandlerId;

    /// Remove the handler identified by `handler_id` from `topic`, searching
    /// every pool's slot under that topic (not just the caller's own pool).
    async fn unsubscribe(&self, topic: &str, handler_id: HandlerId);

    /// A human-readable snapshot of the whole subscription tree, for
    /// debugging. Never used for anything load-bearing.
    async fn dump_registry(&self) -> String;
}

/// Convenience used by services that want to publish a pre-built [`Event`]
/// rather than a bare `(topic, payload)` pair.
pub async fn publish_event(ctx: &dyn ServiceContext, event: Event) {
    ctx.publish(&event.topic, event.payload).await;
}
