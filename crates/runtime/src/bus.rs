// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The process-wide subscription registry and delivery routing.
//!
//! One [`Bus`] is shared (behind an `Arc`) by every pool in the process. Its
//! registry maps topic name to, per subscribing pool thread, that pool's
//! inbound sender and its ordered list of `(HandlerId, Handler)` pairs.
//! Mutated from any pool's thread, it is guarded by a single
//! `parking_lot::Mutex` — dispatch always snapshots the handler list under
//! the lock and releases it before invoking anything, so a concurrent
//! unsubscribe can prune future deliveries without touching in-flight ones.

use crate::scheduler::SchedulerHandle;
use harbor_core::{Event, Handler, HandlerId, Payload};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::ThreadId;
use tokio::sync::mpsc::UnboundedSender;

/// One pool's slot under a topic: where to enqueue, how to reach that pool's
/// scheduler, and which handlers fire on delivery.
struct SubscriberSlot {
    sender: UnboundedSender<Event>,
    scheduler: SchedulerHandle,
    handlers: Vec<(HandlerId, Handler)>,
}

#[derive(Default)]
struct Registry {
    topics: HashMap<String, HashMap<ThreadId, SubscriberSlot>>,
}

pub struct Bus {
    registry: Mutex<Registry>,
    next_handler_id: AtomicU64,
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus {
    pub fn new() -> Self {
        Self { registry: Mutex::new(Registry::default()), next_handler_id: AtomicU64::new(0) }
    }

    /// Deliver `payload` under `topic` to every subscribed pool. A local
    /// delivery (the caller's own `from` thread) is a direct send; every
    /// other target is routed through that pool's scheduler so the queue
    /// mutation happens on the owning thread, per §4.3 of SPEC_FULL.md.
    pub async fn publish(&self, from: ThreadId, topic: &str, payload: Payload) {
        let targets: Vec<(ThreadId, UnboundedSender<Event>, SchedulerHandle)> = {
            let registry = self.registry.lock();
            match registry.topics.get(topic) {
                Some(slots) => {
                    slots.iter().map(|(tid, slot)| (*tid, slot.sender.clone(), slot.scheduler.clone())).collect()
                }
                None => return,
            }
        };

        for (thread_id, sender, scheduler) in targets {
            let event = Event::new(topic, payload.clone());
            if thread_id == from {
                if sender.send(event).is_err() {
                    tracing::warn!(topic, "inbound queue closed while publishing locally");
                }
                continue;
            }

            if scheduler.submit(async move { sender.send(event) }).await.is_none() {
                tracing::warn!(topic, "cross-pool publish submission did not complete");
            }
        }
    }

    /// Register `handler` under `topic` for the pool identified by
    /// `thread_id`. Creates the topic and/or the pool's slot if either is
    /// missing. Returns the minted id.
    pub fn subscribe(
        &self,
        thread_id: ThreadId,
        sender: UnboundedSender<Event>,
        scheduler: SchedulerHandle,
        topic: &str,
        handler: Handler,
    ) -> HandlerId {
        let id = HandlerId::new(self.next_handler_id.fetch_add(1, Ordering::Relaxed));
        let mut registry = self.registry.lock();
        let slot = registry
            .topics
            .entry(topic.to_string())
            .or_default()
            .entry(thread_id)
            .or_insert_with(|| SubscriberSlot { sender, scheduler, handlers: Vec::new() });
        slot.handlers.push((id, handler));
        id
    }

    /// Remove `handler_id` from every pool's slot under `topic` — a
    /// process-wide scan by identity, not limited to the caller's own pool.
    /// Slots left with no handlers are pruned.
    pub fn unsubscribe(&self, topic: &str, handler_id: HandlerId) {
        let mut registry = self.registry.lock();
        if let Some(slots) = registry.topics.get_mut(topic) {
            slots.retain(|_, slot| {
                slot.handlers.retain(|(id, _)| *id != handler_id);
                !slot.handlers.is_empty()
            });
        }
    }

    /// Snapshot of the handlers registered for `topic` under `thread_id`, in
    /// registration order. Taken under the lock, returned by value so
    /// dispatch can invoke handlers without holding it.
    pub fn handlers_for(&self, thread_id: ThreadId, topic: &str) -> Vec<(HandlerId, Handler)> {
        let registry = self.registry.lock();
        registry.topics.get(topic).and_then(|slots| slots.get(&thread_id)).map(|slot| slot.handlers.clone()).unwrap_or_default()
    }

    /// Human-readable snapshot of the whole subscription tree, for
    /// `ServiceContext::dump_registry`. Never load-bearing.
    pub fn dump_registry(&self) -> String {
        let registry = self.registry.lock();
        let mut out = String::new();
        for (topic, slots) in registry.topics.iter() {
            let _ = writeln!(out, "{topic}");
            for (thread_id, slot) in slots.iter() {
                let _ = writeln!(out, "  {thread_id:?} ({} handlers)", slot.handlers.len());
                for (id, _) in slot.handlers.iter() {
                    let _ = writeln!(out, "    {id}");
                }
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
