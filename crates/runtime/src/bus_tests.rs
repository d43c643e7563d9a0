// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use harbor_core::payload;
use std::sync::Arc as StdArc;
use tokio::sync::mpsc::unbounded_channel;

fn local_scheduler() -> SchedulerHandle {
    SchedulerHandle::new(tokio::runtime::Handle::current())
}

fn noop_handler() -> Handler {
    StdArc::new(|_payload| Box::pin(async {}))
}

#[tokio::test]
async fn publish_to_unknown_topic_is_a_noop() {
    let bus = Bus::new();
    bus.publish(std::thread::current().id(), "q://nobody", payload(serde_json::json!(1))).await;
}

#[tokio::test]
async fn subscribe_then_local_publish_delivers_to_own_queue() {
    let bus = Bus::new();
    let (tx, mut rx) = unbounded_channel();
    let here = std::thread::current().id();

    bus.subscribe(here, tx, local_scheduler(), "q://topic", noop_handler());
    bus.publish(here, "q://topic", payload(serde_json::json!({"n": 1}))).await;

    let event = rx.recv().await.expect("event should be delivered");
    assert_eq!(event.topic, "q://topic");
    assert_eq!(event.payload.as_ref(), &serde_json::json!({"n": 1}));
}

#[tokio::test]
async fn duplicate_subscribe_yields_two_handlers_for_one_slot() {
    let bus = Bus::new();
    let (tx, _rx) = unbounded_channel();
    let here = std::thread::current().id();

    let first = bus.subscribe(here, tx.clone(), local_scheduler(), "q://dup", noop_handler());
    let second = bus.subscribe(here, tx, local_scheduler(), "q://dup", noop_handler());

    assert_ne!(first, second);
    assert_eq!(bus.handlers_for(here, "q://dup").len(), 2);
}

#[tokio::test]
async fn unsubscribe_prunes_empty_slot() {
    let bus = Bus::new();
    let (tx, _rx) = unbounded_channel();
    let here = std::thread::current().id();

    let id = bus.subscribe(here, tx, local_scheduler(), "q://prune", noop_handler());
    assert_eq!(bus.handlers_for(here, "q://prune").len(), 1);

    bus.unsubscribe("q://prune", id);
    assert!(bus.handlers_for(here, "q://prune").is_empty());
}

#[tokio::test]
async fn unsubscribe_is_process_wide_not_limited_to_caller_pool() {
    let bus = Bus::new();
    let (tx_a, _rx_a) = unbounded_channel();

    // Simulate a second pool's thread id by spawning a blocking thread.
    let other_thread = std::thread::spawn(|| std::thread::current().id()).join().expect("thread join");
    let here = std::thread::current().id();
    assert_ne!(other_thread, here);

    let id_here = bus.subscribe(here, tx_a, local_scheduler(), "q://wide", noop_handler());

    bus.unsubscribe("q://wide", id_here);
    assert!(bus.handlers_for(here, "q://wide").is_empty());
}

#[yare::parameterized(
    unknown_topic       = { "q://absent", 0 },
    topic_with_no_match = { "q://present", 1 },
)]
fn unsubscribe_of_id_not_present_is_a_noop(topic: &str, expected_remaining: usize) {
    let runtime = tokio::runtime::Runtime::new().expect("runtime");
    let bus = Bus::new();
    let (tx, _rx) = unbounded_channel();
    let here = std::thread::current().id();
    let scheduler = SchedulerHandle::new(runtime.handle().clone());

    if expected_remaining > 0 {
        bus.subscribe(here, tx, scheduler, topic, noop_handler());
    }

    bus.unsubscribe(topic, HandlerId::new(999));
    assert_eq!(bus.handlers_for(here, topic).len(), expected_remaining);
}

#[tokio::test]
async fn dump_registry_lists_topic_and_handler_count() {
    let bus = Bus::new();
    let (tx, _rx) = unbounded_channel();
    let here = std::thread::current().id();
    bus.subscribe(here, tx, local_scheduler(), "q://dump", noop_handler());

    let dump = bus.dump_registry();
    assert!(dump.contains("q://dump"));
    assert!(dump.contains("1 handlers"));
}
