// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use async_trait::async_trait;
use harbor_core::payload;
use std::time::Duration;
use tempfile::tempdir;

/// A `ServiceContext` backed by real bus machinery isn't needed here — the
/// service only calls `subscribe`/`unsubscribe`, so a minimal fake that
/// records the handler and lets the test invoke it directly is enough.
struct RecordingContext {
    handler: SyncMutex<Option<Handler>>,
    unsubscribed: SyncMutex<Vec<HandlerId>>,
}

impl RecordingContext {
    fn new() -> Self {
        Self { handler: SyncMutex::new(None), unsubscribed: SyncMutex::new(Vec::new()) }
    }
}

#[async_trait]
impl ServiceContext for RecordingContext {
    async fn publish(&self, _topic: &str, _payload: Payload) {}

    async fn subscribe(&self, _topic: &str, handler: Handler) -> HandlerId {
        *self.handler.lock() = Some(handler);
        HandlerId::new(1)
    }

    async fn unsubscribe(&self, _topic: &str, handler_id: HandlerId) {
        self.unsubscribed.lock().push(handler_id);
    }

    async fn dump_registry(&self) -> String {
        String::new()
    }
}

#[tokio::test]
async fn initialize_creates_the_file() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("out.jsonl");
    let service = FileSinkService::new(&path, Duration::from_millis(10));
    let ctx = RecordingContext::new();

    service.initialize(&ctx).await.expect("initialize should succeed");
    assert!(path.exists());
}

#[tokio::test]
async fn handler_appends_json_line_and_terminate_flushes() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("out.jsonl");
    let service = FileSinkService::new(&path, Duration::from_secs(60));
    let ctx = RecordingContext::new();

    service.initialize(&ctx).await.expect("initialize should succeed");
    let handler = service.append_handler();
    handler(payload(serde_json::json!({"index": 0}))).await;
    handler(payload(serde_json::json!({"index": 1}))).await;

    service.terminate(&ctx).await.expect("terminate should succeed");

    let contents = std::fs::read_to_string(&path).expect("read sink file");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines, vec![r#"{"index":0}"#, r#"{"index":1}"#]);
}

#[tokio::test]
async fn terminate_unsubscribes_the_handler_that_was_registered() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("out.jsonl");
    let service = FileSinkService::new(&path, Duration::from_millis(10));
    let ctx = RecordingContext::new();

    service.initialize(&ctx).await.expect("initialize should succeed");
    let id = ctx.subscribe(&service.topic, service.append_handler()).await;
    *service.subscription.lock() = Some(id);

    service.terminate(&ctx).await.expect("terminate should succeed");
    assert_eq!(ctx.unsubscribed.lock().as_slice(), [id]);
}
