// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Opaque message payloads.
//!
//! The core never parses, validates, or re-serializes a payload. It is an
//! already-owned dynamic value — `serde_json::Value`'s variants (null, bool,
//! number, string, array, object) are the "sum type of common shapes" a
//! generic payload needs, and the `Arc` wrapper lets a single `publish` fan
//! out to many subscriber slots without copying the value itself.

use std::sync::Arc;

pub type Payload = Arc<serde_json::Value>;

/// Wrap any `Serialize` value as an opaque payload.
///
/// This is the only place the core touches `serde` — it never runs the
/// reverse direction. Callers that only ever hand the core already-built
/// `serde_json::Value`s can skip this and call `Arc::new` directly.
pub fn payload(value: impl Into<serde_json::Value>) -> Payload {
    Arc::new(value.into())
}
