// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The message envelope routed by the bus.

use crate::payload::Payload;
use std::fmt;

/// A single published message. Immutable after construction; never shared
/// across pool queues by reference — each target pool receives its own
/// `Event`, though the underlying [`Payload`] is reference-counted so the
/// value itself is never copied.
#[derive(Debug, Clone)]
pub struct Event {
    pub topic: String,
    pub payload: Payload,
}

impl Event {
    pub fn new(topic: impl Into<String>, payload: Payload) -> Self {
        Self { topic: topic.into(), payload }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <- {}", self.topic, self.payload)
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
