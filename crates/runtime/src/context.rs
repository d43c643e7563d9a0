// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The concrete [`ServiceContext`] implementation handed to every service
//! step. Thin and `Clone`-able: it just closes over the identity (thread id,
//! scheduler, inbound sender) a pool needs the bus to route against.

use crate::scheduler::SchedulerHandle;
use crate::Bus;
use async_trait::async_trait;
use harbor_core::{Handler, HandlerId, Payload, ServiceContext};
use std::sync::Arc;
use std::thread::ThreadId;
use tokio::sync::mpsc::UnboundedSender;

#[derive(Clone)]
pub struct PoolContext {
    thread_id: ThreadId,
    sender: UnboundedSender<harbor_core::Event>,
    scheduler: SchedulerHandle,
    bus: Arc<Bus>,
}

impl PoolContext {
    pub fn new(
        thread_id: ThreadId,
        sender: UnboundedSender<harbor_core::Event>,
        scheduler: SchedulerHandle,
        bus: Arc<Bus>,
    ) -> Self {
        Self { thread_id, sender, scheduler, bus }
    }
}

#[async_trait]
impl ServiceContext for PoolContext {
    async fn publish(&self, topic: &str, payload: Payload) {
        self.bus.publish(self.thread_id, topic, payload).await;
    }

    async fn subscribe(&self, topic: &str, handler: Handler) -> HandlerId {
        self.bus.subscribe(self.thread_id, self.sender.clone(), self.scheduler.clone(), topic, handler)
    }

    async fn unsubscribe(&self, topic: &str, handler_id: HandlerId) {
        self.bus.unsubscribe(topic, handler_id);
    }

    async fn dump_registry(&self) -> String {
        self.bus.dump_registry()
    }
}
