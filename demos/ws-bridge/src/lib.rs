// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! harbor-ws-bridge: a companion service that bridges websocket traffic
//! onto the bus, republishing inbound frames as `ws://inbound<path>` and
//! forwarding anything published to `ws://outbound<path>` back out the
//! socket. Consumes only the public `harbor_core::Service` /
//! `ServiceContext` surface.

pub mod service;

pub use service::WsBridgeService;
