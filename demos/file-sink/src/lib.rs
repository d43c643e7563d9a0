// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! harbor-file-sink: a companion service that appends every payload
//! published on `log://<path>` to a file as a JSON line, flushing on a
//! timer. Consumes only the public `harbor_core::Service` /
//! `ServiceContext` surface — it lives outside the core crates by design.

pub mod service;

pub use service::FileSinkService;
