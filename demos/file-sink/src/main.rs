// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Standalone entry point running a single `FileSinkService` in a single
//! pool. The file path and flush interval are read from the environment so
//! this binary needs no CLI argument parser of its own (out of scope per
//! §6 of SPEC_FULL.md — only the core defines no CLI; this demo may take a
//! minimal one, and env vars are the minimal one).

use harbor_file_sink::FileSinkService;
use harbor_runtime::Orchestrator;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let file_path = std::env::var("HARBOR_SINK_PATH").unwrap_or_else(|_| "harbor-sink.jsonl".to_string());
    let flush_interval_secs: u64 =
        std::env::var("HARBOR_SINK_FLUSH_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(5);

    let mut orchestrator = Orchestrator::new()?;
    orchestrator.pools.insert(
        "main".to_string(),
        vec![Arc::new(FileSinkService::new(file_path, Duration::from_secs(flush_interval_secs)))],
    );
    orchestrator.run().await?;
    Ok(())
}
