// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Standalone entry point running a single `WsBridgeService` in a single
//! pool. Host and port are read from the environment, following the same
//! minimal-config convention as `harbor-file-sink`.

use harbor_runtime::Orchestrator;
use harbor_ws_bridge::WsBridgeService;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let host = std::env::var("HARBOR_WS_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("HARBOR_WS_PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(8080);

    let mut orchestrator = Orchestrator::new()?;
    orchestrator.pools.insert("main".to_string(), vec![Arc::new(WsBridgeService::new(host, port))]);
    orchestrator.run().await?;
    Ok(())
}
