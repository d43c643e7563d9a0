// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The process-wide orchestrator: a singleton that turns a pool-key →
//! service-list configuration into running pools, and tears them all down
//! cleanly on `ctrl_c` or an explicit [`Orchestrator::shutdown`] call.

use crate::bus::Bus;
use crate::pool::{Pool, PoolHandle};
use harbor_core::{ConfigError, Service};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

static CONSTRUCTED: OnceLock<()> = OnceLock::new();

/// Configuration and control surface for the whole service host.
///
/// A process may construct at most one `Orchestrator`; a second attempt
/// returns [`ConfigError::AlreadyConstructed`] rather than silently
/// shadowing process-wide state (the bus and every pool thread are owned
/// by whichever orchestrator's `run()` is in flight).
pub struct Orchestrator {
    pub pools: HashMap<String, Vec<Arc<dyn Service>>>,
    bus: Arc<Bus>,
}

impl Orchestrator {
    pub fn new() -> Result<Self, ConfigError> {
        CONSTRUCTED.set(()).map_err(|_| ConfigError::AlreadyConstructed)?;
        Ok(Self { pools: HashMap::new(), bus: Arc::new(Bus::new()) })
    }

    /// Start every configured pool on its own thread, install a `ctrl_c`
    /// listener, and block until every pool has been signalled to stop and
    /// has finished tearing down.
    pub async fn run(self) -> Result<(), ConfigError> {
        if self.pools.is_empty() {
            return Err(ConfigError::NoPools);
        }

        let mut handles: Vec<PoolHandle> = Vec::with_capacity(self.pools.len());
        for (key, services) in self.pools {
            let pool = Pool::new(key.clone(), services);
            match pool.spawn(self.bus.clone()) {
                Ok(handle) => handles.push(handle),
                Err(error) => tracing::error!(pool = %key, %error, "failed to spawn pool thread"),
            }
        }

        tracing::info!(pools = handles.len(), "all pools started, awaiting interrupt");
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "failed to install ctrl_c listener, shutting down anyway");
        }

        tracing::info!("interrupt received, stopping all pools");
        for handle in &handles {
            handle.stop();
        }

        for handle in handles {
            let joined = tokio::task::spawn_blocking(move || handle.join()).await;
            if joined.is_err() {
                tracing::error!("pool join task panicked");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
