// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use async_trait::async_trait;
use harbor_core::service::LifecycleCell;
use harbor_core::{payload, ServiceState, ServiceStepError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

struct CountingService {
    lifecycle: LifecycleCell,
    run_started: Arc<AtomicUsize>,
    terminated: Arc<AtomicUsize>,
}

#[async_trait]
impl Service for CountingService {
    fn name(&self) -> &str {
        "counting-service"
    }

    fn lifecycle(&self) -> &LifecycleCell {
        &self.lifecycle
    }

    async fn initialize(&self, _ctx: &dyn ServiceContext) -> Result<(), ServiceStepError> {
        Ok(())
    }

    async fn run(&self, _ctx: &dyn ServiceContext) -> Result<(), ServiceStepError> {
        self.run_started.fetch_add(1, Ordering::SeqCst);
        while self.state() == ServiceState::Running {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        Ok(())
    }

    async fn terminate(&self, _ctx: &dyn ServiceContext) -> Result<(), ServiceStepError> {
        self.terminated.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test]
async fn pool_start_and_stop_runs_full_lifecycle() {
    let run_started = Arc::new(AtomicUsize::new(0));
    let terminated = Arc::new(AtomicUsize::new(0));
    let service = Arc::new(CountingService {
        lifecycle: LifecycleCell::new(),
        run_started: run_started.clone(),
        terminated: terminated.clone(),
    });

    let bus = Arc::new(Bus::new());
    let pool = Pool::new("test-pool", vec![service.clone()]);
    let handle = pool.spawn(bus).expect("pool thread should spawn");

    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.stop();
    tokio::task::spawn_blocking(move || handle.join()).await.expect("join should not panic");

    assert_eq!(run_started.load(Ordering::SeqCst), 1);
    assert_eq!(terminated.load(Ordering::SeqCst), 1);
    assert_eq!(service.state(), ServiceState::Terminated);
}

#[tokio::test]
async fn pool_delivers_published_event_to_subscriber_on_same_pool() {
    struct Publisher(LifecycleCell);

    #[async_trait]
    impl Service for Publisher {
        fn name(&self) -> &str {
            "publisher"
        }
        fn lifecycle(&self) -> &LifecycleCell {
            &self.0
        }
        async fn initialize(&self, ctx: &dyn ServiceContext) -> Result<(), ServiceStepError> {
            ctx.publish("q://greet", payload(serde_json::json!("hi"))).await;
            Ok(())
        }
        async fn run(&self, _ctx: &dyn ServiceContext) -> Result<(), ServiceStepError> {
            while self.state() == ServiceState::Running {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            Ok(())
        }
        async fn terminate(&self, _ctx: &dyn ServiceContext) -> Result<(), ServiceStepError> {
            Ok(())
        }
    }

    struct Subscriber {
        lifecycle: LifecycleCell,
        received: Arc<std::sync::Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Service for Subscriber {
        fn name(&self) -> &str {
            "subscriber"
        }
        fn lifecycle(&self) -> &LifecycleCell {
            &self.lifecycle
        }
        async fn initialize(&self, ctx: &dyn ServiceContext) -> Result<(), ServiceStepError> {
            let received = self.received.clone();
            ctx.subscribe(
                "q://greet",
                Arc::new(move |payload| {
                    let received = received.clone();
                    Box::pin(async move {
                        received.lock().unwrap_or_else(|e| e.into_inner()).push(payload.to_string());
                    })
                }),
            )
            .await;
            Ok(())
        }
        async fn run(&self, _ctx: &dyn ServiceContext) -> Result<(), ServiceStepError> {
            while self.state() == ServiceState::Running {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            Ok(())
        }
        async fn terminate(&self, _ctx: &dyn ServiceContext) -> Result<(), ServiceStepError> {
            Ok(())
        }
    }

    let received = Arc::new(std::sync::Mutex::new(Vec::new()));
    let subscriber = Arc::new(Subscriber { lifecycle: LifecycleCell::new(), received: received.clone() });
    let publisher = Arc::new(Publisher(LifecycleCell::new()));

    // Subscriber must be started first so its subscription exists before the
    // publisher's `initialize` runs.
    let bus = Arc::new(Bus::new());
    let pool = Pool::new("msg-pool", vec![subscriber, publisher]);
    let handle = pool.spawn(bus).expect("pool thread should spawn");

    tokio::time::sleep(Duration::from_millis(80)).await;
    handle.stop();
    tokio::task::spawn_blocking(move || handle.join()).await.expect("join should not panic");

    let received = received.lock().unwrap_or_else(|e| e.into_inner());
    assert_eq!(received.as_slice(), [r#""hi""#]);
}
