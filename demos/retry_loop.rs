//! # Example: retry_loop
//!
//! Demonstrates a retry campaign driven by [`RetryGate`]: a flaky operation is
//! attempted until it succeeds, waiting whenever the gate says it is too early,
//! and giving up once the attempt cap is reached.
//!
//! The gate persists across calls to `call_with_retry`, so a campaign that
//! ends in failure leaves the backoff where it was and the next call starts
//! out limited.
//!
//! ## Flow
//! ```text
//! call_with_retry()
//!   ├─► gate.allow() → Proceed
//!   ├─► flaky() → Err("boom #1")
//!   ├─► gate.allow() → Wait { until: +100ms } → sleep
//!   ├─► gate.allow() → Proceed
//!   ├─► flaky() → Err("boom #2")
//!   ├─► gate.allow() → Wait { until: +200ms } → sleep
//!   ├─► gate.allow() → Proceed
//!   ├─► flaky() → Ok(())
//!   └─► gate.reset()
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=retrygate=debug cargo run --example retry_loop
//! ```

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, SystemTime},
};

use retrygate::{Backoff, BackoffConfig, BackoffError, Decision, RetryGate};
use tracing_subscriber::EnvFilter;

static CALLS: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, thiserror::Error)]
enum CallError {
    #[error("operation failed: {0}")]
    Failed(String),
    #[error(transparent)]
    Exhausted(#[from] BackoffError),
}

/// Fails until the counter reaches `succeed_on`.
fn flaky(succeed_on: u64) -> Result<(), String> {
    let call = CALLS.fetch_add(1, Ordering::Relaxed) + 1;
    if call < succeed_on {
        Err(format!("boom #{call}"))
    } else {
        Ok(())
    }
}

async fn call_with_retry(
    gate: &mut RetryGate,
    tries: u32,
    succeed_on: u64,
) -> Result<(), CallError> {
    let mut last_err = None;
    let mut attempt = 0;

    while attempt < tries {
        if let Decision::Wait { until } = gate.allow()? {
            let wait = until
                .duration_since(SystemTime::now())
                .unwrap_or(Duration::ZERO);
            println!(
                "[retry] attempt {} of {tries}: limited for {wait:?}",
                attempt.max(1)
            );
            tokio::time::sleep(wait).await;
            continue;
        }

        attempt += 1;
        match flaky(succeed_on) {
            Ok(()) => {
                println!("[retry] attempt {attempt} of {tries}: ok");
                gate.reset();
                return Ok(());
            }
            Err(e) => {
                println!("[retry] attempt {attempt} of {tries}: {e}");
                last_err = Some(e);
            }
        }
    }

    Err(CallError::Failed(last_err.unwrap_or_default()))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // 1. Backoff: 100ms doubling up to 400ms, at most 8 delays per campaign
    let backoff = Backoff::new(
        BackoffConfig::new()
            .with_min(Duration::from_millis(100))
            .with_max(Duration::from_millis(400))
            .with_factor(2.0)
            .with_max_attempts(8),
    )?;
    let mut gate = RetryGate::new(backoff);

    // 2. Succeeds immediately
    CALLS.store(0, Ordering::Relaxed);
    call_with_retry(&mut gate, 3, 1).await?;

    // 3. Succeeds on the third attempt
    CALLS.store(0, Ordering::Relaxed);
    call_with_retry(&mut gate, 3, 3).await?;

    // 4. Never succeeds: the campaign fails and the gate is not reset
    CALLS.store(0, Ordering::Relaxed);
    let err = call_with_retry(&mut gate, 3, u64::MAX).await.unwrap_err();
    println!("[main] gave up: {err}");

    // 5. Starts limited, then runs into the attempt cap
    match call_with_retry(&mut gate, 10, u64::MAX).await {
        Err(CallError::Exhausted(e)) => println!("[main] exhausted: {} ({})", e, e.as_label()),
        other => println!("[main] unexpected: {other:?}"),
    }

    println!("[main] done.");
    Ok(())
}
