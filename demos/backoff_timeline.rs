//! # Example: backoff_timeline
//!
//! Replays a fixed timeline of `allow` calls against a [`RetryGate`] using a
//! [`ManualClock`], printing for each call the last permitted attempt, the
//! current delay, and whether the call was allowed.
//!
//! Shows that polling while limited does not move the schedule, and that the
//! delay stops growing once it reaches `max`.
//!
//! ## Run
//! ```bash
//! cargo run --example backoff_timeline
//! ```

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use retrygate::{Backoff, BackoffConfig, Decision, ManualClock, RetryGate};

fn offset(t: SystemTime) -> Duration {
    t.duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let clock = ManualClock::new(UNIX_EPOCH);
    let backoff = Backoff::new(
        BackoffConfig::new()
            .with_min(Duration::from_secs(1))
            .with_max(Duration::from_secs(60)),
    )?;
    let mut gate = RetryGate::with_clock(backoff, clock.clone());

    let calls = [
        0, 100, 700, 1_000, 1_000, 2_000, 3_000, 3_000, 4_000, 5_000, 8_000, 20_000, 55_000,
        80_000, 120_000, 500_000, 550_000, 560_000,
    ];

    println!("at OFFSET last LAST_OFFSET (ATTEMPT, DELAY): RESULT");
    for ms in calls {
        let at = UNIX_EPOCH + Duration::from_millis(ms);
        clock.set(at);

        let last = gate.last_attempt().map(offset);
        let delay = gate.last_delay();
        let attempt = gate.backoff().attempt();

        let result = match gate.allow()? {
            Decision::Proceed => format!(
                "ok (next at {:?})",
                gate.next_allowed().map(offset).unwrap_or_default()
            ),
            Decision::Wait { until } => format!("limited (next at {:?})", offset(until)),
        };

        println!(
            "at {:?} last {} ({attempt}, {}): {result}",
            offset(at),
            last.map_or_else(|| "-".to_string(), |d| format!("{d:?}")),
            delay.map_or_else(|| "-".to_string(), |d| format!("{d:?}")),
        );
    }
    Ok(())
}
