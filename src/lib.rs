//! # retrygate
//!
//! **retrygate** is a small building block for retry logic: an exponential
//! backoff counter and a wall-clock gate that says when the next attempt is
//! allowed.
//!
//! It does not run the operation, sleep, or spawn anything. Callers ask the
//! gate, then wait however suits them (blocking sleep, `tokio::time::sleep`,
//! a timer wheel, or simply polling again later).
//!
//! ## Architecture
//! ```text
//!   BackoffConfig ──► Backoff::new() ──┐   (defaults applied + validated once)
//!                                      ▼
//!                     ┌─────────────────────────────────┐
//!   Clock ──────────► │ RetryGate                       │
//!                     │  - backoff: Backoff (owned)     │
//!                     │  - next: Option<SystemTime>     │
//!                     └───────────────┬─────────────────┘
//!                                     ▼
//!        allow() ──► Decision::Proceed | Decision::Wait { until }
//!                    | Err(BackoffError::MaxAttemptsExceeded)
//! ```
//!
//! ### Campaign lifecycle
//! ```text
//! loop {
//!   ├─► gate.allow()
//!   │     ├─ Wait { until } ──► caller waits, continue
//!   │     ├─ Err(MaxAttemptsExceeded) ──► give up (terminal)
//!   │     └─ Proceed
//!   ├─► run the operation
//!   │     ├─ Ok  ──► gate.reset(), done
//!   │     └─ Err ──► continue
//! }
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types                              |
//! |-------------------|--------------------------------------------------------------|----------------------------------------|
//! | **Backoff**       | `min × factor^n` clamped to `max`, optional jitter and cap.  | [`Backoff`], [`JitterPolicy`]          |
//! | **Gate**          | "Is it time yet?" decisions against an injected clock.       | [`RetryGate`], [`Decision`], [`Clock`] |
//! | **Configuration** | Builder-style config and a serde model for files/requests.   | [`BackoffConfig`], [`BackoffSettings`] |
//! | **Errors**        | Typed errors with stable labels for logs/metrics.            | [`BackoffError`], [`ConfigError`]      |
//!
//! Diagnostics are emitted through [`tracing`] at `debug`/`trace` level; the
//! crate never installs a subscriber.
//!
//! ## Example
//! ```rust
//! use std::time::{Duration, UNIX_EPOCH};
//! use retrygate::{Backoff, BackoffConfig, Decision, ManualClock, RetryGate};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let clock = ManualClock::new(UNIX_EPOCH);
//!     let backoff = Backoff::new(
//!         BackoffConfig::new()
//!             .with_min(Duration::from_millis(100))
//!             .with_max(Duration::from_secs(1))
//!             .with_max_attempts(3),
//!     )?;
//!     let mut gate = RetryGate::with_clock(backoff, clock.clone());
//!
//!     let mut failures = 0;
//!     loop {
//!         match gate.allow()? {
//!             Decision::Wait { until } => {
//!                 // A real caller would sleep here.
//!                 clock.set(until);
//!                 continue;
//!             }
//!             Decision::Proceed => {}
//!         }
//!
//!         if failures < 2 {
//!             failures += 1;
//!             continue;
//!         }
//!         gate.reset();
//!         break;
//!     }
//!
//!     // Three attempts spaced 100ms then 200ms apart.
//!     assert_eq!(clock_offset(&clock), Duration::from_millis(300));
//!     Ok(())
//! }
//!
//! fn clock_offset(clock: &ManualClock) -> Duration {
//!     use retrygate::Clock;
//!     clock.now().duration_since(UNIX_EPOCH).unwrap()
//! }
//! ```

mod clock;
mod config;
mod error;
mod gate;
mod policies;
mod settings;

// ---- Public re-exports ----

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{BackoffConfig, DEFAULT_FACTOR, DEFAULT_MAX, DEFAULT_MIN};
pub use error::{BackoffError, ConfigError};
pub use gate::{Decision, RetryGate};
pub use policies::{Backoff, JitterPolicy};
pub use settings::BackoffSettings;
