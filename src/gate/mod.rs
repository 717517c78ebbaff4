//! # Retry gate.
//!
//! [`RetryGate`] turns the delay sequence of a [`Backoff`](crate::Backoff)
//! into a go/no-go decision against wall-clock time.
//!
//! ## Architecture
//! ```text
//! caller ──► RetryGate::allow()
//!              ├─► clock.now()
//!              ├─ now < next ─────────► Decision::Wait { until: next }   (no state change)
//!              └─ next unset or due:
//!                   ├─► backoff.next_delay()  ── Err ──► MaxAttemptsExceeded (no state change)
//!                   ├─► next = now + delay
//!                   └─► Decision::Proceed
//!
//! caller: Proceed ──► run the operation ──► success ──► RetryGate::reset()
//!         Wait    ──► sleep / reschedule / poll again
//! ```
//!
//! The gate never sleeps. How to wait for [`Decision::Wait`] is the caller's choice.
//!
//! # Example
//! ```
//! use std::time::{Duration, UNIX_EPOCH};
//! use retrygate::{Backoff, Decision, RetryGate};
//!
//! let mut gate = RetryGate::new(Backoff::default());
//! let t0 = UNIX_EPOCH;
//!
//! assert_eq!(gate.allow_at(t0)?, Decision::Proceed);
//! assert_eq!(
//!     gate.allow_at(t0 + Duration::from_millis(50))?,
//!     Decision::Wait { until: t0 + Duration::from_millis(100) },
//! );
//! assert_eq!(gate.allow_at(t0 + Duration::from_millis(100))?, Decision::Proceed);
//! assert_eq!(gate.last_attempt(), Some(t0 + Duration::from_millis(100)));
//!
//! gate.reset();
//! assert_eq!(gate.next_allowed(), None);
//! # Ok::<(), retrygate::BackoffError>(())
//! ```

mod decision;
mod retry;

pub use decision::Decision;
pub use retry::RetryGate;
