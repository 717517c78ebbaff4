//! Delay policies.
//!
//! This module groups the pieces that decide **how long** to wait between
//! attempts.
//!
//! ## Contents
//! - [`Backoff`]      stateful counter: attempt index → delay (min / factor / max)
//! - [`JitterPolicy`] randomization strategy to avoid synchronized retries
//!
//! ## Quick wiring
//! ```text
//! BackoffConfig ──► Backoff::new() ──► RetryGate::new(backoff)
//!                                         └─► allow() calls backoff.next_delay()
//!                                             once per permitted attempt
//! ```

mod backoff;
mod jitter;

pub use backoff::Backoff;
pub use jitter::JitterPolicy;

use std::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Builds a duration from whole nanoseconds, saturating at [`Duration::MAX`].
pub(crate) fn duration_from_nanos(nanos: u128) -> Duration {
    let secs = u64::try_from(nanos / NANOS_PER_SEC).unwrap_or(u64::MAX);
    if secs == u64::MAX {
        return Duration::MAX;
    }
    Duration::new(secs, (nanos % NANOS_PER_SEC) as u32)
}
