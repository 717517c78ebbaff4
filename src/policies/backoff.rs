//! # Exponential backoff counter.
//!
//! [`Backoff`] maps an attempt index to a delay and keeps track of how many
//! delays the current campaign has consumed.
//!
//! The delay for attempt `n` is `min × factor^n`, clamped to `max`. Because the
//! base delay is derived purely from the attempt index, jitter output never
//! feeds back into later delays.
//!
//! ## Rounding
//! The computation runs in `f64` nanoseconds and the result is truncated toward
//! zero to whole nanoseconds: with `min = 100ns` and `factor = 1.75` the
//! sequence is `100ns, 175ns, 306ns` (306.25 truncated).
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use retrygate::{Backoff, BackoffConfig};
//!
//! let mut backoff = Backoff::new(
//!     BackoffConfig::new()
//!         .with_min(Duration::from_millis(100))
//!         .with_max(Duration::from_secs(10))
//!         .with_factor(2.0),
//! )?;
//!
//! assert_eq!(backoff.next_delay()?, Duration::from_millis(100));
//! assert_eq!(backoff.next_delay()?, Duration::from_millis(200));
//! assert_eq!(backoff.next_delay()?, Duration::from_millis(400));
//!
//! // Attempt 10: 100ms × 2^10 = 102.4s, capped at max
//! assert_eq!(backoff.for_attempt(10), Duration::from_secs(10));
//!
//! backoff.reset();
//! assert_eq!(backoff.next_delay()?, Duration::from_millis(100));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::time::Duration;

use tracing::{debug, trace};

use crate::config::{BackoffConfig, DEFAULT_FACTOR, DEFAULT_MAX, DEFAULT_MIN, Resolved};
use crate::error::{BackoffError, ConfigError};
use crate::policies::duration_from_nanos;
use crate::policies::jitter::JitterPolicy;

/// Stateful exponential backoff counter.
///
/// Holds a validated configuration and the attempt index of the current
/// campaign. Not synchronized: share it across threads only behind a lock.
///
/// ### Rules
/// - [`Backoff::for_attempt`] is pure and never applies jitter
/// - [`Backoff::next_delay`] is the only operation that advances the index
/// - A failed [`Backoff::next_delay`] leaves the index untouched
#[derive(Clone, Debug)]
pub struct Backoff {
    cfg: Resolved,
    attempts: u32,
}

impl Default for Backoff {
    /// Returns a counter with `min = 100ms`, `max = 10s`, `factor = 2.0`,
    /// no jitter and no attempt cap.
    fn default() -> Self {
        Self {
            cfg: Resolved {
                min: DEFAULT_MIN,
                max: DEFAULT_MAX,
                factor: DEFAULT_FACTOR,
                jitter: JitterPolicy::None,
                max_attempts: None,
            },
            attempts: 0,
        }
    }
}

impl TryFrom<BackoffConfig> for Backoff {
    type Error = ConfigError;
    fn try_from(cfg: BackoffConfig) -> Result<Self, Self::Error> {
        Backoff::new(cfg)
    }
}

impl Backoff {
    /// Builds a counter, applying defaults to unset fields and validating the result.
    pub fn new(cfg: BackoffConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            cfg: cfg.resolve()?,
            attempts: 0,
        })
    }

    /// Computes the deterministic delay for the given attempt index (0-indexed).
    ///
    /// Does not read or modify the attempt index and never applies jitter.
    ///
    /// # Notes
    /// - `factor == 1.0` keeps the delay constant at `min`.
    /// - Non-finite intermediates (huge attempt numbers) clamp to `max`.
    pub fn for_attempt(&self, attempt: u32) -> Duration {
        if self.cfg.min.is_zero() {
            return Duration::ZERO;
        }
        let clamped_exp = attempt.min(i32::MAX as u32) as i32;
        let unclamped = self.cfg.min.as_nanos() as f64 * self.cfg.factor.powi(clamped_exp);

        if !unclamped.is_finite() || unclamped >= self.cfg.max.as_nanos() as f64 {
            self.cfg.max
        } else {
            duration_from_nanos(unclamped as u128).min(self.cfg.max)
        }
    }

    /// Returns the delay for the current attempt and advances the index by one.
    ///
    /// With jitter enabled the delay is drawn uniformly from
    /// `[min, for_attempt(attempt)]`.
    ///
    /// # Errors
    /// [`BackoffError::MaxAttemptsExceeded`] once the index has reached a
    /// configured cap. The index is not advanced in that case.
    pub fn next_delay(&mut self) -> Result<Duration, BackoffError> {
        if let Some(max_attempts) = self.cfg.max_attempts {
            if self.attempts >= max_attempts {
                debug!(
                    attempts = self.attempts,
                    max_attempts, "backoff attempts exhausted"
                );
                return Err(BackoffError::MaxAttemptsExceeded {
                    attempts: self.attempts,
                    max_attempts,
                });
            }
        }

        let computed = self.for_attempt(self.attempts);
        let delay = self.cfg.jitter.apply(self.cfg.min, computed);
        trace!(attempt = self.attempts, ?computed, ?delay, "backoff delay");

        self.attempts = self.attempts.saturating_add(1);
        Ok(delay)
    }

    /// Number of delays consumed in the current campaign.
    #[inline]
    pub fn attempt(&self) -> u32 {
        self.attempts
    }

    /// Delays left before [`BackoffError::MaxAttemptsExceeded`], `None` when unlimited.
    pub fn remaining(&self) -> Option<u32> {
        self.cfg
            .max_attempts
            .map(|max| max.saturating_sub(self.attempts))
    }

    /// Returns the attempt index to zero. Idempotent.
    pub fn reset(&mut self) {
        if self.attempts != 0 {
            trace!(attempts = self.attempts, "backoff reset");
        }
        self.attempts = 0;
    }

    /// Resolved lower bound.
    #[inline]
    pub fn min(&self) -> Duration {
        self.cfg.min
    }

    /// Resolved upper bound.
    #[inline]
    pub fn max(&self) -> Duration {
        self.cfg.max
    }

    /// Resolved growth factor.
    #[inline]
    pub fn factor(&self) -> f64 {
        self.cfg.factor
    }

    /// Jitter policy applied by [`Backoff::next_delay`].
    #[inline]
    pub fn jitter(&self) -> JitterPolicy {
        self.cfg.jitter
    }

    /// Configured attempt cap, `None` when unlimited.
    #[inline]
    pub fn max_attempts(&self) -> Option<u32> {
        self.cfg.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn backoff(min: Duration, max: Duration, factor: f64) -> Backoff {
        Backoff::new(
            BackoffConfig::new()
                .with_min(min)
                .with_max(max)
                .with_factor(factor),
        )
        .unwrap()
    }

    #[test]
    fn test_doubling_then_reset() {
        let mut b = backoff(Duration::from_millis(100), Duration::from_secs(10), 2.0);
        assert_eq!(b.next_delay().unwrap(), Duration::from_millis(100));
        assert_eq!(b.next_delay().unwrap(), Duration::from_millis(200));
        assert_eq!(b.next_delay().unwrap(), Duration::from_millis(400));
        b.reset();
        assert_eq!(b.next_delay().unwrap(), Duration::from_millis(100));
    }

    #[test]
    fn test_fractional_factor() {
        let mut b = backoff(Duration::from_millis(100), Duration::from_secs(10), 1.5);
        assert_eq!(b.next_delay().unwrap(), Duration::from_millis(100));
        assert_eq!(b.next_delay().unwrap(), Duration::from_millis(150));
        assert_eq!(b.next_delay().unwrap(), Duration::from_millis(225));
        b.reset();
        assert_eq!(b.next_delay().unwrap(), Duration::from_millis(100));
    }

    #[test]
    fn test_nanosecond_truncation() {
        let mut b = backoff(Duration::from_nanos(100), Duration::from_secs(10), 1.75);
        assert_eq!(b.next_delay().unwrap(), Duration::from_nanos(100));
        assert_eq!(b.next_delay().unwrap(), Duration::from_nanos(175));
        assert_eq!(b.next_delay().unwrap(), Duration::from_nanos(306));
        b.reset();
        assert_eq!(b.next_delay().unwrap(), Duration::from_nanos(100));
    }

    #[test]
    fn test_defaults_match_explicit() {
        let mut defaults = Backoff::new(BackoffConfig::new()).unwrap();
        let mut explicit = backoff(Duration::from_millis(100), Duration::from_secs(10), 2.0);
        for _ in 0..12 {
            assert_eq!(defaults.next_delay().unwrap(), explicit.next_delay().unwrap());
        }
        defaults.reset();
        assert_eq!(defaults.next_delay().unwrap(), Duration::from_millis(100));

        let mut from_default = Backoff::default();
        assert_eq!(from_default.next_delay().unwrap(), Duration::from_millis(100));
        assert_eq!(from_default.next_delay().unwrap(), Duration::from_millis(200));
    }

    #[test]
    fn test_clamped_to_max() {
        let mut b = backoff(Duration::from_millis(100), Duration::from_millis(200), 2.0);
        assert_eq!(b.next_delay().unwrap(), Duration::from_millis(100));
        assert_eq!(b.next_delay().unwrap(), Duration::from_millis(200));
        assert_eq!(b.next_delay().unwrap(), Duration::from_millis(200));
        b.reset();
        assert_eq!(b.next_delay().unwrap(), Duration::from_millis(100));
    }

    #[test]
    fn test_for_attempt_is_pure() {
        let b = backoff(Duration::from_nanos(100), Duration::from_secs(10), 1.75);
        for _ in 0..3 {
            assert_eq!(b.for_attempt(0), Duration::from_nanos(100));
            assert_eq!(b.for_attempt(1), Duration::from_nanos(175));
            assert_eq!(b.for_attempt(2), Duration::from_nanos(306));
        }
        assert_eq!(b.attempt(), 0);
    }

    #[test]
    fn test_next_delay_matches_for_attempt() {
        let mut b = backoff(Duration::from_millis(10), Duration::from_secs(3), 3.0);
        for n in 0..10 {
            assert_eq!(b.attempt(), n);
            let expected = b.for_attempt(n);
            assert_eq!(b.next_delay().unwrap(), expected, "attempt {n}");
        }
    }

    #[test]
    fn test_constant_factor() {
        let b = backoff(Duration::from_millis(500), Duration::from_secs(30), 1.0);
        for attempt in 0..10 {
            assert_eq!(b.for_attempt(attempt), Duration::from_millis(500));
        }
    }

    #[test]
    fn test_zero_min_stays_zero() {
        let mut b = Backoff::new(BackoffConfig::new().with_min(Duration::ZERO)).unwrap();
        assert_eq!(b.next_delay().unwrap(), Duration::ZERO);
        assert_eq!(b.next_delay().unwrap(), Duration::ZERO);
        assert_eq!(b.for_attempt(u32::MAX), Duration::ZERO);
    }

    #[test]
    fn test_huge_attempt_clamps_to_max() {
        let b = backoff(Duration::from_millis(100), Duration::from_secs(60), 2.0);
        assert_eq!(b.for_attempt(100), Duration::from_secs(60));
        assert_eq!(b.for_attempt(u32::MAX), Duration::from_secs(60));
    }

    #[test]
    fn test_unbounded_max_keeps_growing() {
        let b = backoff(Duration::from_millis(100), Duration::MAX, 2.0);
        let five_centuries = Duration::from_secs(584 * 365 * 86_400);

        assert_eq!(b.for_attempt(64).as_nanos(), 100_000_000u128 << 64);
        assert!(b.for_attempt(63) > five_centuries);
        assert!(b.for_attempt(64) > b.for_attempt(63));
        assert_eq!(b.for_attempt(70), Duration::MAX);

        let mut prev = Duration::ZERO;
        for attempt in 0..200 {
            let d = b.for_attempt(attempt);
            assert!(d >= prev, "attempt {attempt}: {d:?} < {prev:?}");
            prev = d;
        }
    }

    #[test]
    fn test_max_attempts() {
        let mut b = Backoff::new(BackoffConfig::new().with_max_attempts(2)).unwrap();
        assert_eq!(b.remaining(), Some(2));
        assert_eq!(b.next_delay().unwrap(), Duration::from_millis(100));
        assert_eq!(b.next_delay().unwrap(), Duration::from_millis(200));
        assert_eq!(b.remaining(), Some(0));

        let err = b.next_delay().unwrap_err();
        assert_eq!(
            err,
            BackoffError::MaxAttemptsExceeded {
                attempts: 2,
                max_attempts: 2
            }
        );
        assert_eq!(b.attempt(), 2, "failed call must not advance the index");
        assert!(b.next_delay().is_err());
        assert_eq!(b.attempt(), 2);

        b.reset();
        assert_eq!(b.next_delay().unwrap(), Duration::from_millis(100));
    }

    #[test]
    fn test_unlimited_attempts() {
        let mut b = Backoff::default();
        assert_eq!(b.remaining(), None);
        for _ in 0..1_000 {
            assert!(b.next_delay().is_ok());
        }
        assert_eq!(b.attempt(), 1_000);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut b = Backoff::default();
        b.reset();
        b.reset();
        assert_eq!(b.attempt(), 0);
        let _ = b.next_delay();
        b.reset();
        b.reset();
        assert_eq!(b.attempt(), 0);
    }

    #[test]
    fn test_jitter_bounds() {
        let mut b = Backoff::new(
            BackoffConfig::new()
                .with_min(Duration::from_millis(100))
                .with_max(Duration::from_secs(10))
                .with_factor(2.0)
                .with_jitter(true),
        )
        .unwrap();

        // Attempt 0 has a degenerate range.
        assert_eq!(b.next_delay().unwrap(), Duration::from_millis(100));
        for attempt in 1..12 {
            let upper = b.for_attempt(attempt);
            let d = b.next_delay().unwrap();
            assert!(d >= Duration::from_millis(100), "attempt {attempt}: {d:?}");
            assert!(d <= upper, "attempt {attempt}: {d:?} > {upper:?}");
        }
        b.reset();
        assert_eq!(b.next_delay().unwrap(), Duration::from_millis(100));
    }

    #[test]
    fn test_jitter_is_not_constant() {
        let cfg = BackoffConfig::new()
            .with_min(Duration::from_nanos(100))
            .with_max(Duration::from_secs(10))
            .with_factor(1.75)
            .with_jitter(true);

        let mut vals = Vec::new();
        for _ in 0..20 {
            let mut b = Backoff::new(cfg).unwrap();
            for _ in 0..8 {
                b.next_delay().unwrap();
            }
            vals.push(b.next_delay().unwrap());
        }
        assert!(
            vals.iter().any(|v| *v != vals[0]),
            "20 jittered draws were identical: {vals:?}"
        );
    }

    #[test]
    fn test_jitter_does_not_affect_for_attempt() {
        let b = Backoff::new(BackoffConfig::new().with_jitter(true)).unwrap();
        for _ in 0..10 {
            assert_eq!(b.for_attempt(3), Duration::from_millis(800));
        }
    }

    #[test]
    fn test_try_from_rejects_invalid() {
        let cfg = BackoffConfig::new().with_factor(0.5);
        assert!(matches!(
            Backoff::try_from(cfg),
            Err(ConfigError::InvalidFactor { .. })
        ));
    }
}
