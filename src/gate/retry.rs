use std::time::{Duration, SystemTime};

use tracing::{debug, trace};

use crate::clock::{Clock, SystemClock};
use crate::error::BackoffError;
use crate::gate::Decision;
use crate::policies::Backoff;

/// Rate-limiting gate driven by a [`Backoff`] counter.
///
/// Keeps the earliest instant at which another attempt is permitted and
/// answers "may I try now?" against an injected [`Clock`].
///
/// ### Rules
/// - Only a permitted [`RetryGate::allow`] mutates state, and it advances the
///   counter by exactly one while moving the next allowed instant
/// - A rejected call returns the stored instant and changes nothing, so
///   polling in a loop does not distort the backoff progression
/// - Not synchronized: wrap in a lock to share it between threads
#[derive(Clone, Debug)]
pub struct RetryGate<C = SystemClock> {
    backoff: Backoff,
    next: Option<SystemTime>,
    last_delay: Duration,
    clock: C,
}

impl RetryGate<SystemClock> {
    /// Creates a gate reading [`SystemTime::now`].
    pub fn new(backoff: Backoff) -> Self {
        Self::with_clock(backoff, SystemClock)
    }
}

impl Default for RetryGate<SystemClock> {
    /// Gate over [`Backoff::default`] with the system clock.
    fn default() -> Self {
        Self::new(Backoff::default())
    }
}

impl<C: Clock> RetryGate<C> {
    /// Creates a gate reading time from `clock`.
    pub fn with_clock(backoff: Backoff, clock: C) -> Self {
        Self {
            backoff,
            next: None,
            last_delay: Duration::ZERO,
            clock,
        }
    }

    /// Decides whether an attempt may start now, reading the injected clock.
    ///
    /// See [`RetryGate::allow_at`].
    pub fn allow(&mut self) -> Result<Decision, BackoffError> {
        let now = self.clock.now();
        self.allow_at(now)
    }

    /// Decides whether an attempt may start at `now`.
    ///
    /// If no attempt is scheduled, or `now` is at or after the next allowed
    /// instant, the counter is advanced, the next allowed instant becomes
    /// `now + delay`, and [`Decision::Proceed`] is returned. Otherwise the
    /// stored instant is returned as [`Decision::Wait`] and nothing changes.
    ///
    /// # Errors
    /// [`BackoffError::MaxAttemptsExceeded`] from the counter, unchanged. The
    /// gate's state is left untouched in that case.
    ///
    /// If `now + delay` is past the latest representable [`SystemTime`], the
    /// next allowed instant saturates near that limit instead.
    pub fn allow_at(&mut self, now: SystemTime) -> Result<Decision, BackoffError> {
        if let Some(next) = self.next {
            if now < next {
                trace!(?next, "retry limited");
                return Ok(Decision::Wait { until: next });
            }
        }

        let delay = self.backoff.next_delay()?;
        let next = saturating_add(now, delay);
        self.next = Some(next);
        self.last_delay = next.duration_since(now).unwrap_or(delay);
        debug!(
            attempt = self.backoff.attempt(),
            ?delay,
            "retry permitted"
        );
        Ok(Decision::Proceed)
    }

    /// Clears the schedule and returns the counter to attempt zero.
    ///
    /// Typically called after a success, so the next failure starts again at
    /// the minimum delay.
    pub fn reset(&mut self) {
        self.backoff.reset();
        self.next = None;
        self.last_delay = Duration::ZERO;
    }

    /// Instant of the most recent permitted attempt, `None` before the first one.
    ///
    /// Derived as the next allowed instant minus the delay that produced it.
    pub fn last_attempt(&self) -> Option<SystemTime> {
        self.next
            .and_then(|next| next.checked_sub(self.last_delay))
    }

    /// The earliest instant another attempt is permitted, `None` when unrestricted.
    #[inline]
    pub fn next_allowed(&self) -> Option<SystemTime> {
        self.next
    }

    /// Delay applied by the most recent permitted attempt, `None` before the first one.
    pub fn last_delay(&self) -> Option<Duration> {
        self.next.map(|_| self.last_delay)
    }

    /// Read access to the underlying counter.
    #[inline]
    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }

    /// The clock read by [`RetryGate::allow`].
    #[inline]
    pub fn clock(&self) -> &C {
        &self.clock
    }
}

/// `now + delay`, shrinking the delay until the sum fits in a [`SystemTime`].
fn saturating_add(now: SystemTime, delay: Duration) -> SystemTime {
    let mut step = delay;
    loop {
        if let Some(at) = now.checked_add(step) {
            return at;
        }
        step /= 2;
    }
}
