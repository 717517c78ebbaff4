//! # Wall-clock sources.
//!
//! [`RetryGate`](crate::RetryGate) never reads the system time directly; it asks
//! the [`Clock`] it was built with. Swapping the clock changes nothing else
//! about the gate's behavior.
//!
//! - [`SystemClock`]: `SystemTime::now()`
//! - [`ManualClock`]: a shared, settable instant for tests and simulations
//! - any `Fn() -> SystemTime` closure
//!
//! # Example
//! ```
//! use std::time::{Duration, UNIX_EPOCH};
//! use retrygate::{Clock, ManualClock};
//!
//! let clock = ManualClock::new(UNIX_EPOCH);
//! let handle = clock.clone();
//!
//! handle.advance(Duration::from_secs(3));
//! assert_eq!(clock.now(), UNIX_EPOCH + Duration::from_secs(3));
//! ```

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, SystemTime};

/// Source of the current wall-clock time.
pub trait Clock {
    /// Returns the current instant.
    fn now(&self) -> SystemTime;
}

/// Clock backed by [`SystemTime::now`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

impl<F> Clock for F
where
    F: Fn() -> SystemTime,
{
    #[inline]
    fn now(&self) -> SystemTime {
        self()
    }
}

/// Manually driven clock.
///
/// Clones share the same instant, so a test can keep one handle and give the
/// other to a gate.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Arc<Mutex<SystemTime>>,
}

impl ManualClock {
    /// Creates a clock frozen at `at`.
    pub fn new(at: SystemTime) -> Self {
        Self {
            now: Arc::new(Mutex::new(at)),
        }
    }

    /// Moves the clock to `at`. Going backwards is allowed.
    pub fn set(&self, at: SystemTime) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = at;
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
