use std::time::{Duration, SystemTime};

/// Outcome of [`RetryGate::allow`](crate::RetryGate::allow).
///
/// - `Proceed`: the attempt may start now; the gate has already scheduled the next allowed instant.
/// - `Wait`: too early; nothing changed, try again at or after `until`.
#[must_use = "a Wait decision means the attempt must not start yet"]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Attempt now.
    Proceed,
    /// Attempt not permitted before `until`.
    Wait {
        /// The earliest instant the next attempt is permitted.
        until: SystemTime,
    },
}

impl Decision {
    /// Returns `true` for [`Decision::Proceed`].
    #[inline]
    pub fn is_proceed(&self) -> bool {
        matches!(self, Decision::Proceed)
    }

    /// Returns the instant to wait for, `None` for [`Decision::Proceed`].
    #[inline]
    pub fn wait_until(&self) -> Option<SystemTime> {
        match self {
            Decision::Proceed => None,
            Decision::Wait { until } => Some(*until),
        }
    }

    /// Time left until the attempt is permitted, measured from `now`.
    ///
    /// Zero for [`Decision::Proceed`] and for a `Wait` whose instant has already passed.
    ///
    /// # Example
    /// ```
    /// use std::time::{Duration, UNIX_EPOCH};
    /// use retrygate::Decision;
    ///
    /// let d = Decision::Wait { until: UNIX_EPOCH + Duration::from_secs(3) };
    /// assert_eq!(d.remaining(UNIX_EPOCH + Duration::from_secs(1)), Duration::from_secs(2));
    /// assert_eq!(d.remaining(UNIX_EPOCH + Duration::from_secs(9)), Duration::ZERO);
    /// assert_eq!(Decision::Proceed.remaining(UNIX_EPOCH), Duration::ZERO);
    /// ```
    pub fn remaining(&self, now: SystemTime) -> Duration {
        match self {
            Decision::Proceed => Duration::ZERO,
            Decision::Wait { until } => until.duration_since(now).unwrap_or(Duration::ZERO),
        }
    }
}
