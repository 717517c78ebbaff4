//! # Jitter policy for backoff delays.
//!
//! [`JitterPolicy`] adds randomness to backoff delays so that many callers
//! failing at the same moment do not retry in lockstep.
//!
//! - [`JitterPolicy::None`]: no randomization, the deterministic delay is returned
//! - [`JitterPolicy::Uniform`]: random delay in `[min, computed]`, both ends inclusive
//!
//! The lower bound is always the configured minimum, so a jittered delay never
//! drops below what attempt 0 would produce.

use rand::Rng;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::policies::duration_from_nanos;

/// Policy controlling randomization of backoff delays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JitterPolicy {
    /// No jitter: use the exact computed delay.
    #[default]
    None,

    /// Uniform jitter: delay drawn from `[min, computed]`.
    ///
    /// Every call makes a fresh draw, so repeated calls with the same attempt
    /// index do not coincide in practice.
    Uniform,
}

impl JitterPolicy {
    /// Returns `true` unless the policy is [`JitterPolicy::None`].
    #[inline]
    pub fn is_enabled(&self) -> bool {
        !matches!(self, JitterPolicy::None)
    }

    /// Applies jitter to `computed`, keeping the result within `[floor, computed]`.
    ///
    /// If `floor >= computed` the range is degenerate and `computed` is returned.
    /// Resolution is one nanosecond.
    pub fn apply(&self, floor: Duration, computed: Duration) -> Duration {
        match self {
            JitterPolicy::None => computed,
            JitterPolicy::Uniform => uniform(floor, computed),
        }
    }
}

/// Uniform draw in `[floor, computed]`.
fn uniform(floor: Duration, computed: Duration) -> Duration {
    let lo = floor.as_nanos();
    let hi = computed.as_nanos();
    if lo >= hi {
        return computed;
    }
    let mut rng = rand::rng();
    duration_from_nanos(rng.random_range(lo..=hi)).min(computed)
}

impl From<bool> for JitterPolicy {
    fn from(enabled: bool) -> Self {
        if enabled {
            JitterPolicy::Uniform
        } else {
            JitterPolicy::None
        }
    }
}

impl FromStr for JitterPolicy {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "off" | "false" => Ok(JitterPolicy::None),
            "uniform" | "on" | "true" => Ok(JitterPolicy::Uniform),
            other => Err(ConfigError::UnknownJitter(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_identity() {
        let d = Duration::from_millis(400);
        assert_eq!(JitterPolicy::None.apply(Duration::from_millis(100), d), d);
    }

    #[test]
    fn test_uniform_bounds() {
        let floor = Duration::from_millis(100);
        let computed = Duration::from_millis(400);
        for _ in 0..500 {
            let d = JitterPolicy::Uniform.apply(floor, computed);
            assert!(d >= floor, "{d:?} below floor");
            assert!(d <= computed, "{d:?} above computed");
        }
    }

    #[test]
    fn test_uniform_degenerate_range() {
        let d = Duration::from_millis(100);
        assert_eq!(JitterPolicy::Uniform.apply(d, d), d);
        assert_eq!(
            JitterPolicy::Uniform.apply(Duration::from_secs(1), d),
            d,
            "floor above computed returns computed"
        );
    }

    #[test]
    fn test_uniform_varies() {
        let floor = Duration::from_millis(100);
        let computed = Duration::from_secs(10);
        let first = JitterPolicy::Uniform.apply(floor, computed);
        let varied = (0..50).any(|_| JitterPolicy::Uniform.apply(floor, computed) != first);
        assert!(varied, "50 draws over a 9.9s range all equal {first:?}");
    }

    #[test]
    fn test_uniform_bounds_past_u64_nanos() {
        let floor = Duration::from_secs(1);
        let computed = Duration::MAX;
        for _ in 0..100 {
            let d = JitterPolicy::Uniform.apply(floor, computed);
            assert!(d >= floor && d <= computed, "{d:?} out of range");
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("none".parse::<JitterPolicy>().unwrap(), JitterPolicy::None);
        assert_eq!("".parse::<JitterPolicy>().unwrap(), JitterPolicy::None);
        assert_eq!(" TRUE ".parse::<JitterPolicy>().unwrap(), JitterPolicy::Uniform);
        assert_eq!("uniform".parse::<JitterPolicy>().unwrap(), JitterPolicy::Uniform);
        assert_eq!(
            "full".parse::<JitterPolicy>().unwrap_err(),
            ConfigError::UnknownJitter("full".into())
        );
    }

    #[test]
    fn test_from_bool() {
        assert!(JitterPolicy::from(true).is_enabled());
        assert!(!JitterPolicy::from(false).is_enabled());
    }
}
