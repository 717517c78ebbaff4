//! # Backoff configuration.
//!
//! [`BackoffConfig`] is the caller-facing record used to build a
//! [`Backoff`](crate::Backoff). Unset fields fall back to defaults exactly once,
//! when the counter is constructed; explicit values are kept as given.
//!
//! ## Defaults
//! - `min = 100ms`
//! - `max = 10s`
//! - `factor = 2.0`
//! - `jitter = JitterPolicy::None`
//! - `max_attempts = None` (unlimited)
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use retrygate::{BackoffConfig, JitterPolicy};
//!
//! let cfg = BackoffConfig::new()
//!     .with_min(Duration::from_millis(50))
//!     .with_factor(1.5)
//!     .with_jitter(JitterPolicy::Uniform)
//!     .with_max_attempts(5);
//!
//! assert_eq!(cfg.min, Some(Duration::from_millis(50)));
//! assert_eq!(cfg.max, None);
//! ```

use std::time::Duration;

use crate::error::ConfigError;
use crate::policies::JitterPolicy;

/// Default lower bound for delays.
pub const DEFAULT_MIN: Duration = Duration::from_millis(100);
/// Default upper bound for delays.
pub const DEFAULT_MAX: Duration = Duration::from_secs(10);
/// Default multiplicative growth factor.
pub const DEFAULT_FACTOR: f64 = 2.0;

/// Configuration for a [`Backoff`](crate::Backoff) counter.
///
/// ## Field semantics
/// - `min`: first delay, and the floor for jittered delays (`None` = 100ms)
/// - `max`: ceiling applied to every delay (`None` = 10s)
/// - `factor`: growth per attempt, may be fractional (`None` = 2.0)
/// - `jitter`: randomization policy
/// - `max_attempts`: cap on delays handed out per campaign (`None` = unlimited)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BackoffConfig {
    /// Smallest delay returned.
    pub min: Option<Duration>,
    /// Largest delay ever returned.
    pub max: Option<Duration>,
    /// Multiplicative growth per attempt.
    pub factor: Option<f64>,
    /// Jitter policy.
    pub jitter: JitterPolicy,
    /// Optional attempt cap.
    pub max_attempts: Option<u32>,
}

impl BackoffConfig {
    /// Creates a configuration with every field unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the lower bound.
    pub fn with_min(mut self, min: Duration) -> Self {
        self.min = Some(min);
        self
    }

    /// Sets the upper bound.
    pub fn with_max(mut self, max: Duration) -> Self {
        self.max = Some(max);
        self
    }

    /// Sets the growth factor.
    pub fn with_factor(mut self, factor: f64) -> Self {
        self.factor = Some(factor);
        self
    }

    /// Sets the jitter policy. Accepts a [`JitterPolicy`] or a `bool`.
    pub fn with_jitter(mut self, jitter: impl Into<JitterPolicy>) -> Self {
        self.jitter = jitter.into();
        self
    }

    /// Caps the number of delays handed out per campaign.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Applies defaults and validates the result.
    ///
    /// ### Rejected
    /// - `factor` that is NaN, infinite, or below `1.0`
    /// - `min > max` after defaults are applied
    /// - `max_attempts == Some(0)`
    pub(crate) fn resolve(&self) -> Result<Resolved, ConfigError> {
        let min = self.min.unwrap_or(DEFAULT_MIN);
        let max = self.max.unwrap_or(DEFAULT_MAX);
        let factor = self.factor.unwrap_or(DEFAULT_FACTOR);

        if !factor.is_finite() || factor < 1.0 {
            return Err(ConfigError::InvalidFactor { factor });
        }
        if min > max {
            return Err(ConfigError::InvertedBounds { min, max });
        }
        if self.max_attempts == Some(0) {
            return Err(ConfigError::ZeroMaxAttempts);
        }

        Ok(Resolved {
            min,
            max,
            factor,
            jitter: self.jitter,
            max_attempts: self.max_attempts,
        })
    }
}

/// Concrete, validated configuration held by a counter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Resolved {
    pub min: Duration,
    pub max: Duration,
    pub factor: f64,
    pub jitter: JitterPolicy,
    pub max_attempts: Option<u32>,
}
