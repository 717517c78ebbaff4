//! Error types used by the backoff counter and the retry gate.
//!
//! This module defines two error enums:
//!
//! - [`BackoffError`]: raised while a retry campaign is running.
//! - [`ConfigError`]: raised when a [`BackoffConfig`](crate::BackoffConfig) is rejected at construction.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.

use thiserror::Error;

/// # Errors produced while computing delays.
///
/// The only runtime failure is running out of attempts. It is raised by
/// [`Backoff::next_delay`](crate::Backoff::next_delay) and passed through
/// unchanged by [`RetryGate::allow`](crate::RetryGate::allow).
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffError {
    /// The configured attempt cap has been reached; no delay is produced.
    #[error("max attempts exceeded: {attempts} of {max_attempts} attempts used")]
    MaxAttemptsExceeded {
        /// Attempts consumed in the current campaign.
        attempts: u32,
        /// The configured cap.
        max_attempts: u32,
    },
}

impl BackoffError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use retrygate::BackoffError;
    ///
    /// let err = BackoffError::MaxAttemptsExceeded { attempts: 3, max_attempts: 3 };
    /// assert_eq!(err.as_label(), "backoff_max_attempts_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            BackoffError::MaxAttemptsExceeded { .. } => "backoff_max_attempts_exceeded",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            BackoffError::MaxAttemptsExceeded {
                attempts,
                max_attempts,
            } => format!("attempts={attempts}; max_attempts={max_attempts}"),
        }
    }

    /// Indicates whether the current campaign must be abandoned.
    ///
    /// Every variant is terminal until [`Backoff::reset`](crate::Backoff::reset) is called.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BackoffError::MaxAttemptsExceeded { .. })
    }
}

/// # Errors produced when validating a backoff configuration.
///
/// Raised once by [`Backoff::new`](crate::Backoff::new); a constructed
/// counter never fails for configuration reasons afterwards.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Growth factor is NaN, infinite, or below `1.0`.
    #[error("invalid factor {factor}: must be finite and >= 1.0")]
    InvalidFactor {
        /// The rejected factor.
        factor: f64,
    },

    /// The lower bound is above the upper bound.
    #[error("min delay {min:?} exceeds max delay {max:?}")]
    InvertedBounds {
        /// The configured lower bound.
        min: std::time::Duration,
        /// The configured upper bound.
        max: std::time::Duration,
    },

    /// `max_attempts` was explicitly set to zero.
    #[error("max attempts must be positive (omit it for unlimited)")]
    ZeroMaxAttempts,

    /// A jitter name could not be parsed.
    #[error("unknown jitter policy: {0}")]
    UnknownJitter(String),
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use retrygate::ConfigError;
    ///
    /// let err = ConfigError::InvalidFactor { factor: 0.5 };
    /// assert_eq!(err.as_label(), "config_invalid_factor");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::InvalidFactor { .. } => "config_invalid_factor",
            ConfigError::InvertedBounds { .. } => "config_inverted_bounds",
            ConfigError::ZeroMaxAttempts => "config_zero_max_attempts",
            ConfigError::UnknownJitter(_) => "config_unknown_jitter",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ConfigError::InvalidFactor { factor } => format!("factor={factor}"),
            ConfigError::InvertedBounds { min, max } => format!("min={min:?}; max={max:?}"),
            ConfigError::ZeroMaxAttempts => "max_attempts=0".to_string(),
            ConfigError::UnknownJitter(name) => format!("jitter={name}"),
        }
    }
}
