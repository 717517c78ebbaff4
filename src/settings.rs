//! # Serializable backoff settings.
//!
//! [`BackoffSettings`] is the shape a backoff takes in configuration files and
//! request bodies. Durations are whole milliseconds, field names are camelCase
//! and every field is optional:
//!
//! ```json
//! { "minMs": 100, "maxMs": 10000, "factor": 2.0, "jitter": false, "maxAttempts": 0 }
//! ```
//!
//! A field that is absent or zero takes the default: `minMs = 0` is 100ms,
//! `maxMs = 0` is 10s, `factor = 0` is 2.0 and `maxAttempts = 0` is unlimited.
//! An explicit zero minimum is only expressible through [`BackoffConfig`].

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::BackoffConfig;
use crate::error::ConfigError;
use crate::policies::{Backoff, JitterPolicy};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackoffSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factor: Option<f64>,
    pub jitter: bool,
    pub max_attempts: u32,
}

impl BackoffSettings {
    /// Converts to a [`BackoffConfig`] and builds the counter.
    pub fn build(&self) -> Result<Backoff, ConfigError> {
        Backoff::new(BackoffConfig::from(self))
    }
}

impl From<&BackoffSettings> for BackoffConfig {
    fn from(s: &BackoffSettings) -> Self {
        BackoffConfig {
            min: s.min_ms.filter(|ms| *ms > 0).map(Duration::from_millis),
            max: s.max_ms.filter(|ms| *ms > 0).map(Duration::from_millis),
            factor: s.factor.filter(|f| *f != 0.0),
            jitter: JitterPolicy::from(s.jitter),
            max_attempts: (s.max_attempts > 0).then_some(s.max_attempts),
        }
    }
}

impl From<BackoffSettings> for BackoffConfig {
    fn from(s: BackoffSettings) -> Self {
        BackoffConfig::from(&s)
    }
}
