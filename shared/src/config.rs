use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{DEFAULT_EVENTS_URL, DEFAULT_LOCATION_TIMEOUT_MS, DEFAULT_MAX_CACHED_AGE_MS};

pub const MIN_LOCATION_TIMEOUT_MS: u64 = 1_000;
pub const MAX_LOCATION_TIMEOUT_MS: u64 = 120_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid events url {url:?}: {reason}")]
    InvalidEventsUrl { url: String, reason: String },
    #[error("location timeout {0} ms is outside the supported range")]
    TimeoutOutOfRange(u64),
}

/// Options handed to the device position provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationOptions {
    pub high_accuracy: bool,
    pub timeout_ms: u64,
    pub maximum_age_ms: u64,
    /// Retry once at low accuracy when a high-accuracy fix times out or is
    /// unavailable.
    pub fallback_to_low_accuracy: bool,
}

impl Default for LocationOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_ms: DEFAULT_LOCATION_TIMEOUT_MS,
            maximum_age_ms: DEFAULT_MAX_CACHED_AGE_MS,
            fallback_to_low_accuracy: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub events_url: String,
    pub location: LocationOptions,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            events_url: DEFAULT_EVENTS_URL.to_string(),
            location: LocationOptions::default(),
        }
    }
}

impl ScreenConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = url::Url::parse(&self.events_url).map_err(|e| ConfigError::InvalidEventsUrl {
            url: self.events_url.clone(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEventsUrl {
                url: self.events_url.clone(),
                reason: format!("unsupported scheme {}", url.scheme()),
            });
        }

        let timeout = self.location.timeout_ms;
        if !(MIN_LOCATION_TIMEOUT_MS..=MAX_LOCATION_TIMEOUT_MS).contains(&timeout) {
            return Err(ConfigError::TimeoutOutOfRange(timeout));
        }

        Ok(())
    }
}
