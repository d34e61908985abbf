//! Fluent builder for `FinderConfig`
//!
//! Raw attempt counts are validated in `build()` so that callers feeding
//! integers from their own configuration get a typed error instead of a
//! silently clamped policy.

use std::time::Duration;

use super::types::{ConfigError, FinderConfig};
use crate::finder::Attempts;
use crate::utils::{DEFAULT_ATTEMPTS, DEFAULT_INTERVAL_MS};

#[derive(Debug, Clone)]
pub struct FinderConfigBuilder {
    pub(crate) attempts: i64,
    pub(crate) interval_ms: u64,
}

impl Default for FinderConfigBuilder {
    fn default() -> Self {
        Self {
            attempts: i64::from(DEFAULT_ATTEMPTS),
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

impl FinderConfig {
    /// Create a builder for configuring a `FinderConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> FinderConfigBuilder {
        FinderConfigBuilder::default()
    }
}

impl FinderConfigBuilder {
    #[must_use]
    pub fn attempts(mut self, attempts: Attempts) -> Self {
        self.attempts = attempts.into();
        self
    }

    /// Set attempts from the raw integer contract (`-1` = unbounded)
    #[must_use]
    pub fn raw_attempts(mut self, attempts: i64) -> Self {
        self.attempts = attempts;
        self
    }

    #[must_use]
    pub fn unbounded(self) -> Self {
        self.attempts(Attempts::Unbounded)
    }

    /// Interval between rounds; sub-millisecond precision is dropped
    #[must_use]
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn interval_ms(mut self, interval_ms: u64) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    /// # Errors
    ///
    /// Returns `ConfigError::Attempts` when the raw attempt count is below -1.
    pub fn build(self) -> Result<FinderConfig, ConfigError> {
        Ok(FinderConfig {
            attempts: Attempts::try_from(self.attempts)?,
            interval_ms: self.interval_ms,
        })
    }
}
