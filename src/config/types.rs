//! Core configuration types for element lookup
//!
//! `FinderConfig` carries the retry policy a finder applies when a caller
//! asks for a selector without spelling out attempts and interval.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::finder::{Attempts, InvalidAttempts};
use crate::utils::DEFAULT_INTERVAL_MS;

/// Default retry policy for an `ElementFinder`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FinderConfig {
    /// Query rounds per search; `-1` in serialized form means unbounded
    pub(crate) attempts: Attempts,

    /// Delay between rounds in milliseconds
    pub(crate) interval_ms: u64,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            attempts: Attempts::default(),
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

/// Error types for configuration parsing and validation
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration JSON was malformed or carried an invalid value
    #[error("Invalid finder configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// Raw attempt count below -1
    #[error(transparent)]
    Attempts(#[from] InvalidAttempts),
}

impl FinderConfig {
    /// Parse a configuration supplied by the caller at startup
    ///
    /// Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Json` for malformed JSON, unknown fields, or an
    /// attempt count below -1.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to the same JSON shape `from_json_str` accepts
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Json` if serialization fails.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }
}
