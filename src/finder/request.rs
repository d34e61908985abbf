//! Search request types
//!
//! `SearchRequest` is the immutable description of one invocation. The raw
//! integer attempt contract (`-1` means forever) is parsed into [`Attempts`]
//! at the edge so the state machine never sees a sentinel value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::errors::InvalidAttempts;
use crate::config::FinderConfig;
use crate::utils::{DEFAULT_ATTEMPTS, DEFAULT_INTERVAL_MS, UNBOUNDED_ATTEMPTS};

/// How many query rounds a search may run
///
/// Serialized as the raw integer form: `-1` for unbounded, otherwise the bound.
/// Raw values below `-1` or above `u32::MAX` are rejected with [`InvalidAttempts`].
///
/// A bound counts total rounds, so `Bounded(1)` and `Bounded(0)` both run a
/// single round. Loops written as `for i in 0..=attempts` run `attempts + 1`
/// rounds; pass one more than their count to keep the same patience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Attempts {
    /// At most this many rounds; the first round always runs
    Bounded(u32),
    /// Retry until a match appears
    Unbounded,
}

impl Attempts {
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Attempts::Unbounded)
    }
}

impl Default for Attempts {
    fn default() -> Self {
        Attempts::Bounded(DEFAULT_ATTEMPTS)
    }
}

impl TryFrom<i64> for Attempts {
    type Error = InvalidAttempts;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        match raw {
            UNBOUNDED_ATTEMPTS => Ok(Attempts::Unbounded),
            n => u32::try_from(n)
                .map(Attempts::Bounded)
                .map_err(|_| InvalidAttempts(n)),
        }
    }
}

impl From<Attempts> for i64 {
    fn from(attempts: Attempts) -> Self {
        match attempts {
            Attempts::Bounded(n) => i64::from(n),
            Attempts::Unbounded => UNBOUNDED_ATTEMPTS,
        }
    }
}

impl fmt::Display for Attempts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attempts::Bounded(n) => write!(f, "{n}"),
            Attempts::Unbounded => f.write_str("unbounded"),
        }
    }
}

/// One search invocation: what to look for and how patiently
#[derive(Debug, Clone)]
pub struct SearchRequest {
    selector: String,
    attempts: Attempts,
    interval: Duration,
    cancel: Option<CancellationToken>,
}

impl SearchRequest {
    /// Request with the default policy (10 rounds, 100ms apart)
    ///
    /// The selector is passed verbatim to the backend; a malformed selector
    /// surfaces as the backend's query error on the first round.
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            attempts: Attempts::default(),
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            cancel: None,
        }
    }

    /// Request using the attempt and interval defaults of `config`
    pub fn from_config(selector: impl Into<String>, config: &FinderConfig) -> Self {
        Self::new(selector)
            .with_attempts(config.attempts())
            .with_interval(config.interval())
    }

    /// Request from the raw integer contract
    ///
    /// # Errors
    ///
    /// Returns `InvalidAttempts` when `attempts` is below `-1`.
    pub fn from_raw(
        selector: impl Into<String>,
        attempts: i64,
        interval_ms: u64,
    ) -> Result<Self, InvalidAttempts> {
        Ok(Self::new(selector)
            .with_attempts(Attempts::try_from(attempts)?)
            .with_interval(Duration::from_millis(interval_ms)))
    }

    #[must_use]
    pub fn with_attempts(mut self, attempts: Attempts) -> Self {
        self.attempts = attempts;
        self
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Attach a token that moves the search to its `Cancelled` state
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    #[must_use]
    pub fn attempts(&self) -> Attempts {
        self.attempts
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[must_use]
    pub fn cancellation(&self) -> Option<&CancellationToken> {
        self.cancel.as_ref()
    }
}
