//! Getter methods for `FinderConfig`

use std::time::Duration;

use super::types::FinderConfig;
use crate::finder::Attempts;

impl FinderConfig {
    #[must_use]
    pub fn attempts(&self) -> Attempts {
        self.attempts
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    #[must_use]
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }
}
