//! Error types for element lookup
//!
//! A search fails in exactly one of three ways: every round came back empty,
//! the backend query itself failed, or the caller cancelled it.

use thiserror::Error;

/// Terminal failure of a single search invocation
#[derive(Debug, Error)]
pub enum FindError<E: std::error::Error + 'static> {
    /// Every bounded round came back with zero matches
    #[error("Element '{selector}' not found after maximum attempts.")]
    NotFound { selector: String, rounds: u32 },

    /// The backend query failed; never retried and reported as-is
    #[error(transparent)]
    Query(E),

    /// The cancellation token fired before a match was found
    #[error("Search for '{selector}' cancelled after {rounds} rounds")]
    Cancelled { selector: String, rounds: u32 },
}

impl<E: std::error::Error + 'static> FindError<E> {
    /// Selector the failed search was looking for, if the failure carries one
    #[must_use]
    pub fn selector(&self) -> Option<&str> {
        match self {
            FindError::NotFound { selector, .. } | FindError::Cancelled { selector, .. } => {
                Some(selector)
            }
            FindError::Query(_) => None,
        }
    }

    /// Number of query rounds that ran before the search settled
    #[must_use]
    pub fn rounds(&self) -> Option<u32> {
        match self {
            FindError::NotFound { rounds, .. } | FindError::Cancelled { rounds, .. } => {
                Some(*rounds)
            }
            FindError::Query(_) => None,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, FindError::NotFound { .. })
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FindError::Cancelled { .. })
    }
}

/// Raw attempt count outside the documented range
///
/// Only `-1` (unbounded) and bounds that fit a `u32` are meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid attempt count {0}: use -1 for unbounded retries or a bound in 0..=4294967295")]
pub struct InvalidAttempts(pub i64);
