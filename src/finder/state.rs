//! Per-invocation retry state
//!
//! The state machine is `Searching -> {Searching, Succeeded, Failed}` plus a
//! terminal `Cancelled`. Only the empty-round transition needs bookkeeping,
//! so that is all `SearchState` tracks; success and cancellation are decided
//! by the driver loop.

use super::request::Attempts;

/// Decision after a round that matched nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Wait one interval and run another round
    Retry,
    /// Bounded budget spent; settle as not found
    Exhausted,
}

/// Mutable counters for one search invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    /// `None` in unbounded mode; never decremented there
    remaining: Option<u32>,
    rounds: u32,
}

impl SearchState {
    #[must_use]
    pub fn new(attempts: Attempts) -> Self {
        Self {
            remaining: match attempts {
                Attempts::Bounded(n) => Some(n),
                Attempts::Unbounded => None,
            },
            rounds: 0,
        }
    }

    /// Record the start of a round and return its 1-based number
    pub fn begin_round(&mut self) -> u32 {
        self.rounds = self.rounds.saturating_add(1);
        self.rounds
    }

    /// Charge an empty round against the budget and decide what happens next
    ///
    /// A bound of `n` allows `n` rounds in total; a bound of 0 still gets the
    /// first round.
    pub fn settle_empty_round(&mut self) -> Step {
        match &mut self.remaining {
            None => Step::Retry,
            Some(remaining) => {
                *remaining = remaining.saturating_sub(1);
                if *remaining > 0 {
                    Step::Retry
                } else {
                    Step::Exhausted
                }
            }
        }
    }

    #[must_use]
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Rounds left in bounded mode, `None` when unbounded
    #[must_use]
    pub fn remaining(&self) -> Option<u32> {
        self.remaining
    }
}
