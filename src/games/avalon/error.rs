//! Error types for Avalon transitions.

use thiserror::Error;

use super::types::{Phase, SeatMask};

/// Every variant is raised before the game state is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AvalonError {
    /// Proposal does not name exactly the number of seats the round requires.
    #[error("invalid team size for round {round}: expected {expected} seats, got {actual}")]
    InvalidTeamSize {
        round: usize,
        expected: usize,
        actual: usize,
    },

    /// Action kind does not belong to the current phase.
    #[error("{action} action submitted during {phase} phase")]
    PhaseMismatch { phase: Phase, action: Phase },

    /// Assassination names more than one seat.
    #[error("assassination must target at most one seat, got {selected}")]
    InvalidAssassinationTarget { selected: SeatMask },

    /// Internal bookkeeping is broken. Not a game-legal condition; do not retry.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

impl AvalonError {
    /// Caller errors can be retried with a corrected action.
    pub fn is_contract_violation(&self) -> bool {
        !matches!(self, AvalonError::InvariantViolation(_))
    }
}
