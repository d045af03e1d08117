use crate::round::{Action, RoundPhase};
use thiserror::Error;

/// Errors surfaced by the round engine. All of them are recoverable: the caller re-prompts and the
/// game state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlackjackGameError {
    #[error("invalid bet of {bet}, bet must be between {min} and {max}")]
    InvalidBet { bet: u32, min: u32, max: u32 },
    #[error("{action} is not available: {reason}")]
    InvalidAction { action: Action, reason: String },
    #[error("cannot {operation} while the round is {phase:?}")]
    WrongPhase {
        operation: &'static str,
        phase: RoundPhase,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl BlackjackGameError {
    pub(crate) fn invalid_action<S: Into<String>>(action: Action, reason: S) -> Self {
        BlackjackGameError::InvalidAction {
            action,
            reason: reason.into(),
        }
    }

    pub(crate) fn wrong_phase(operation: &'static str, phase: RoundPhase) -> Self {
        BlackjackGameError::WrongPhase { operation, phase }
    }
}
