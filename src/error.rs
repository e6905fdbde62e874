use crate::rainworms::RwAction;
use thiserror::Error;

/// Everything the game core can refuse to do.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RainwormsError {
    /// Malformed setup: bad dice count, empty stone bank, too few players.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A claim or steal named a stone that is not there.
    #[error("no stone numbered {number} can be claimed")]
    NoMatchingStone { number: u8 },
    /// The action is not among the legal actions of the current state.
    #[error("illegal action {action:?} in current state")]
    IllegalAction { action: RwAction },
    /// The game is over and the state can no longer change.
    #[error("the game is over, no further actions can be applied")]
    TerminalStateViolation,
}

pub type Result<T> = std::result::Result<T, RainwormsError>;
