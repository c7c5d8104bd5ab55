//! Failure conditions reported by generation and gameplay. Nothing here is
//! retried internally; callers decide whether to reprompt.

use thiserror::Error;

use crate::types::{Direction, Treasure};

/// Coarse classification for collaborators that only care whether the input
/// was malformed or the world simply disallowed the action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    InvalidState,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("dungeon needs at least one row and one column")]
    EmptyGrid,
    #[error("treasure and arrow percentage must be at most 100, got {0}")]
    PercentOutOfRange(u32),
    #[error("difficulty must be at least 1")]
    ZeroDifficulty,
    #[error("interconnectivity {requested} exceeds the {available} leftover candidate edges")]
    InterconnectivityTooHigh { requested: usize, available: usize },
    #[error("fewer than two caves to choose a start and end from")]
    TooFewCaves,
    #[error("no start/end cave pair far enough apart within the attempt budget")]
    StartEndTooClose,
    #[error("no door leads {0} from the current cell")]
    NoDoor(Direction),
    #[error("shot distance must be between 1 and 4, got {0}")]
    DistanceOutOfRange(usize),
    #[error("no arrows left to shoot")]
    OutOfArrows,
    #[error("no arrows to pick up here")]
    NoArrowsHere,
    #[error("no treasure to pick up here")]
    NoTreasureHere,
    #[error("no {0} present at this cell")]
    TreasureNotPresent(Treasure),
    #[error("the game is already won")]
    AlreadyWon,
    #[error("the game is already lost")]
    AlreadyLost,
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::EmptyGrid
            | GameError::PercentOutOfRange(_)
            | GameError::ZeroDifficulty
            | GameError::InterconnectivityTooHigh { .. }
            | GameError::TooFewCaves
            | GameError::StartEndTooClose
            | GameError::NoDoor(_)
            | GameError::DistanceOutOfRange(_)
            | GameError::NoArrowsHere
            | GameError::NoTreasureHere
            | GameError::TreasureNotPresent(_) => ErrorKind::InvalidArgument,
            GameError::OutOfArrows | GameError::AlreadyWon | GameError::AlreadyLost => {
                ErrorKind::InvalidState
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_failures_classify_separately_from_argument_failures() {
        assert_eq!(GameError::OutOfArrows.kind(), ErrorKind::InvalidState);
        assert_eq!(GameError::AlreadyLost.kind(), ErrorKind::InvalidState);
        assert_eq!(GameError::NoDoor(Direction::North).kind(), ErrorKind::InvalidArgument);
        assert_eq!(
            GameError::TreasureNotPresent(Treasure::Ruby).kind(),
            ErrorKind::InvalidArgument
        );
    }
}
