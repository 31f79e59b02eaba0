//! Error types for the rules engine.
//!
//! `ActionError` covers every recoverable rejection of a player action; the turn does
//! not advance and the caller may retry. `SetupError` aborts game creation.

use thiserror::Error;

use crate::config::game::{MAX_PLAYERS, MIN_PLAYERS};
use crate::game::types::{CamelColor, CharacterType, GamePhase};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("No active player")]
    NoActivePlayer,

    #[error("It is not your turn")]
    NotYourTurn,

    #[error("Action not allowed during the {0} phase")]
    WrongPhase(GamePhase),

    #[error("No leg-bet cards left for the {0} camel")]
    NoCardsLeft(CamelColor),

    #[error("All dice have been rolled, the leg is over")]
    PyramidEmpty,

    #[error("Cannot place a spectator tile at position {0} (out of bounds, occupied, or next to another tile)")]
    InvalidTilePosition(u32),

    #[error("Your spectator tile is already on the track")]
    TileAlreadyPlaced,

    #[error("Only the {0} can use this skill")]
    NotYourCharacter(CharacterType),

    #[error("Skill already used this leg")]
    SkillAlreadyUsed,

    #[error("You have no spectator tile on the track")]
    NoTilePlaced,
}

impl ActionError {
    /// Stable machine-readable code for client error frames.
    pub fn code(&self) -> &'static str {
        match self {
            ActionError::NoActivePlayer => "NO_ACTIVE_PLAYER",
            ActionError::NotYourTurn => "NOT_YOUR_TURN",
            ActionError::WrongPhase(_) => "WRONG_PHASE",
            ActionError::NoCardsLeft(_) => "NO_CARDS_LEFT",
            ActionError::PyramidEmpty => "PYRAMID_EMPTY",
            ActionError::InvalidTilePosition(_) => "INVALID_TILE_POSITION",
            ActionError::TileAlreadyPlaced => "TILE_ALREADY_PLACED",
            ActionError::NotYourCharacter(_) => "NOT_YOUR_CHARACTER",
            ActionError::SkillAlreadyUsed => "SKILL_ALREADY_USED",
            ActionError::NoTilePlaced => "NO_TILE_PLACED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("Player count must be between {min} and {max}, got {0}", min = MIN_PLAYERS, max = MAX_PLAYERS)]
    PlayerCount(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_human_readable() {
        let err = ActionError::NoCardsLeft(CamelColor::Red);
        assert_eq!(err.to_string(), "No leg-bet cards left for the red camel");
        assert_eq!(err.code(), "NO_CARDS_LEFT");

        let err = SetupError::PlayerCount(9);
        assert_eq!(err.to_string(), "Player count must be between 2 and 8, got 9");
    }
}
