use super::dice::MAX_DICE;
use super::stone::{standard_stones, Stone};
use crate::error::{RainwormsError, Result};
use serde::{Deserialize, Serialize};

/// What a bust costs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize, clap::ValueEnum,
)]
pub enum BustPenalty {
    /// The bank's highest stone is flipped out of the game
    #[default]
    FlipTop,
    /// The player's top stone goes back to the bank, then the bank's highest stone is flipped
    /// unless it is the stone that was just returned
    ReturnAndFlip,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GameSettings {
    pub player_count: u8,
    pub dice: u8,
    pub stones: Vec<Stone>,
    pub bust_penalty: BustPenalty,
    /// Claims need at least one kept Worm
    pub require_worm: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        GameSettings {
            player_count: 4,
            dice: 8,
            stones: standard_stones(),
            bust_penalty: BustPenalty::FlipTop,
            require_worm: false,
        }
    }
}

impl GameSettings {
    pub fn with_players(player_count: u8) -> GameSettings {
        GameSettings {
            player_count,
            ..GameSettings::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.player_count < 2 {
            return Err(RainwormsError::InvalidArgument(format!(
                "at least 2 players are needed, got {}",
                self.player_count
            )));
        }
        if self.dice == 0 || self.dice > MAX_DICE {
            return Err(RainwormsError::InvalidArgument(format!(
                "dice must be between 1 and {}, got {}",
                MAX_DICE, self.dice
            )));
        }
        if self.stones.is_empty() {
            return Err(RainwormsError::InvalidArgument(
                "the stone bank needs at least one stone".to_string(),
            ));
        }
        if let Some(stone) = self.stones.iter().find(|stone| stone.number == 0) {
            return Err(RainwormsError::InvalidArgument(format!(
                "stone {} can never be claimed",
                stone
            )));
        }
        Ok(())
    }
}
