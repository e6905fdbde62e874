use super::dice::{Face, Hand};
use super::state::GameState;
use crate::error::Result;
use crate::search::Action;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RwAction {
    /// Roll every die not kept yet
    Roll,
    /// The dice landed; only the game takes this action
    Dice(Hand),
    /// Keep all dice of one face from the latest roll
    Keep(Face),
    /// Take the stone with this number from the bank
    Take(u8),
    /// Take another player's top stone with this number. When several opponents show it,
    /// the one in the lowest seat loses it.
    Steal(u8),
    /// Give up the turn and pay the bust penalty
    Bust,
}

impl RwAction {
    pub fn is_steal(&self) -> bool {
        matches!(self, RwAction::Steal(_))
    }

    pub fn claimed_number(&self) -> Option<u8> {
        match self {
            RwAction::Take(number) | RwAction::Steal(number) => Some(*number),
            _ => None,
        }
    }

    /// True for the actions that finish the turn
    pub fn ends_turn(&self) -> bool {
        matches!(
            self,
            RwAction::Take(_) | RwAction::Steal(_) | RwAction::Bust
        )
    }
}

impl fmt::Display for RwAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RwAction::Roll => write!(f, "Roll the dice."),
            RwAction::Dice(hand) => write!(f, "The dice show {}.", hand),
            RwAction::Keep(face) => write!(f, "Keep the dice with face {}.", face),
            RwAction::Take(number) => write!(f, "Take the stone {} from the bank.", number),
            RwAction::Steal(number) => {
                write!(f, "Steal the stone {} from another player.", number)
            }
            RwAction::Bust => write!(f, "Bust."),
        }
    }
}

impl Action for RwAction {
    type StateType = GameState;
    fn execute(&self, state: &GameState) -> Result<GameState> {
        let mut next = state.clone();
        next.apply(*self)?;
        Ok(next)
    }

    fn forfeit() -> Self {
        RwAction::Bust
    }
}
