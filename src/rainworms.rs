//! The dice game: stones, dice, turns and the rules that connect them.
pub mod action;
pub mod dice;
pub mod evaluator;
pub mod legal;
pub mod settings;
pub mod state;
pub mod stone;

pub use action::RwAction;
pub use dice::{outcomes, DiceRoller, Face, Hand, MAX_DICE};
pub use evaluator::{Absolute, Relative};
pub use legal::ActionEnumerator;
pub use settings::{BustPenalty, GameSettings};
pub use state::{GameState, Phase, Player, TurnState};
pub use stone::{standard_stones, Stone, StoneBank};
