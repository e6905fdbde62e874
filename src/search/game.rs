use crate::error::Result;
use std::fmt::Debug;
use std::hash::Hash;

pub trait Action: Debug + Clone + Copy + Eq + Hash + Send + Sync {
    type StateType: State<ActionType = Self>;
    fn execute(&self, state: &Self::StateType) -> Result<Self::StateType>;
    /// The action taken when a player has nothing else they may do
    fn forfeit() -> Self;
}

///
/// An actor is either a player or a game action.
///
/// A player is just an identifier, typically a number between 0 and n-1.
///
/// A game action is a action that the game takes, rather than a player.
#[derive(Debug)]
pub enum Actor<ActionType> {
    /// A player is just an identifier, typically a number between 0 and n-1.
    Player(u8),
    /// A game action is a action that the game takes (such as rolling dice), rather than a player.
    /// Each possible outcome is paired with its weight.
    GameAction(Vec<(ActionType, u32)>),
}

pub trait State: Clone + Eq + Hash + Send + Sync {
    type ActionType: Action<StateType = Self>;
    fn permitted_actions(&self) -> Vec<Self::ActionType>;
    fn next_actor(&self) -> Actor<Self::ActionType>;
    /// Nothing more can happen in this state until the game is stepped on to the next turn
    fn terminal(&self) -> bool;
}

/// Scores a state from the point of view of one player.
pub trait Evaluator<StateType: State>: Send + Sync {
    fn evaluate(&self, state: &StateType, observer: u8) -> f64;
}
