use super::state::GameState;
use crate::search::Evaluator;

/// The observer's own worm total.
#[derive(Debug, Clone, Copy, Default)]
pub struct Absolute;

/// The observer's worm total minus the best worm total among the other players.
#[derive(Debug, Clone, Copy, Default)]
pub struct Relative;

fn worms(state: &GameState, player: u8) -> f64 {
    state
        .player(player)
        .map(|player| player.score() as f64)
        .unwrap_or(0.0)
}

impl Evaluator<GameState> for Absolute {
    fn evaluate(&self, state: &GameState, observer: u8) -> f64 {
        worms(state, observer)
    }
}

impl Evaluator<GameState> for Relative {
    fn evaluate(&self, state: &GameState, observer: u8) -> f64 {
        let best_other = (0..state.players().len() as u8)
            .filter(|player| *player != observer)
            .map(|player| worms(state, player))
            .fold(0.0, f64::max);
        worms(state, observer) - best_other
    }
}
