use super::Bot;
use crate::error::Result;
use crate::rainworms::{GameState, RwAction};
use crate::search::Action;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Picks uniformly among the legal actions.
pub struct RandomBot {
    rng: StdRng,
}

impl RandomBot {
    pub fn new(seed: u64) -> RandomBot {
        RandomBot {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Bot for RandomBot {
    fn name(&self) -> String {
        "Random".to_string()
    }

    fn choose_action(&mut self, state: &GameState) -> Result<RwAction> {
        let actions = state.legal_actions();
        if actions.is_empty() {
            return Ok(RwAction::forfeit());
        }
        Ok(actions[self.rng.gen_range(0..actions.len())])
    }
}
