use super::Bot;
use crate::error::Result;
use crate::rainworms::{Face, GameState, Phase, RwAction};
use crate::search::Action;
use log::trace;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GreedySettings {
    /// Distinct kept faces needed before the bot claims a stone
    pub threshold: usize,
}

impl Default for GreedySettings {
    fn default() -> Self {
        GreedySettings { threshold: 3 }
    }
}

///
/// Keeps the highest ranked face of every roll and claims the highest stone it can
/// once enough distinct faces are kept.
///
/// The stealing variant takes any legal steal straight away, and prefers keeps that
/// bring the total to an opponent's top stone.
///
pub struct GreedyBot {
    threshold: usize,
    stealing: bool,
}

impl GreedyBot {
    pub fn new(threshold: usize) -> GreedyBot {
        GreedyBot {
            threshold,
            stealing: false,
        }
    }

    pub fn stealing(threshold: usize) -> GreedyBot {
        GreedyBot {
            threshold,
            stealing: true,
        }
    }

    fn best_keep(actions: &[RwAction]) -> Option<RwAction> {
        actions
            .iter()
            .filter_map(|action| match action {
                RwAction::Keep(face) => Some((*face, *action)),
                _ => None,
            })
            .max_by_key(|(face, _)| face.rank())
            .map(|(_, action)| action)
    }

    /// True when keeping `face` makes the kept total equal an opponent's top stone
    fn keep_enables_steal(state: &GameState, face: Face) -> bool {
        let turn = state.turn();
        let mut kept = turn.kept;
        kept.add(face, turn.rolled.count(face));
        if state.require_worm() && kept.count(Face::Worm) == 0 {
            return false;
        }
        state.steal_target(kept.total()).is_some()
    }

    /// Keeps that set up a steal outrank every other keep; face rank breaks ties
    fn best_stealing_keep(state: &GameState, actions: &[RwAction]) -> Option<RwAction> {
        actions
            .iter()
            .filter_map(|action| match action {
                RwAction::Keep(face) => Some((*face, *action)),
                _ => None,
            })
            .max_by_key(|(face, _)| (GreedyBot::keep_enables_steal(state, *face), face.rank()))
            .map(|(_, action)| action)
    }

    /// Highest number wins; on equal numbers the action listed first does
    fn best_claim(actions: &[RwAction]) -> Option<RwAction> {
        let mut best: Option<(u8, RwAction)> = None;
        for action in actions {
            if let Some(number) = action.claimed_number() {
                if best.map_or(true, |(best_number, _)| number > best_number) {
                    best = Some((number, *action));
                }
            }
        }
        best.map(|(_, action)| action)
    }
}

impl Bot for GreedyBot {
    fn name(&self) -> String {
        if self.stealing {
            "GreedyStealing".to_string()
        } else {
            "Greedy".to_string()
        }
    }

    fn choose_action(&mut self, state: &GameState) -> Result<RwAction> {
        let actions = state.legal_actions();
        let choice = match state.turn().phase {
            Phase::PickDice if self.stealing => GreedyBot::best_stealing_keep(state, &actions),
            Phase::PickDice => GreedyBot::best_keep(&actions),
            Phase::RollOrClaim => {
                let steal = actions.iter().copied().find(RwAction::is_steal);
                let can_roll = actions.contains(&RwAction::Roll);
                if self.stealing && steal.is_some() {
                    steal
                } else if can_roll && state.turn().kept.distinct() < self.threshold {
                    Some(RwAction::Roll)
                } else {
                    GreedyBot::best_claim(&actions).or(can_roll.then_some(RwAction::Roll))
                }
            }
            Phase::AwaitingRoll | Phase::TurnOver => None,
        };
        let action = choice
            .or_else(|| actions.first().copied())
            .unwrap_or_else(RwAction::forfeit);
        trace!("{} picks {:?} from {:?}", self.name(), action, actions);
        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rainworms::{GameSettings, Hand};

    fn rolled(counts: [u8; 6]) -> GameState {
        let mut state = GameState::new(&GameSettings::with_players(2)).unwrap();
        state.apply(RwAction::Roll).unwrap();
        state
            .apply(RwAction::Dice(Hand::from_counts(counts)))
            .unwrap();
        state
    }

    #[test]
    fn test_keeps_worms_over_fives() {
        let state = rolled([1, 0, 0, 1, 3, 3]);
        let mut bot = GreedyBot::new(3);
        assert_eq!(
            bot.choose_action(&state).unwrap(),
            RwAction::Keep(Face::Worm)
        );
    }

    #[test]
    fn test_stealing_keeps_the_face_that_sets_up_a_steal() {
        let mut state = GameState::new(&GameSettings::with_players(2)).unwrap();
        state.deal_stone(1, 24).unwrap();
        state.apply(RwAction::Roll).unwrap();
        state
            .apply(RwAction::Dice(Hand::from_counts([1, 1, 1, 1, 1, 3])))
            .unwrap();
        state.apply(RwAction::Keep(Face::Worm)).unwrap();
        state.apply(RwAction::Roll).unwrap();
        state
            .apply(RwAction::Dice(Hand::from_counts([0, 0, 3, 0, 2, 0])))
            .unwrap();

        // Three 3s on top of 15 make 24, player 1's stone; the 5s would make 25
        assert_eq!(
            GreedyBot::stealing(3).choose_action(&state).unwrap(),
            RwAction::Keep(Face::Three)
        );
        assert_eq!(
            GreedyBot::new(3).choose_action(&state).unwrap(),
            RwAction::Keep(Face::Five)
        );

        state.apply(RwAction::Keep(Face::Three)).unwrap();
        assert_eq!(
            state.legal_actions(),
            vec![
                RwAction::Roll,
                RwAction::Take(21),
                RwAction::Take(22),
                RwAction::Take(23),
                RwAction::Steal(24)
            ]
        );
        assert_eq!(
            GreedyBot::stealing(3).choose_action(&state).unwrap(),
            RwAction::Steal(24)
        );
    }

    #[test]
    fn test_stealing_keep_falls_back_to_rank() {
        let mut state = GameState::new(&GameSettings::with_players(2)).unwrap();
        state.deal_stone(1, 36).unwrap();
        state.apply(RwAction::Roll).unwrap();
        state
            .apply(RwAction::Dice(Hand::from_counts([2, 0, 0, 2, 3, 1])))
            .unwrap();
        assert_eq!(
            GreedyBot::stealing(3).choose_action(&state).unwrap(),
            RwAction::Keep(Face::Worm)
        );
    }

    #[test]
    fn test_rolls_below_threshold() {
        let mut state = rolled([0, 0, 0, 0, 3, 5]);
        state.apply(RwAction::Keep(Face::Worm)).unwrap();
        assert_eq!(
            GreedyBot::new(2).choose_action(&state).unwrap(),
            RwAction::Roll
        );
        assert_eq!(
            GreedyBot::new(1).choose_action(&state).unwrap(),
            RwAction::Take(25)
        );
    }

    #[test]
    fn test_busts_when_nothing_else() {
        let mut state = rolled([0, 0, 0, 0, 4, 4]);
        state.apply(RwAction::Keep(Face::Worm)).unwrap();
        state.apply(RwAction::Roll).unwrap();
        state
            .apply(RwAction::Dice(Hand::from_counts([0, 0, 0, 0, 0, 4])))
            .unwrap();
        assert_eq!(
            GreedyBot::new(3).choose_action(&state).unwrap(),
            RwAction::Bust
        );
    }

    #[test]
    fn test_best_claim_prefers_take_on_equal_numbers() {
        let actions = [
            RwAction::Roll,
            RwAction::Take(21),
            RwAction::Take(25),
            RwAction::Steal(25),
        ];
        assert_eq!(GreedyBot::best_claim(&actions), Some(RwAction::Take(25)));
    }
}
