use crate::bots::Bot;
use crate::error::{RainwormsError, Result};
use crate::rainworms::{DiceRoller, GameSettings, GameState, Phase, RwAction};
use crate::search::{Actor, State};
use log::{debug, info, warn};

///
/// Owns the authoritative game state and plays it to the end.
///
/// Bots only ever see the state through a shared reference; the driver rolls the dice
/// and applies every action.
///
pub struct GameDriver {
    state: GameState,
    bots: Vec<Box<dyn Bot>>,
    roller: DiceRoller,
}

impl GameDriver {
    pub fn new(
        settings: &GameSettings,
        bots: Vec<Box<dyn Bot>>,
        roller: DiceRoller,
    ) -> Result<GameDriver> {
        GameDriver::from_state(GameState::new(settings)?, bots, roller)
    }

    pub fn from_state(
        state: GameState,
        bots: Vec<Box<dyn Bot>>,
        roller: DiceRoller,
    ) -> Result<GameDriver> {
        if bots.len() != state.players().len() {
            return Err(RainwormsError::InvalidArgument(format!(
                "{} bots for {} players",
                bots.len(),
                state.players().len()
            )));
        }
        Ok(GameDriver {
            state,
            bots,
            roller,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn bot_names(&self) -> Vec<String> {
        self.bots.iter().map(|bot| bot.name()).collect()
    }

    /// Applies one action: the current bot's choice, or the dice landing.
    pub fn step(&mut self) -> Result<RwAction> {
        if self.state.is_game_over() {
            return Err(RainwormsError::TerminalStateViolation);
        }
        if self.state.turn().phase == Phase::TurnOver {
            self.state.end_turn()?;
        }
        let action = match self.state.next_actor() {
            Actor::GameAction(_) => {
                let hand = self.roller.roll_hand(self.state.dice_remaining())?;
                debug!("Player {} rolls {}", self.state.current_player(), hand);
                RwAction::Dice(hand)
            }
            Actor::Player(player) => {
                let action = self.bots[player as usize].choose_action(&self.state)?;
                debug!("Player {} plays {}", player, action);
                action
            }
        };
        self.state.apply(action)?;
        Ok(action)
    }

    /// Plays the current turn to its end and hands the dice to the next player.
    pub fn play_turn(&mut self) -> Result<()> {
        loop {
            if self.step()?.ends_turn() {
                break;
            }
        }
        if self.state.stones_accounted_for() != self.state.initial_stone_count() {
            warn!(
                "{} stones on the table, expected {}",
                self.state.stones_accounted_for(),
                self.state.initial_stone_count()
            );
        }
        if !self.state.is_game_over() {
            self.state.end_turn()?;
        }
        Ok(())
    }

    /// Plays until the bank is empty and returns every player's worm total.
    pub fn run(&mut self) -> Result<Vec<u32>> {
        while !self.state.is_game_over() {
            self.play_turn()?;
        }
        let scores = self.state.scores();
        info!(
            "Game over after {} turns, scores {:?}",
            self.state.turn_number() + 1,
            scores
        );
        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bots::{GreedyBot, RandomBot};
    use crate::rainworms::BustPenalty;

    fn greedy_bots(count: usize) -> Vec<Box<dyn Bot>> {
        (0..count)
            .map(|_| Box::new(GreedyBot::new(3)) as Box<dyn Bot>)
            .collect()
    }

    #[test]
    fn test_bot_count_must_match() {
        let result = GameDriver::new(
            &GameSettings::with_players(3),
            greedy_bots(2),
            DiceRoller::from_seed(0),
        );
        assert!(matches!(result, Err(RainwormsError::InvalidArgument(_))));
    }

    #[test]
    fn test_greedy_game_runs_to_the_end() {
        let mut driver = GameDriver::new(
            &GameSettings::with_players(4),
            greedy_bots(4),
            DiceRoller::from_seed(7),
        )
        .unwrap();
        let scores = driver.run().unwrap();
        assert_eq!(scores.len(), 4);
        assert!(driver.state().is_game_over());
        assert_eq!(driver.state().stones_accounted_for(), 16);
        let held: u32 = scores.iter().sum();
        let flipped: u32 = driver
            .state()
            .bank()
            .flipped()
            .iter()
            .map(|stone| stone.worms as u32)
            .sum();
        assert_eq!(held + flipped, 40);
        assert_eq!(driver.step(), Err(RainwormsError::TerminalStateViolation));
    }

    #[test]
    fn test_step_alternates_bot_and_dice() {
        let mut driver = GameDriver::new(
            &GameSettings::with_players(2),
            greedy_bots(2),
            DiceRoller::from_seed(5),
        )
        .unwrap();
        assert_eq!(driver.step().unwrap(), RwAction::Roll);
        match driver.step().unwrap() {
            RwAction::Dice(hand) => assert_eq!(hand.len(), 8),
            other => panic!("expected the dice to land, got {:?}", other),
        }
        assert_eq!(driver.state().turn().phase, Phase::PickDice);
        assert!(matches!(driver.step().unwrap(), RwAction::Keep(_)));
    }

    #[test]
    fn test_play_turn_passes_the_dice() {
        let bots: Vec<Box<dyn Bot>> = vec![Box::new(RandomBot::new(1)), Box::new(RandomBot::new(2))];
        let mut driver =
            GameDriver::new(&GameSettings::with_players(2), bots, DiceRoller::from_seed(3))
                .unwrap();
        driver.play_turn().unwrap();
        if !driver.state().is_game_over() {
            assert_eq!(driver.state().current_player(), 1);
            assert_eq!(driver.state().turn_number(), 1);
            assert_eq!(driver.state().turn().phase, Phase::RollOrClaim);
        }
    }

    #[test]
    fn test_classic_bust_rule_game() {
        let settings = GameSettings {
            player_count: 3,
            bust_penalty: BustPenalty::ReturnAndFlip,
            ..GameSettings::default()
        };
        let mut driver =
            GameDriver::new(&settings, greedy_bots(3), DiceRoller::from_seed(11)).unwrap();
        while !driver.state().is_game_over() {
            driver.play_turn().unwrap();
            assert_eq!(driver.state().stones_accounted_for(), 16);
        }
    }
}
