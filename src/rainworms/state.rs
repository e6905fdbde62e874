use super::action::RwAction;
use super::dice::{outcomes, Hand};
use super::legal::ActionEnumerator;
use super::settings::{BustPenalty, GameSettings};
use super::stone::{Stone, StoneBank};
use crate::error::{RainwormsError, Result};
use crate::search::{Actor, State};
use log::{debug, trace};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Roll the remaining dice or claim a stone with the kept total
    RollOrClaim,
    /// The dice are in the air
    AwaitingRoll,
    /// Pick a face from the latest roll
    PickDice,
    /// A stone was claimed or the player went bust
    TurnOver,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TurnState {
    pub phase: Phase,
    pub kept: Hand,
    pub rolled: Hand,
    pub bust: bool,
}

impl TurnState {
    fn fresh() -> TurnState {
        TurnState {
            phase: Phase::RollOrClaim,
            kept: Hand::default(),
            rolled: Hand::default(),
            bust: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Player {
    stones: Vec<Stone>,
}

impl Player {
    /// Bottom of the stack first
    pub fn stones(&self) -> &[Stone] {
        &self.stones
    }

    pub fn top_stone(&self) -> Option<Stone> {
        self.stones.last().copied()
    }

    pub fn score(&self) -> u32 {
        self.stones.iter().map(|stone| stone.worms as u32).sum()
    }

    fn give_stone(&mut self, stone: Stone) {
        self.stones.push(stone);
    }

    fn take_top_stone(&mut self) -> Option<Stone> {
        self.stones.pop()
    }
}

///
/// The whole table: every player's stones, the bank, and the turn in progress.
///
/// Only `apply` and `end_turn` change it, and both refuse to once the bank is empty.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameState {
    players: Vec<Player>,
    bank: StoneBank,
    current_player: u8,
    turn: TurnState,
    turn_number: u32,
    dice: u8,
    bust_penalty: BustPenalty,
    require_worm: bool,
    stone_count: usize,
}

impl GameState {
    pub fn new(settings: &GameSettings) -> Result<GameState> {
        settings.validate()?;
        Ok(GameState {
            players: vec![Player::default(); settings.player_count as usize],
            bank: StoneBank::new(settings.stones.clone())?,
            current_player: 0,
            turn: TurnState::fresh(),
            turn_number: 0,
            dice: settings.dice,
            bust_penalty: settings.bust_penalty,
            require_worm: settings.require_worm,
            stone_count: settings.stones.len(),
        })
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, index: u8) -> Option<&Player> {
        self.players.get(index as usize)
    }

    pub fn bank(&self) -> &StoneBank {
        &self.bank
    }

    pub fn current_player(&self) -> u8 {
        self.current_player
    }

    pub fn turn(&self) -> &TurnState {
        &self.turn
    }

    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    pub fn dice(&self) -> u8 {
        self.dice
    }

    pub fn dice_remaining(&self) -> u8 {
        self.dice - self.turn.kept.len()
    }

    pub fn kept_total(&self) -> u8 {
        self.turn.kept.total()
    }

    pub fn require_worm(&self) -> bool {
        self.require_worm
    }

    pub fn is_game_over(&self) -> bool {
        self.bank.is_empty()
    }

    pub fn scores(&self) -> Vec<u32> {
        self.players.iter().map(Player::score).collect()
    }

    pub fn initial_stone_count(&self) -> usize {
        self.stone_count
    }

    /// Stones held by players, left in the bank or flipped. Equal to the initial count at all times.
    pub fn stones_accounted_for(&self) -> usize {
        self.players
            .iter()
            .map(|player| player.stones.len())
            .sum::<usize>()
            + self.bank.stone_count()
    }

    /// Seats other than the current player's, in seat order
    pub fn opponents(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.players.len()).filter(move |i| *i != self.current_player as usize)
    }

    /// First opponent in seat order whose top stone has this number. Seat order only
    /// decides anything when the stone set repeats a number.
    pub fn steal_target(&self, number: u8) -> Option<usize> {
        self.opponents().find(|i| {
            self.players[*i]
                .top_stone()
                .is_some_and(|stone| stone.number == number)
        })
    }

    ///
    /// Setup helper: moves the bank stone `number` onto `player`'s stack.
    ///
    pub fn deal_stone(&mut self, player: u8, number: u8) -> Result<()> {
        if player as usize >= self.players.len() {
            return Err(RainwormsError::InvalidArgument(format!(
                "there is no player {}",
                player
            )));
        }
        let stone = self.bank.take(number)?;
        self.players[player as usize].give_stone(stone);
        Ok(())
    }

    pub fn legal_actions(&self) -> Vec<RwAction> {
        ActionEnumerator::new(self).actions()
    }

    /// Every roll the dice in the air can land on, weighted by how likely it is
    pub fn roll_outcomes(&self) -> Vec<(RwAction, u32)> {
        if self.turn.phase != Phase::AwaitingRoll {
            return vec![];
        }
        outcomes(self.dice_remaining())
            .map(|outcomes| {
                outcomes
                    .iter()
                    .map(|(hand, weight)| (RwAction::Dice(*hand), *weight))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn apply(&mut self, action: RwAction) -> Result<()> {
        if self.is_game_over() {
            return Err(RainwormsError::TerminalStateViolation);
        }
        let legal = match action {
            RwAction::Dice(hand) => {
                self.turn.phase == Phase::AwaitingRoll && hand.len() == self.dice_remaining()
            }
            _ => self.legal_actions().contains(&action),
        };
        if !legal {
            return Err(RainwormsError::IllegalAction { action });
        }
        trace!("Player {} applies {:?}", self.current_player, action);

        let current = self.current_player as usize;
        match action {
            RwAction::Roll => self.turn.phase = Phase::AwaitingRoll,
            RwAction::Dice(hand) => {
                self.turn.rolled = hand;
                self.turn.phase = Phase::PickDice;
            }
            RwAction::Keep(face) => {
                let count = self.turn.rolled.count(face);
                self.turn.kept.add(face, count);
                self.turn.rolled = Hand::default();
                self.turn.phase = Phase::RollOrClaim;
            }
            RwAction::Take(number) => {
                let stone = self.bank.take(number)?;
                self.players[current].give_stone(stone);
                self.turn.phase = Phase::TurnOver;
            }
            RwAction::Steal(number) => {
                let victim = self
                    .steal_target(number)
                    .ok_or(RainwormsError::NoMatchingStone { number })?;
                let stone = self.players[victim]
                    .take_top_stone()
                    .ok_or(RainwormsError::NoMatchingStone { number })?;
                trace!("Player {} steals {} from player {}", current, stone, victim);
                self.players[current].give_stone(stone);
                self.turn.phase = Phase::TurnOver;
            }
            RwAction::Bust => self.bust(),
        }
        Ok(())
    }

    fn bust(&mut self) {
        let current = self.current_player as usize;
        let flipped = match self.bust_penalty {
            BustPenalty::FlipTop => self.bank.flip_top(),
            BustPenalty::ReturnAndFlip => match self.players[current].take_top_stone() {
                Some(stone) => {
                    trace!("Player {} returns {}", current, stone);
                    self.bank.return_stone(stone)
                }
                None => None,
            },
        };
        trace!("Player {} is bust, flipped {:?}", current, flipped);
        self.turn.bust = true;
        self.turn.rolled = Hand::default();
        self.turn.phase = Phase::TurnOver;
    }

    /// Passes the dice to the next seat once the current turn is over.
    pub fn end_turn(&mut self) -> Result<()> {
        if self.is_game_over() {
            return Err(RainwormsError::TerminalStateViolation);
        }
        if self.turn.phase != Phase::TurnOver {
            return Err(RainwormsError::InvalidArgument(format!(
                "player {} has not finished their turn",
                self.current_player
            )));
        }
        self.current_player = (self.current_player + 1) % self.players.len() as u8;
        self.turn = TurnState::fresh();
        self.turn_number += 1;
        debug!(
            "Turn {}: player {} to play",
            self.turn_number, self.current_player
        );
        Ok(())
    }
}

impl State for GameState {
    type ActionType = RwAction;

    fn permitted_actions(&self) -> Vec<RwAction> {
        self.legal_actions()
    }

    fn next_actor(&self) -> Actor<RwAction> {
        match self.turn.phase {
            Phase::AwaitingRoll => Actor::GameAction(self.roll_outcomes()),
            _ => Actor::Player(self.current_player),
        }
    }

    fn terminal(&self) -> bool {
        self.turn.phase == Phase::TurnOver || self.is_game_over()
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, player) in self.players.iter().enumerate() {
            writeln!(
                f,
                "Player {}: ({} worms) - {}",
                i,
                player.score(),
                player
                    .stones
                    .iter()
                    .map(|stone| stone.to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            )?;
        }
        writeln!(
            f,
            "Bank: {}",
            self.bank
                .available()
                .iter()
                .map(|stone| stone.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        )?;
        if !self.bank.flipped().is_empty() {
            writeln!(
                f,
                "Flipped: {}",
                self.bank
                    .flipped()
                    .iter()
                    .map(|stone| stone.to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            )?;
        }
        if self.is_game_over() {
            return writeln!(f, "Game over. Scores: {:?}", self.scores());
        }
        write!(
            f,
            "Player {} to play ({:?}): kept {} for {}, {} dice left",
            self.current_player,
            self.turn.phase,
            self.turn.kept,
            self.kept_total(),
            self.dice_remaining()
        )?;
        if self.turn.phase == Phase::PickDice {
            write!(f, ", rolled {}", self.turn.rolled)?;
        }
        writeln!(f)
    }
}
