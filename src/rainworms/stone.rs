use crate::error::{RainwormsError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A stone is claimed with a kept total of at least `number` and scores `worms` at the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Stone {
    pub number: u8,
    pub worms: u8,
}

impl Stone {
    pub fn new(number: u8, worms: u8) -> Stone {
        Stone { number, worms }
    }
}

impl fmt::Display for Stone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]({})", self.number, self.worms)
    }
}

/// The sixteen stones of a standard game: 21 to 36, one extra worm every four numbers.
pub fn standard_stones() -> Vec<Stone> {
    (21..=36)
        .map(|number| Stone::new(number, (number - 21) / 4 + 1))
        .collect()
}

///
/// The stones still in the middle of the table, kept in number order,
/// and the ones flipped out of the game.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoneBank {
    available: Vec<Stone>,
    flipped: Vec<Stone>,
}

impl StoneBank {
    pub fn new(mut stones: Vec<Stone>) -> Result<StoneBank> {
        if stones.is_empty() {
            return Err(RainwormsError::InvalidArgument(
                "the stone bank needs at least one stone".to_string(),
            ));
        }
        stones.sort();
        Ok(StoneBank {
            available: stones,
            flipped: vec![],
        })
    }

    pub fn available(&self) -> &[Stone] {
        &self.available
    }

    pub fn flipped(&self) -> &[Stone] {
        &self.flipped
    }

    pub fn is_empty(&self) -> bool {
        self.available.is_empty()
    }

    pub fn peek_top(&self) -> Option<Stone> {
        self.available.last().copied()
    }

    pub fn contains(&self, number: u8) -> bool {
        self.available.iter().any(|stone| stone.number == number)
    }

    pub fn take(&mut self, number: u8) -> Result<Stone> {
        match self
            .available
            .iter()
            .position(|stone| stone.number == number)
        {
            Some(index) => Ok(self.available.remove(index)),
            None => Err(RainwormsError::NoMatchingStone { number }),
        }
    }

    /// Turns the highest stone over, taking it out of the game.
    pub fn flip_top(&mut self) -> Option<Stone> {
        let stone = self.available.pop()?;
        self.flipped.push(stone);
        Some(stone)
    }

    ///
    /// Puts a stone back into the bank. Unless it is now the highest stone there,
    /// the highest stone is flipped and returned.
    ///
    pub fn return_stone(&mut self, stone: Stone) -> Option<Stone> {
        let index = self.available.partition_point(|other| *other <= stone);
        self.available.insert(index, stone);
        match self.peek_top() {
            Some(top) if stone.number < top.number => self.flip_top(),
            _ => None,
        }
    }

    /// Distinct numbers a kept total of `total` may take, lowest first
    pub fn claimable_numbers(&self, total: u8) -> Vec<u8> {
        let mut numbers: Vec<u8> = self
            .available
            .iter()
            .filter(|stone| stone.number <= total)
            .map(|stone| stone.number)
            .collect();
        numbers.dedup();
        numbers
    }

    pub fn stone_count(&self) -> usize {
        self.available.len() + self.flipped.len()
    }
}
