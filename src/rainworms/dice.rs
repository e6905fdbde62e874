use crate::error::{RainwormsError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Most dice a game can be set up with. Every outcome weight of this many dice fits a `u32`.
pub const MAX_DICE: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Face {
    One,
    Two,
    Three,
    Four,
    Five,
    Worm,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::One,
        Face::Two,
        Face::Three,
        Face::Four,
        Face::Five,
        Face::Worm,
    ];

    /// Points the face adds to the kept total. A Worm counts as 5.
    pub fn value(self) -> u8 {
        match self {
            Face::One => 1,
            Face::Two => 2,
            Face::Three => 3,
            Face::Four => 4,
            Face::Five | Face::Worm => 5,
        }
    }

    /// Ordering used when choosing between faces: Worm ranks above Five.
    pub fn rank(self) -> u8 {
        self.index() as u8 + 1
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn symbol(self) -> char {
        match self {
            Face::One => '1',
            Face::Two => '2',
            Face::Three => '3',
            Face::Four => '4',
            Face::Five => '5',
            Face::Worm => 'W',
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

///
/// A multiset of dice faces: the dice kept this turn, or the latest roll.
///
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Hand {
    counts: [u8; 6],
}

impl Hand {
    pub fn from_counts(counts: [u8; 6]) -> Hand {
        Hand { counts }
    }

    pub fn counts(&self) -> [u8; 6] {
        self.counts
    }

    pub fn count(&self, face: Face) -> u8 {
        self.counts[face.index()]
    }

    pub fn add(&mut self, face: Face, count: u8) {
        self.counts[face.index()] += count;
    }

    /// Number of dice
    pub fn len(&self) -> u8 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn total(&self) -> u8 {
        Face::ALL
            .iter()
            .map(|face| face.value() * self.count(*face))
            .sum()
    }

    /// Faces present, with their counts, lowest rank first
    pub fn faces(&self) -> impl Iterator<Item = (Face, u8)> + '_ {
        Face::ALL
            .into_iter()
            .filter(|face| self.count(*face) > 0)
            .map(|face| (face, self.count(face)))
    }

    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|count| **count > 0).count()
    }
}

impl FromIterator<Face> for Hand {
    fn from_iter<I: IntoIterator<Item = Face>>(iter: I) -> Self {
        let mut hand = Hand::default();
        for face in iter {
            hand.add(face, 1);
        }
        hand
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbols: Vec<String> = Face::ALL
            .iter()
            .rev()
            .flat_map(|face| std::iter::repeat(face.to_string()).take(self.count(*face) as usize))
            .collect();
        write!(f, "[{}]", symbols.join(" "))
    }
}

/// Every distinct hand for each dice count up to `MAX_DICE`, with how many ordered rolls give it
static OUTCOMES: LazyLock<Vec<Vec<(Hand, u32)>>> =
    LazyLock::new(|| (0..=MAX_DICE).map(enumerate_outcomes).collect());

fn enumerate_outcomes(dice: u8) -> Vec<(Hand, u32)> {
    let mut hands = vec![];
    let mut counts = [0u8; 6];
    fill_counts(0, dice, &mut counts, &mut hands);
    hands
        .into_iter()
        .map(|hand| (hand, multiplicity(&hand)))
        .collect()
}

fn fill_counts(face: usize, remaining: u8, counts: &mut [u8; 6], hands: &mut Vec<Hand>) {
    if face == counts.len() - 1 {
        counts[face] = remaining;
        hands.push(Hand::from_counts(*counts));
        return;
    }
    for count in 0..=remaining {
        counts[face] = count;
        fill_counts(face + 1, remaining - count, counts, hands);
    }
}

fn factorial(n: u8) -> u64 {
    (1..=n as u64).product()
}

fn multiplicity(hand: &Hand) -> u32 {
    let denominator: u64 = hand.counts().iter().map(|count| factorial(*count)).product();
    (factorial(hand.len()) / denominator) as u32
}

/// Every distinct roll of `dice` dice with its weight; the weights sum to `6^dice`.
pub fn outcomes(dice: u8) -> Result<&'static [(Hand, u32)]> {
    OUTCOMES
        .get(dice as usize)
        .map(|outcomes| outcomes.as_slice())
        .ok_or_else(|| {
            RainwormsError::InvalidArgument(format!(
                "cannot roll {} dice, at most {} are supported",
                dice, MAX_DICE
            ))
        })
}

pub struct DiceRoller {
    rng: StdRng,
}

impl DiceRoller {
    pub fn from_seed(seed: u64) -> DiceRoller {
        DiceRoller {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn roll(&mut self, dice: u8) -> Result<Vec<Face>> {
        if dice > MAX_DICE {
            return Err(RainwormsError::InvalidArgument(format!(
                "cannot roll {} dice, at most {} are supported",
                dice, MAX_DICE
            )));
        }
        Ok((0..dice)
            .map(|_| Face::ALL[self.rng.gen_range(0..Face::ALL.len())])
            .collect())
    }

    pub fn roll_hand(&mut self, dice: u8) -> Result<Hand> {
        Ok(self.roll(dice)?.into_iter().collect())
    }
}
