//! Strategies that pick the next action for the player to act.
mod greedy;
mod random;
mod tree;

pub use greedy::{GreedyBot, GreedySettings};
pub use random::RandomBot;
pub use tree::{TreeBot, TreeSettings};

use crate::error::Result;
use crate::rainworms::{GameState, RwAction};
use serde::{Deserialize, Serialize};

pub trait Bot: Send {
    fn name(&self) -> String;
    /// Picks one of `state.legal_actions()`. Never mutates the live state.
    fn choose_action(&mut self, state: &GameState) -> Result<RwAction>;
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum BotSettings {
    Random,
    Greedy(GreedySettings),
    GreedyStealing(GreedySettings),
    TreeFull(TreeSettings),
    TreeRelative(TreeSettings),
    TreeMonteCarloRelative(TreeSettings),
}

impl BotSettings {
    pub fn build(&self, seed: u64) -> Box<dyn Bot> {
        match self {
            BotSettings::Random => Box::new(RandomBot::new(seed)),
            BotSettings::Greedy(settings) => Box::new(GreedyBot::new(settings.threshold)),
            BotSettings::GreedyStealing(settings) => {
                Box::new(GreedyBot::stealing(settings.threshold))
            }
            BotSettings::TreeFull(settings) => Box::new(TreeBot::full(settings, seed)),
            BotSettings::TreeRelative(settings) => Box::new(TreeBot::relative(settings, seed)),
            BotSettings::TreeMonteCarloRelative(settings) => {
                Box::new(TreeBot::monte_carlo_relative(settings, seed))
            }
        }
    }
}

/// Bot choices for command lines, each with its default settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BotKind {
    Random,
    Greedy,
    GreedyStealing,
    TreeFull,
    TreeRelative,
    TreeMonteCarloRelative,
}

impl From<BotKind> for BotSettings {
    fn from(kind: BotKind) -> BotSettings {
        match kind {
            BotKind::Random => BotSettings::Random,
            BotKind::Greedy => BotSettings::Greedy(GreedySettings::default()),
            BotKind::GreedyStealing => BotSettings::GreedyStealing(GreedySettings::default()),
            BotKind::TreeFull => BotSettings::TreeFull(TreeSettings::default()),
            BotKind::TreeRelative => BotSettings::TreeRelative(TreeSettings::default()),
            BotKind::TreeMonteCarloRelative => {
                BotSettings::TreeMonteCarloRelative(TreeSettings::default())
            }
        }
    }
}
