use super::Bot;
use crate::error::Result;
use crate::rainworms::{Absolute, GameState, Relative, RwAction};
use crate::search::{BackupPolicy, Evaluator, SearchEngine, SearchMode, SearchSettings};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TreeSettings {
    pub backup: BackupPolicy,
    /// Only used by the Monte Carlo bot
    pub rollouts: usize,
    pub threads: usize,
    pub transpositions: bool,
}

impl Default for TreeSettings {
    fn default() -> Self {
        TreeSettings {
            backup: BackupPolicy::Max,
            rollouts: 10,
            threads: 1,
            transpositions: true,
        }
    }
}

impl TreeSettings {
    pub fn search_settings(&self, mode: SearchMode) -> SearchSettings {
        SearchSettings {
            mode,
            backup: self.backup,
            rollouts: self.rollouts,
            threads: self.threads,
            transpositions: self.transpositions,
        }
    }
}

/// Searches the rest of its own turn and plays the best valued action.
pub struct TreeBot {
    name: String,
    engine: SearchEngine,
    evaluator: Box<dyn Evaluator<GameState>>,
}

impl TreeBot {
    pub fn new(
        name: &str,
        engine: SearchEngine,
        evaluator: Box<dyn Evaluator<GameState>>,
    ) -> TreeBot {
        TreeBot {
            name: name.to_string(),
            engine,
            evaluator,
        }
    }

    pub fn full(settings: &TreeSettings, seed: u64) -> TreeBot {
        TreeBot::new(
            "TreeFull",
            SearchEngine::new(settings.search_settings(SearchMode::Full), seed),
            Box::new(Absolute),
        )
    }

    pub fn relative(settings: &TreeSettings, seed: u64) -> TreeBot {
        TreeBot::new(
            "TreeRelative",
            SearchEngine::new(settings.search_settings(SearchMode::Full), seed),
            Box::new(Relative),
        )
    }

    pub fn monte_carlo_relative(settings: &TreeSettings, seed: u64) -> TreeBot {
        TreeBot::new(
            "TreeMonteCarloRelative",
            SearchEngine::new(settings.search_settings(SearchMode::MonteCarlo), seed),
            Box::new(Relative),
        )
    }
}

impl Bot for TreeBot {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn choose_action(&mut self, state: &GameState) -> Result<RwAction> {
        let report = self.engine.search(state, self.evaluator.as_ref())?;
        debug!(
            "{} chose {} ({:?} search, {} nodes)",
            self.name,
            report.best,
            self.engine.settings().mode,
            report.nodes
        );
        Ok(report.best)
    }
}
