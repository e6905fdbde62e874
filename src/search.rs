//! Searches the rest of the current player's turn and picks the action worth the most.
//!
//! Two modes share one traversal: `Full` branches on every chance outcome and weights each by its
//! probability, `MonteCarlo` follows a single sampled outcome per chance node. Decisions inside
//! the turn are backed up with `BackupPolicy`. The tree is never stored; values are returned up the
//! recursion and each invocation works on private clones of the state.
pub mod game;
pub mod node;
pub mod weighted_random;

pub use game::{Action, Actor, Evaluator, State};
pub use node::{Expansion, SearchNode};

use crate::error::{RainwormsError, Result};
use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::thread;
use weighted_random::weighted_random;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
pub enum SearchMode {
    /// Every chance outcome, weighted by its probability
    Full,
    /// One sampled chance outcome per chance node
    MonteCarlo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum BackupPolicy {
    /// A decision is worth its best child
    #[default]
    Max,
    /// A decision is worth the average of its children
    Mean,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchSettings {
    pub mode: SearchMode,
    pub backup: BackupPolicy,
    /// Monte Carlo only: sampled searches averaged per root action
    pub rollouts: usize,
    pub threads: usize,
    /// Full only: remember the value of every state seen during one search
    pub transpositions: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        SearchSettings {
            mode: SearchMode::Full,
            backup: BackupPolicy::Max,
            rollouts: 1,
            threads: 1,
            transpositions: true,
        }
    }
}

impl SearchSettings {
    pub fn full() -> SearchSettings {
        SearchSettings::default()
    }

    pub fn monte_carlo(rollouts: usize) -> SearchSettings {
        SearchSettings {
            mode: SearchMode::MonteCarlo,
            rollouts,
            ..SearchSettings::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionValue<ActionType> {
    pub action: ActionType,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchReport<ActionType> {
    pub best: ActionType,
    /// Root actions in the order they were enumerated. Empty when there was nothing to compare.
    pub values: Vec<ActionValue<ActionType>>,
    pub nodes: usize,
    pub leaves: usize,
}

/// Walks the tree below one root for a single search invocation.
struct Explorer<'a, StateType: State, E: Evaluator<StateType> + ?Sized> {
    settings: &'a SearchSettings,
    evaluator: &'a E,
    observer: u8,
    cache: HashMap<StateType, f64>,
    rng: StdRng,
    nodes: usize,
    leaves: usize,
}

impl<'a, StateType: State, E: Evaluator<StateType> + ?Sized> Explorer<'a, StateType, E> {
    fn new(settings: &'a SearchSettings, evaluator: &'a E, observer: u8) -> Self {
        Explorer {
            settings,
            evaluator,
            observer,
            cache: HashMap::new(),
            rng: StdRng::seed_from_u64(0),
            nodes: 0,
            leaves: 0,
        }
    }

    fn caching(&self) -> bool {
        self.settings.transpositions && self.settings.mode == SearchMode::Full
    }

    fn root_action_value(
        &mut self,
        root: &SearchNode<StateType>,
        action: StateType::ActionType,
        seed: u64,
    ) -> Result<f64> {
        self.rng = StdRng::seed_from_u64(seed);
        let child = root.child(action, 1.0)?;
        match self.settings.mode {
            SearchMode::Full => self.value(&child),
            SearchMode::MonteCarlo => {
                let rollouts = self.settings.rollouts.max(1);
                let mut total = 0.0;
                for _ in 0..rollouts {
                    total += self.value(&child)?;
                }
                Ok(total / rollouts as f64)
            }
        }
    }

    fn value(&mut self, node: &SearchNode<StateType>) -> Result<f64> {
        self.nodes += 1;
        if self.caching() {
            if let Some(value) = self.cache.get(&node.state) {
                return Ok(*value);
            }
        }

        let value = match node.expansion() {
            Expansion::Leaf => self.leaf_value(node),
            Expansion::Decision(actions) => {
                let mut values = Vec::with_capacity(actions.len());
                for action in actions {
                    let child = node.child(action, 1.0)?;
                    values.push(self.value(&child)?);
                }
                backup(self.settings.backup, &values)
            }
            Expansion::Chance(outcomes) => self.chance_value(node, &outcomes)?,
        };

        if self.caching() {
            self.cache.insert(node.state.clone(), value);
        }
        Ok(value)
    }

    fn leaf_value(&mut self, node: &SearchNode<StateType>) -> f64 {
        self.leaves += 1;
        self.evaluator.evaluate(&node.state, self.observer)
    }

    fn chance_value(
        &mut self,
        node: &SearchNode<StateType>,
        outcomes: &[(StateType::ActionType, u32)],
    ) -> Result<f64> {
        let total_weight: u32 = outcomes.iter().map(|(_, weight)| weight).sum();
        if total_weight == 0 {
            warn!("Chance node without any weighted outcome, treating it as a leaf");
            return Ok(self.leaf_value(node));
        }
        match self.settings.mode {
            SearchMode::Full => {
                let mut expected = 0.0;
                for (outcome, weight) in outcomes {
                    let probability = *weight as f64 / total_weight as f64;
                    let child = node.child(*outcome, probability)?;
                    expected += probability * self.value(&child)?;
                }
                Ok(expected)
            }
            SearchMode::MonteCarlo => match weighted_random(outcomes, &mut self.rng) {
                Some((outcome, weight)) => {
                    let child = node.child(*outcome, *weight as f64 / total_weight as f64)?;
                    self.value(&child)
                }
                None => Ok(self.leaf_value(node)),
            },
        }
    }
}

fn backup(policy: BackupPolicy, values: &[f64]) -> f64 {
    match policy {
        BackupPolicy::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        BackupPolicy::Mean => values.iter().sum::<f64>() / values.len() as f64,
    }
}

type RootValues = (Vec<f64>, usize, usize);

pub struct SearchEngine {
    settings: SearchSettings,
    rng: StdRng,
}

impl SearchEngine {
    pub fn new(settings: SearchSettings, seed: u64) -> SearchEngine {
        SearchEngine {
            settings,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    ///
    /// Values every permitted action of `state` for the player to act and returns the best one.
    /// Ties go to the action enumerated first.
    ///
    pub fn search<StateType, E>(
        &mut self,
        state: &StateType,
        evaluator: &E,
    ) -> Result<SearchReport<StateType::ActionType>>
    where
        StateType: State,
        E: Evaluator<StateType> + ?Sized,
    {
        let observer = match state.next_actor() {
            Actor::Player(player) => player,
            Actor::GameAction(_) => {
                return Err(RainwormsError::InvalidArgument(
                    "a search has to start at a player's decision".to_string(),
                ))
            }
        };

        let actions = if state.terminal() {
            vec![]
        } else {
            state.permitted_actions()
        };
        if actions.is_empty() {
            debug!("Nothing permitted for player {}, forfeiting", observer);
            return Ok(SearchReport {
                best: <StateType::ActionType as Action>::forfeit(),
                values: vec![],
                nodes: 0,
                leaves: 0,
            });
        }
        if actions.len() == 1 {
            debug!("Only {:?} is permitted", actions[0]);
            return Ok(SearchReport {
                best: actions[0],
                values: vec![],
                nodes: 0,
                leaves: 0,
            });
        }

        // Seeds are drawn up front so sampled results do not depend on the thread count
        let seeds: Vec<u64> = match self.settings.mode {
            SearchMode::Full => vec![0; actions.len()],
            SearchMode::MonteCarlo => actions.iter().map(|_| self.rng.gen()).collect(),
        };

        let root = SearchNode::root(state.clone());
        let (values, nodes, leaves) = if self.settings.threads > 1 {
            self.search_threaded(&root, &actions, &seeds, evaluator, observer)?
        } else {
            self.search_sequential(&root, &actions, &seeds, evaluator, observer)?
        };

        let mut best = 0;
        for (i, value) in values.iter().enumerate() {
            if *value > values[best] {
                best = i;
            }
        }

        let report = SearchReport {
            best: actions[best],
            values: actions
                .iter()
                .zip(values.iter())
                .map(|(action, value)| ActionValue {
                    action: *action,
                    value: *value,
                })
                .collect(),
            nodes,
            leaves,
        };
        debug!(
            "{:?} search for player {} chose {:?} after {} nodes ({} leaves): {:?}",
            self.settings.mode,
            observer,
            report.best,
            report.nodes,
            report.leaves,
            report
                .values
                .iter()
                .map(|v| (v.action, v.value))
                .collect::<Vec<_>>()
        );
        Ok(report)
    }

    fn search_sequential<StateType, E>(
        &self,
        root: &SearchNode<StateType>,
        actions: &[StateType::ActionType],
        seeds: &[u64],
        evaluator: &E,
        observer: u8,
    ) -> Result<RootValues>
    where
        StateType: State,
        E: Evaluator<StateType> + ?Sized,
    {
        let mut explorer = Explorer::new(&self.settings, evaluator, observer);
        let mut values = Vec::with_capacity(actions.len());
        for (action, seed) in actions.iter().zip(seeds) {
            let value = explorer.root_action_value(root, *action, *seed)?;
            trace!("Root action {:?} is worth {:.6}", action, value);
            values.push(value);
        }
        Ok((values, explorer.nodes, explorer.leaves))
    }

    fn search_threaded<StateType, E>(
        &self,
        root: &SearchNode<StateType>,
        actions: &[StateType::ActionType],
        seeds: &[u64],
        evaluator: &E,
        observer: u8,
    ) -> Result<RootValues>
    where
        StateType: State,
        E: Evaluator<StateType> + ?Sized,
    {
        let thread_count = self.settings.threads.min(actions.len());
        let settings = &self.settings;
        debug!(
            "Splitting {} root actions over {} threads",
            actions.len(),
            thread_count
        );

        let results: Vec<Result<(Vec<(usize, f64)>, usize, usize)>> = thread::scope(|scope| {
            let handles: Vec<_> = (0..thread_count)
                .map(|worker| {
                    scope.spawn(move || -> Result<(Vec<(usize, f64)>, usize, usize)> {
                        let mut explorer = Explorer::new(settings, evaluator, observer);
                        let mut values = vec![];
                        for index in (worker..actions.len()).step_by(thread_count) {
                            let value =
                                explorer.root_action_value(root, actions[index], seeds[index])?;
                            trace!("Root action {:?} is worth {:.6}", actions[index], value);
                            values.push((index, value));
                        }
                        Ok((values, explorer.nodes, explorer.leaves))
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(result) => result,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        });

        let mut values = vec![0.0; actions.len()];
        let mut nodes = 0;
        let mut leaves = 0;
        for result in results {
            let (worker_values, worker_nodes, worker_leaves) = result?;
            for (index, value) in worker_values {
                values[index] = value;
            }
            nodes += worker_nodes;
            leaves += worker_leaves;
        }
        Ok((values, nodes, leaves))
    }
}

/// One-shot search returning only the chosen action.
pub fn calculate_best_turn<StateType, E>(
    state: &StateType,
    evaluator: &E,
    settings: SearchSettings,
    seed: u64,
) -> Result<StateType::ActionType>
where
    StateType: State,
    E: Evaluator<StateType> + ?Sized,
{
    SearchEngine::new(settings, seed)
        .search(state, evaluator)
        .map(|report| report.best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::injectable_game::{TestEvaluator, TestGameAction, TestGameState};

    fn values(report: &SearchReport<TestGameAction>) -> Vec<f64> {
        report.values.iter().map(|v| v.value).collect()
    }

    #[test]
    fn test_full_prefers_higher_expectation() {
        let state = TestGameState::gamble(2, vec![(7, 1), (-1, 1)]);
        let report = SearchEngine::new(SearchSettings::full(), 0)
            .search(&state, &TestEvaluator)
            .unwrap();
        assert_eq!(report.best, TestGameAction::Gamble);
        assert_eq!(values(&report), vec![2.0, 3.0]);
    }

    #[test]
    fn test_full_weights_outcomes() {
        let state = TestGameState::gamble(0, vec![(10, 1), (-2, 3)]);
        let report = SearchEngine::new(SearchSettings::full(), 0)
            .search(&state, &TestEvaluator)
            .unwrap();
        assert_eq!(values(&report), vec![0.0, 1.0]);
        assert_eq!(report.best, TestGameAction::Gamble);
    }

    #[test]
    fn test_ties_go_to_first_action() {
        let state = TestGameState::gamble(3, vec![(7, 1), (-1, 1)]);
        let action =
            calculate_best_turn(&state, &TestEvaluator, SearchSettings::full(), 0).unwrap();
        assert_eq!(action, TestGameAction::Stop(3));
    }

    #[test]
    fn test_backup_policy() {
        let mut state = TestGameState::gamble(6, vec![]);
        state.injected_outcomes = vec![(TestGameAction::Choice(10, 0), 1)];

        let max = calculate_best_turn(&state, &TestEvaluator, SearchSettings::full(), 0).unwrap();
        assert_eq!(max, TestGameAction::Gamble);

        let mean_settings = SearchSettings {
            backup: BackupPolicy::Mean,
            ..SearchSettings::full()
        };
        let mean = calculate_best_turn(&state, &TestEvaluator, mean_settings, 0).unwrap();
        assert_eq!(mean, TestGameAction::Stop(6));
    }

    #[test]
    fn test_transpositions_evaluate_repeated_states_once() {
        let state = TestGameState::gamble(0, vec![(1, 1), (1, 1)]);
        let cached = SearchEngine::new(SearchSettings::full(), 0)
            .search(&state, &TestEvaluator)
            .unwrap();
        let uncached = SearchEngine::new(
            SearchSettings {
                transpositions: false,
                ..SearchSettings::full()
            },
            0,
        )
        .search(&state, &TestEvaluator)
        .unwrap();
        assert_eq!(values(&cached), values(&uncached));
        assert_eq!(cached.leaves, 2);
        assert_eq!(uncached.leaves, 3);
    }

    #[test]
    fn test_monte_carlo_is_reproducible() {
        let state = TestGameState::gamble(1, vec![(5, 1), (-5, 1), (2, 1)]);
        let first = SearchEngine::new(SearchSettings::monte_carlo(3), 42)
            .search(&state, &TestEvaluator)
            .unwrap();
        let second = SearchEngine::new(SearchSettings::monte_carlo(3), 42)
            .search(&state, &TestEvaluator)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_monte_carlo_follows_one_outcome() {
        let state = TestGameState::gamble(1, vec![(9, 0), (4, 5)]);
        let report = SearchEngine::new(SearchSettings::monte_carlo(1), 1)
            .search(&state, &TestEvaluator)
            .unwrap();
        assert_eq!(values(&report), vec![1.0, 4.0]);
        // Stop is one leaf, the sampled gamble is another
        assert_eq!(report.leaves, 2);
    }

    #[test]
    fn test_threads_agree_with_sequential() {
        let mut state = TestGameState::gamble(2, vec![(7, 2), (-1, 1), (3, 4)]);
        state.injected_actions.push(TestGameAction::Stop(4));
        for settings in [SearchSettings::full(), SearchSettings::monte_carlo(4)] {
            let sequential = SearchEngine::new(settings.clone(), 9)
                .search(&state, &TestEvaluator)
                .unwrap();
            let threaded = SearchEngine::new(
                SearchSettings {
                    threads: 3,
                    ..settings
                },
                9,
            )
            .search(&state, &TestEvaluator)
            .unwrap();
            assert_eq!(sequential.best, threaded.best);
            assert_eq!(values(&sequential), values(&threaded));
        }
    }

    #[test]
    fn test_forfeit_when_nothing_permitted() {
        let mut state = TestGameState::gamble(2, vec![(1, 1)]);
        state.reward = Some(2);
        let report = SearchEngine::new(SearchSettings::full(), 0)
            .search(&state, &TestEvaluator)
            .unwrap();
        assert_eq!(report.best, TestGameAction::Stop(0));
        assert!(report.values.is_empty());
    }

    #[test]
    fn test_single_action_is_not_searched() {
        let mut state = TestGameState::gamble(2, vec![(1, 1)]);
        state.injected_actions = vec![TestGameAction::Gamble];
        let report = SearchEngine::new(SearchSettings::full(), 0)
            .search(&state, &TestEvaluator)
            .unwrap();
        assert_eq!(report.best, TestGameAction::Gamble);
        assert_eq!(report.nodes, 0);
    }

    #[test]
    fn test_search_from_chance_node_is_rejected() {
        let mut state = TestGameState::gamble(2, vec![(1, 1)]);
        state.rolling = true;
        let result = SearchEngine::new(SearchSettings::full(), 0).search(&state, &TestEvaluator);
        assert!(matches!(result, Err(RainwormsError::InvalidArgument(_))));
    }
}
