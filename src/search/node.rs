use super::game::{Action, Actor, State};
use crate::error::Result;
use log::trace;

/// What a node turns into when the search looks one step further.
#[derive(Debug, PartialEq)]
pub enum Expansion<ActionType> {
    Leaf,
    Decision(Vec<ActionType>),
    Chance(Vec<(ActionType, u32)>),
}

/// One simulated position. Children are never stored: the engine recurses and keeps values only.
#[derive(Debug, Clone)]
pub struct SearchNode<StateType: State> {
    pub state: StateType,
    pub action: Option<StateType::ActionType>,
    /// Probability of reaching this node from the root, assuming the path's choices are made
    pub probability: f64,
    pub depth: u32,
}

impl<StateType: State> SearchNode<StateType> {
    pub fn root(state: StateType) -> SearchNode<StateType> {
        SearchNode {
            state,
            action: None,
            probability: 1.0,
            depth: 0,
        }
    }

    pub fn expansion(&self) -> Expansion<StateType::ActionType> {
        if self.state.terminal() {
            return Expansion::Leaf;
        }
        match self.state.next_actor() {
            Actor::Player(_) => {
                let actions = self.state.permitted_actions();
                if actions.is_empty() {
                    Expansion::Leaf
                } else {
                    Expansion::Decision(actions)
                }
            }
            Actor::GameAction(outcomes) => {
                if outcomes.is_empty() {
                    Expansion::Leaf
                } else {
                    Expansion::Chance(outcomes)
                }
            }
        }
    }

    /// Clones the state and applies `action` to the clone.
    pub fn child(
        &self,
        action: StateType::ActionType,
        probability: f64,
    ) -> Result<SearchNode<StateType>> {
        let state = action.execute(&self.state)?;
        trace!(
            "{} {:?} (p = {:.6})",
            "         |-".repeat(self.depth as usize),
            action,
            self.probability * probability
        );
        Ok(SearchNode {
            state,
            action: Some(action),
            probability: self.probability * probability,
            depth: self.depth + 1,
        })
    }
}
