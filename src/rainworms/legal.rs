use super::action::RwAction;
use super::dice::Face;
use super::state::{GameState, Phase};

///
/// Lists what the current player may do.
///
/// Order is fixed: `Roll` first, then bank takes by ascending number, then steals.
/// A player with no other option gets exactly `[Bust]`.
///
pub struct ActionEnumerator<'a> {
    state: &'a GameState,
}

impl<'a> ActionEnumerator<'a> {
    pub fn new(state: &'a GameState) -> ActionEnumerator<'a> {
        ActionEnumerator { state }
    }

    pub fn actions(&self) -> Vec<RwAction> {
        if self.state.is_game_over() {
            return vec![];
        }
        let mut actions = match self.state.turn().phase {
            Phase::AwaitingRoll | Phase::TurnOver => return vec![],
            Phase::PickDice => self.keeps(),
            Phase::RollOrClaim => {
                let mut actions = vec![];
                if self.can_roll() {
                    actions.push(RwAction::Roll);
                }
                actions.extend(self.claims());
                actions
            }
        };
        if actions.is_empty() {
            actions.push(RwAction::Bust);
        }
        actions
    }

    /// Faces in the latest roll that have not been kept this turn
    pub fn keeps(&self) -> Vec<RwAction> {
        let turn = self.state.turn();
        if turn.phase != Phase::PickDice {
            return vec![];
        }
        turn.rolled
            .faces()
            .filter(|(face, _)| turn.kept.count(*face) == 0)
            .map(|(face, _)| RwAction::Keep(face))
            .collect()
    }

    pub fn can_roll(&self) -> bool {
        self.state.turn().phase == Phase::RollOrClaim && self.state.dice_remaining() > 0
    }

    pub fn claims(&self) -> Vec<RwAction> {
        let turn = self.state.turn();
        if turn.phase != Phase::RollOrClaim || turn.kept.is_empty() {
            return vec![];
        }
        if self.state.require_worm() && turn.kept.count(Face::Worm) == 0 {
            return vec![];
        }
        let total = turn.kept.total();
        let mut claims: Vec<RwAction> = self
            .state
            .bank()
            .claimable_numbers(total)
            .into_iter()
            .map(RwAction::Take)
            .collect();
        // A steal needs an exact match, so every steal has the same number
        if self.state.steal_target(total).is_some() {
            claims.push(RwAction::Steal(total));
        }
        claims
    }
}
