//! Block-die selection shortcut.
//!
//! When the defending side owns the choice among pre-rolled block dice, a
//! fixed preference order beats spending search budget: the decision is
//! local and the ordering is near-universal. The order is a heuristic, not
//! a rule, so it lives in configuration.

use pitch_core::{Action, ActionType, GameState, Procedure, Skill};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlockDiceError {
    #[error("no block dice offered at procedure {procedure:?}")]
    NoDiceOffered { procedure: Procedure },
}

/// Preference order over die results, best first, from the perspective of
/// the side making the pick.
#[derive(Debug, Clone)]
pub struct BlockDicePolicy {
    pub preference: Vec<ActionType>,
    /// Take a both-down trade even when our player also hits the turf.
    pub accept_trades: bool,
}

impl Default for BlockDicePolicy {
    fn default() -> Self {
        BlockDicePolicy {
            preference: vec![
                ActionType::SelectAttackerDown,
                ActionType::SelectBothDown,
                ActionType::SelectPush,
                ActionType::SelectDefenderStumbles,
                ActionType::SelectDefenderDown,
            ],
            accept_trades: false,
        }
    }
}

impl BlockDicePolicy {
    /// Pick the best offered die by preference order.
    ///
    /// Both-down is conditional on role context: it only counts as a win
    /// when the attacker actually goes down (no Block skill) and either our
    /// defender stays up (Block) or trades are acceptable.
    pub fn choose(&self, state: &GameState) -> Result<Action, BlockDiceError> {
        let offered: Vec<ActionType> = state
            .rolls
            .iter()
            .copied()
            .filter(|r| is_block_die(*r))
            .collect();

        for preferred in &self.preference {
            if !offered.contains(preferred) {
                continue;
            }
            if *preferred == ActionType::SelectBothDown && !self.both_down_is_beneficial(state) {
                continue;
            }
            return Ok(Action::new(*preferred));
        }

        // The preference list may be a configured subset; fall back to the
        // first offered die rather than stalling the game.
        offered
            .first()
            .map(|r| Action::new(*r))
            .ok_or(BlockDiceError::NoDiceOffered {
                procedure: state.procedure,
            })
    }

    fn both_down_is_beneficial(&self, state: &GameState) -> bool {
        let Some(context) = &state.block_context else {
            return self.accept_trades;
        };
        let attacker_blocks = state
            .player(context.attacker)
            .map(|p| p.has_skill(Skill::Block))
            .unwrap_or(false);
        if attacker_blocks {
            return false;
        }
        let defender_blocks = state
            .player(context.defender)
            .map(|p| p.has_skill(Skill::Block))
            .unwrap_or(false);
        defender_blocks || self.accept_trades
    }
}

pub(crate) fn is_block_die(action_type: ActionType) -> bool {
    matches!(
        action_type,
        ActionType::SelectAttackerDown
            | ActionType::SelectBothDown
            | ActionType::SelectPush
            | ActionType::SelectDefenderStumbles
            | ActionType::SelectDefenderDown
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitch_core::{Ball, BlockContext, PlayerId, PlayerRole, Square};
    use scrimmage::fixtures;

    fn block_state(attacker_skills: Vec<Skill>, defender_skills: Vec<Skill>) -> GameState {
        let mut state = fixtures::turn_state(
            vec![fixtures::player(1, PlayerRole::Blitzer, defender_skills, Square::new(15, 8))],
            vec![fixtures::player(21, PlayerRole::Blitzer, attacker_skills, Square::new(14, 8))],
            vec![Ball::new(Some(Square::new(13, 8)), false)],
        );
        state.procedure = Procedure::Block;
        state.block_context = Some(BlockContext {
            attacker: PlayerId(21),
            defender: PlayerId(1),
            position: Some(Square::new(15, 8)),
            knock_out: false,
            push_chain: vec![],
        });
        state
    }

    #[test]
    fn test_attacker_down_is_first_choice() {
        let mut state = block_state(vec![], vec![]);
        state.rolls = vec![
            ActionType::SelectPush,
            ActionType::SelectAttackerDown,
            ActionType::SelectDefenderDown,
        ];
        let action = BlockDicePolicy::default().choose(&state).unwrap();
        assert_eq!(action, Action::new(ActionType::SelectAttackerDown));
    }

    #[test]
    fn test_both_down_needs_block_skill_context() {
        let policy = BlockDicePolicy::default();

        // Defender has Block, attacker does not: both-down is a free knockdown.
        let mut state = block_state(vec![], vec![Skill::Block]);
        state.rolls = vec![ActionType::SelectBothDown, ActionType::SelectPush];
        assert_eq!(
            policy.choose(&state).unwrap(),
            Action::new(ActionType::SelectBothDown)
        );

        // Attacker has Block: both-down only hurts us, prefer the push.
        let mut state = block_state(vec![Skill::Block], vec![Skill::Block]);
        state.rolls = vec![ActionType::SelectBothDown, ActionType::SelectPush];
        assert_eq!(
            policy.choose(&state).unwrap(),
            Action::new(ActionType::SelectPush)
        );

        // Neither has Block: a trade, taken only when configured to.
        let mut state = block_state(vec![], vec![]);
        state.rolls = vec![ActionType::SelectBothDown, ActionType::SelectPush];
        assert_eq!(
            policy.choose(&state).unwrap(),
            Action::new(ActionType::SelectPush)
        );
        let trades = BlockDicePolicy {
            accept_trades: true,
            ..Default::default()
        };
        assert_eq!(
            trades.choose(&state).unwrap(),
            Action::new(ActionType::SelectBothDown)
        );
    }

    #[test]
    fn test_worst_case_order() {
        let mut state = block_state(vec![], vec![]);
        state.rolls = vec![ActionType::SelectDefenderDown, ActionType::SelectDefenderStumbles];
        let action = BlockDicePolicy::default().choose(&state).unwrap();
        assert_eq!(action, Action::new(ActionType::SelectDefenderStumbles));
    }

    #[test]
    fn test_no_dice_is_an_error() {
        let mut state = block_state(vec![], vec![]);
        state.rolls = vec![ActionType::UseReroll];
        assert!(matches!(
            BlockDicePolicy::default().choose(&state),
            Err(BlockDiceError::NoDiceOffered { .. })
        ));
    }
}
