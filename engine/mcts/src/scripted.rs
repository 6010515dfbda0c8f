//! Scripted sub-decision policy.
//!
//! Setup-phase and forced decisions are not worth search time: each has one
//! sensible resolution, computed here as a pure function of the snapshot.
//! Every reachable kind must resolve; hitting an unresolvable one means the
//! classification table and this policy have drifted apart, which is a
//! defect, not a recoverable condition.

use pitch_core::{
    constants::PITCH_HEIGHT, constants::PITCH_WIDTH, Action, ActionType, GameState, Player,
    Procedure, Side, Skill, Square,
};
use thiserror::Error;

use crate::sim::ScriptedKind;

#[derive(Debug, Error)]
pub enum ScriptedError {
    #[error("no scripted resolution for {kind:?} at procedure {procedure:?}")]
    Unresolvable {
        kind: ScriptedKind,
        procedure: Procedure,
    },
}

/// Deterministic resolutions for decisions outside the search's focus.
#[derive(Debug, Clone)]
pub struct ScriptedPolicy {
    /// Which side of the coin to call. One call is as good as the other;
    /// what matters is never burning time on it.
    pub coin_call: ActionType,
    /// Formation choice when this side receives the kick.
    pub receiving_formation: ActionType,
    /// Formation choice when this side kicks.
    pub kicking_formation: ActionType,
}

impl Default for ScriptedPolicy {
    fn default() -> Self {
        ScriptedPolicy {
            coin_call: ActionType::Tails,
            receiving_formation: ActionType::SetupFormationLine,
            kicking_formation: ActionType::SetupFormationSpread,
        }
    }
}

impl ScriptedPolicy {
    /// Resolve one scripted decision. Total over every kind reachable in
    /// play; `Unresolvable` is a logic error in the caller's state.
    pub fn action(&self, state: &GameState, kind: ScriptedKind) -> Result<Action, ScriptedError> {
        match kind {
            ScriptedKind::CoinTossFlip => Ok(Action::new(self.coin_call)),
            ScriptedKind::KickReceive => Ok(Action::new(ActionType::Receive)),
            ScriptedKind::PlaceBall => Ok(self.place_ball(state)),
            ScriptedKind::Touchback => self.touchback(state, kind),
            ScriptedKind::HighKick => Ok(self.high_kick(state)),
            ScriptedKind::Interception => Ok(self.interception(state)),
            ScriptedKind::Setup => self.setup(state, kind),
            ScriptedKind::Forced => self.forced(state, kind),
        }
    }

    /// Kick toward the centre of the receiving half.
    fn place_ball(&self, state: &GameState) -> Action {
        let receiving = state
            .receiving_side()
            .or_else(|| state.current_side().map(Side::opponent))
            .unwrap_or(Side::Away);
        let x = match receiving {
            Side::Home => (PITCH_WIDTH / 2 + PITCH_WIDTH - 2) / 2,
            Side::Away => (1 + PITCH_WIDTH / 2 - 1) / 2,
        };
        Action::at_position(ActionType::PlaceBall, Square::new(x, PITCH_HEIGHT / 2))
    }

    /// Hand the touchback ball to a sure-hands player when one is standing.
    fn touchback(&self, state: &GameState, kind: ScriptedKind) -> Result<Action, ScriptedError> {
        let side = state.current_side().ok_or(ScriptedError::Unresolvable {
            kind,
            procedure: state.procedure,
        })?;
        let pick = preferred_player(state, side, |p| p.has_skill(Skill::SureHands))
            .or_else(|| preferred_player(state, side, |_| true))
            .ok_or(ScriptedError::Unresolvable {
                kind,
                procedure: state.procedure,
            })?;
        Ok(Action::for_player(ActionType::SelectPlayer, pick))
    }

    /// Put an unmarked ball-handler under a high kick, or decline.
    fn high_kick(&self, state: &GameState) -> Action {
        let Some(side) = state.current_side() else {
            return Action::new(ActionType::SelectNone);
        };
        let candidate = preferred_player(state, side, |p| {
            (p.has_skill(Skill::Catch) || p.has_skill(Skill::SureHands))
                && p.position
                    .map(|sq| state.tackle_zones_at(side, sq) == 0)
                    .unwrap_or(false)
        });
        match candidate {
            Some(id) => Action::for_player(ActionType::SelectPlayer, id),
            None => Action::new(ActionType::SelectNone),
        }
    }

    /// Closest eligible candidate to the pass; decline when nobody can try.
    fn interception(&self, state: &GameState) -> Action {
        let Some(side) = state.current_side() else {
            return Action::new(ActionType::SelectNone);
        };
        let reference = state.position.or_else(|| state.ball_position());
        let Some(reference) = reference else {
            return Action::new(ActionType::SelectNone);
        };

        let closest = state
            .team(side)
            .players_on_pitch()
            .filter(|p| p.is_active())
            .filter_map(|p| p.position.map(|sq| (sq.distance(&reference), p.id)))
            .min();
        match closest {
            Some((_, id)) => Action::for_player(ActionType::SelectPlayer, id),
            None => Action::new(ActionType::SelectNone),
        }
    }

    /// Pick the formation the engine offers for our role this drive. The
    /// explicit-placement fallback (no formation offer at all) is planned
    /// by the driver, which owns the action queue.
    fn setup(&self, state: &GameState, kind: ScriptedKind) -> Result<Action, ScriptedError> {
        let receiving = state.receiving_side().is_some()
            && state.receiving_side() == state.current_side();
        let wanted = if receiving {
            self.receiving_formation
        } else {
            self.kicking_formation
        };

        if state.rolls.contains(&wanted) {
            return Ok(Action::new(wanted));
        }
        if let Some(any_formation) = state.rolls.iter().find(|r| is_formation_choice(**r)) {
            return Ok(Action::new(*any_formation));
        }
        if state.rolls.contains(&ActionType::EndSetup) {
            return Ok(Action::new(ActionType::EndSetup));
        }
        Err(ScriptedError::Unresolvable {
            kind,
            procedure: state.procedure,
        })
    }

    /// A side-effect decision with exactly one offered resolution.
    fn forced(&self, state: &GameState, kind: ScriptedKind) -> Result<Action, ScriptedError> {
        match state.rolls.as_slice() {
            [only] => Ok(Action::new(*only)),
            _ => Err(ScriptedError::Unresolvable {
                kind,
                procedure: state.procedure,
            }),
        }
    }
}

pub(crate) fn is_formation_choice(action_type: ActionType) -> bool {
    matches!(
        action_type,
        ActionType::SetupFormationLine
            | ActionType::SetupFormationSpread
            | ActionType::SetupFormationWedge
            | ActionType::SetupFormationZone
    )
}

/// Lowest-id standing player matching the predicate; id order keeps every
/// scripted pick reproducible.
fn preferred_player(
    state: &GameState,
    side: Side,
    predicate: impl Fn(&Player) -> bool,
) -> Option<pitch_core::PlayerId> {
    state
        .team(side)
        .players_on_pitch()
        .filter(|p| p.is_active())
        .find(|p| predicate(p))
        .map(|p| p.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitch_core::{Ball, PlayerId, PlayerRole};
    use scrimmage::fixtures;

    fn policy() -> ScriptedPolicy {
        ScriptedPolicy::default()
    }

    #[test]
    fn test_coin_toss_and_receive_are_fixed() {
        let state = fixtures::open_field();
        assert_eq!(
            policy().action(&state, ScriptedKind::CoinTossFlip).unwrap(),
            Action::new(ActionType::Tails)
        );
        assert_eq!(
            policy().action(&state, ScriptedKind::KickReceive).unwrap(),
            Action::new(ActionType::Receive)
        );
    }

    #[test]
    fn test_place_ball_targets_receiving_half_centre() {
        let mut state = fixtures::open_field();
        // Home kicks, away receives: aim at the centre of the left half.
        state.procedure = Procedure::PlaceBall;
        state.receiving_this_drive = Some("away".into());

        let action = policy().action(&state, ScriptedKind::PlaceBall).unwrap();
        assert_eq!(action.action_type, ActionType::PlaceBall);
        let target = action.position.unwrap();
        assert!(Side::Away.owns_half(target), "ball must land in the receiving half");
        assert_eq!(target.y, PITCH_HEIGHT / 2);
    }

    #[test]
    fn test_touchback_prefers_sure_hands() {
        let mut state = fixtures::turn_state(
            vec![
                fixtures::player(3, PlayerRole::Lineman, vec![], Square::new(20, 5)),
                fixtures::player(5, PlayerRole::Thrower, vec![Skill::SureHands], Square::new(21, 8)),
            ],
            vec![],
            vec![Ball::new(None, false)],
        );
        state.procedure = Procedure::Touchback;

        let action = policy().action(&state, ScriptedKind::Touchback).unwrap();
        assert_eq!(action, Action::for_player(ActionType::SelectPlayer, PlayerId(5)));
    }

    #[test]
    fn test_high_kick_declines_when_everyone_is_marked() {
        let mut state = fixtures::turn_state(
            vec![fixtures::player(
                1,
                PlayerRole::Catcher,
                vec![Skill::Catch],
                Square::new(15, 8),
            )],
            // Marker stands adjacent, so the catcher is no longer unmarked.
            vec![fixtures::player(21, PlayerRole::Lineman, vec![], Square::new(14, 8))],
            vec![Ball::new(Some(Square::new(16, 8)), false)],
        );
        state.procedure = Procedure::HighKick;

        let action = policy().action(&state, ScriptedKind::HighKick).unwrap();
        assert_eq!(action, Action::new(ActionType::SelectNone));
    }

    #[test]
    fn test_interception_picks_closest_candidate() {
        let mut state = fixtures::turn_state(
            vec![
                fixtures::player(1, PlayerRole::Lineman, vec![], Square::new(20, 8)),
                fixtures::player(2, PlayerRole::Catcher, vec![], Square::new(12, 8)),
            ],
            vec![],
            vec![Ball::new(Some(Square::new(10, 8)), true)],
        );
        state.procedure = Procedure::Interception;
        state.position = Some(Square::new(10, 8));

        let action = policy().action(&state, ScriptedKind::Interception).unwrap();
        assert_eq!(action, Action::for_player(ActionType::SelectPlayer, PlayerId(2)));
    }

    #[test]
    fn test_setup_follows_offered_formation() {
        let mut state = fixtures::open_field();
        state.procedure = Procedure::Setup;
        state.receiving_this_drive = Some("home".into());
        state.rolls = vec![
            ActionType::SetupFormationLine,
            ActionType::SetupFormationSpread,
            ActionType::EndSetup,
        ];

        let action = policy().action(&state, ScriptedKind::Setup).unwrap();
        assert_eq!(action, Action::new(ActionType::SetupFormationLine));

        // Kicking picks the defensive spread instead.
        state.receiving_this_drive = Some("away".into());
        let action = policy().action(&state, ScriptedKind::Setup).unwrap();
        assert_eq!(action, Action::new(ActionType::SetupFormationSpread));
    }

    #[test]
    fn test_forced_requires_a_single_offer() {
        let mut state = fixtures::open_field();
        state.rolls = vec![ActionType::Continue];
        assert_eq!(
            policy().action(&state, ScriptedKind::Forced).unwrap(),
            Action::new(ActionType::Continue)
        );

        state.rolls = vec![ActionType::Continue, ActionType::EndTurn];
        assert!(matches!(
            policy().action(&state, ScriptedKind::Forced),
            Err(ScriptedError::Unresolvable { .. })
        ));
    }
}
