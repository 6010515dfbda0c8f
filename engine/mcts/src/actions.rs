//! Legal-action enumeration.
//!
//! Expands the engine's per-choice player and position lists into concrete
//! actions, exactly the set the engine would accept. Getting this wrong in
//! either direction breaks the search's core correctness contract, so the
//! expansion mirrors the engine's offer structure mechanically and adds no
//! judgement of its own.

use std::collections::HashSet;

use pitch_core::{Action, ActionType, EngineError, GameState, RulesEngine};

/// The complete, deduplicated set of legal actions at the state's pending
/// decision point.
///
/// The `PlacePlayer` placement pseudo-action is excluded: formation
/// placement is owned by setup scripting and would explode the branching
/// factor for no strategic gain.
pub fn legal_actions(
    engine: &dyn RulesEngine,
    state: &GameState,
) -> Result<Vec<Action>, EngineError> {
    let mut seen = HashSet::new();
    let mut actions = Vec::new();

    for choice in engine.available_actions(state)? {
        if choice.action_type == ActionType::PlacePlayer {
            continue;
        }
        if !choice.players.is_empty() {
            for player in choice.players {
                push_unique(
                    &mut actions,
                    &mut seen,
                    Action::for_player(choice.action_type, player),
                );
            }
        } else if !choice.positions.is_empty() {
            for position in choice.positions {
                push_unique(
                    &mut actions,
                    &mut seen,
                    Action::at_position(choice.action_type, position),
                );
            }
        } else {
            push_unique(&mut actions, &mut seen, Action::new(choice.action_type));
        }
    }

    Ok(actions)
}

fn push_unique(actions: &mut Vec<Action>, seen: &mut HashSet<Action>, action: Action) {
    if seen.insert(action.clone()) {
        actions.push(action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitch_core::{ActionChoice, PlayerId, Square};
    use scrimmage::{fixtures, Scrimmage};

    /// Engine stub that serves a fixed offer regardless of state.
    struct FixedOffer(Vec<ActionChoice>);

    impl RulesEngine for FixedOffer {
        fn available_actions(&self, _: &GameState) -> Result<Vec<ActionChoice>, EngineError> {
            Ok(self.0.clone())
        }

        fn apply(&self, _: &GameState, _: &Action) -> Result<GameState, EngineError> {
            Err(EngineError::Internal("not simulated".into()))
        }
    }

    #[test]
    fn test_expansion_per_player_and_per_position() {
        let engine = FixedOffer(vec![
            ActionChoice::with_players(ActionType::StartMove, vec![PlayerId(1), PlayerId(2)]),
            ActionChoice::with_positions(
                ActionType::Move,
                vec![Square::new(3, 3), Square::new(4, 4)],
            ),
            ActionChoice::bare(ActionType::EndTurn),
        ]);

        let actions = legal_actions(&engine, &fixtures::open_field()).unwrap();
        assert_eq!(
            actions,
            vec![
                Action::for_player(ActionType::StartMove, PlayerId(1)),
                Action::for_player(ActionType::StartMove, PlayerId(2)),
                Action::at_position(ActionType::Move, Square::new(3, 3)),
                Action::at_position(ActionType::Move, Square::new(4, 4)),
                Action::new(ActionType::EndTurn),
            ]
        );
    }

    #[test]
    fn test_duplicates_are_dropped_preserving_order() {
        let engine = FixedOffer(vec![
            ActionChoice::with_players(ActionType::StartMove, vec![PlayerId(1), PlayerId(1)]),
            ActionChoice::bare(ActionType::EndTurn),
            ActionChoice::bare(ActionType::EndTurn),
        ]);

        let actions = legal_actions(&engine, &fixtures::open_field()).unwrap();
        assert_eq!(actions.len(), 2);
    }

    #[test]
    fn test_place_player_is_excluded() {
        let engine = FixedOffer(vec![
            ActionChoice::with_positions(ActionType::PlacePlayer, vec![Square::new(14, 8)]),
            ActionChoice::bare(ActionType::EndSetup),
        ]);

        let actions = legal_actions(&engine, &fixtures::open_field()).unwrap();
        assert_eq!(actions, vec![Action::new(ActionType::EndSetup)]);
    }

    #[test]
    fn test_matches_scrimmage_offer_exactly() {
        // Cross-validation against a real engine: every enumerated action
        // must be accepted, and the enumeration must cover the engine's
        // whole offer. Checked at a turn decision and inside a move action.
        let engine = Scrimmage::new();
        let turn = fixtures::open_field();
        let moving = engine
            .apply(&turn, &Action::for_player(ActionType::StartMove, PlayerId(1)))
            .unwrap();

        for state in [turn, moving] {
            let actions = legal_actions(&engine, &state).unwrap();
            let offered: usize = engine
                .available_actions(&state)
                .unwrap()
                .iter()
                .map(|c| c.players.len().max(c.positions.len()).max(1))
                .sum();
            assert_eq!(actions.len(), offered);

            for action in &actions {
                assert!(
                    engine.apply(&state, action).is_ok(),
                    "engine rejected enumerated action {action}"
                );
            }
        }
    }
}
