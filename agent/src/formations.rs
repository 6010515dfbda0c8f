//! Pre-built setup formations.
//!
//! Fallback for the setup edge case where the engine offers no formation
//! choice and expects explicit placements. Slots are (depth, row): depth 0
//! is the scrimmage column on our side, rows are absolute board rows.

use pitch_core::{constants::PITCH_WIDTH, Action, ActionType, GameState, PlayerId, Side, Square};

#[derive(Debug, Clone, Copy)]
pub struct Formation {
    pub name: &'static str,
    pub slots: [(i32, i32); 11],
}

/// Three on the line, runners wide, the rest staged behind the carrier
/// lanes.
pub const LINE_OFFENSE: Formation = Formation {
    name: "line offense",
    slots: [
        (0, 7),
        (0, 8),
        (0, 9),
        (1, 4),
        (1, 12),
        (2, 6),
        (2, 8),
        (2, 10),
        (4, 3),
        (4, 13),
        (5, 8),
    ],
};

/// Three on the line, the rest spread in two screens.
pub const SPREAD_DEFENSE: Formation = Formation {
    name: "spread defense",
    slots: [
        (0, 7),
        (0, 8),
        (0, 9),
        (2, 3),
        (2, 6),
        (2, 10),
        (2, 13),
        (5, 2),
        (5, 8),
        (5, 14),
        (7, 8),
    ],
};

fn slot_square(side: Side, depth: i32, row: i32) -> Square {
    let x = match side {
        // Home owns the right half; its scrimmage column is the midline.
        Side::Home => PITCH_WIDTH / 2 + depth,
        Side::Away => PITCH_WIDTH / 2 - 1 - depth,
    };
    Square::new(x, row)
}

/// Placement actions pairing off-pitch players with formation slots, in
/// roster order. Occupied squares are skipped so a partial re-setup stays
/// legal.
pub fn placements(formation: &Formation, state: &GameState, side: Side) -> Vec<Action> {
    let off_pitch: Vec<PlayerId> = state
        .team(side)
        .players_by_id
        .values()
        .filter(|p| !p.is_on_pitch() && !p.state.knocked_out)
        .map(|p| p.id)
        .collect();

    let mut actions = Vec::new();
    let mut players = off_pitch.into_iter();
    for (depth, row) in formation.slots {
        let square = slot_square(side, depth, row);
        if state.player_at(square).is_some() {
            continue;
        }
        let Some(player) = players.next() else { break };
        actions.push(Action::placed(ActionType::PlacePlayer, player, square));
    }
    actions
}
