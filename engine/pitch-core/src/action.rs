//! Actions submitted to the rules engine.

use serde::{Deserialize, Serialize};

use crate::enums::ActionType;
use crate::player::PlayerId;
use crate::position::Square;

/// One decision the engine can enact: an action type plus optional player
/// and square targets.
///
/// Equality is structural over all three fields. The derived ordering
/// (type, then player, then position) is the deterministic tie-break used
/// when search statistics are equal.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Action {
    pub action_type: ActionType,
    pub player: Option<PlayerId>,
    pub position: Option<Square>,
}

impl Action {
    pub fn new(action_type: ActionType) -> Self {
        Action {
            action_type,
            player: None,
            position: None,
        }
    }

    pub fn for_player(action_type: ActionType, player: PlayerId) -> Self {
        Action {
            action_type,
            player: Some(player),
            position: None,
        }
    }

    pub fn at_position(action_type: ActionType, position: Square) -> Self {
        Action {
            action_type,
            player: None,
            position: Some(position),
        }
    }

    pub fn placed(action_type: ActionType, player: PlayerId, position: Square) -> Self {
        Action {
            action_type,
            player: Some(player),
            position: Some(position),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.action_type)?;
        if let Some(player) = self.player {
            write!(f, " {player}")?;
        }
        if let Some(pos) = self.position {
            write!(f, " @({},{})", pos.x, pos.y)?;
        }
        Ok(())
    }
}
