//! The rules-engine boundary.
//!
//! The host's rules implementation is injected behind this trait; the
//! decision core never sees a concrete engine type. Implementations enact
//! one action at a time, resolving any dice internally, and hand back a new
//! owned snapshot positioned at the next pending procedure.

use thiserror::Error;

use crate::action::Action;
use crate::enums::ActionType;
use crate::player::PlayerId;
use crate::position::Square;
use crate::state::GameState;

/// One base action choice the engine currently offers, with its eligible
/// players or target squares. At most one of the two lists is populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionChoice {
    pub action_type: ActionType,
    pub players: Vec<PlayerId>,
    pub positions: Vec<Square>,
}

impl ActionChoice {
    pub fn bare(action_type: ActionType) -> Self {
        ActionChoice {
            action_type,
            players: Vec::new(),
            positions: Vec::new(),
        }
    }

    pub fn with_players(action_type: ActionType, players: Vec<PlayerId>) -> Self {
        ActionChoice {
            action_type,
            players,
            positions: Vec::new(),
        }
    }

    pub fn with_positions(action_type: ActionType, positions: Vec<Square>) -> Self {
        ActionChoice {
            action_type,
            players: Vec::new(),
            positions,
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine refused an action it was offered. Seeing this for an
    /// action the enumerator produced means the enumerator and the engine
    /// have drifted apart, which is fatal for the current decision.
    #[error("rules engine rejected action: {0}")]
    Rejected(String),

    #[error("rules engine failure: {0}")]
    Internal(String),
}

/// A host-provided rules engine.
///
/// Both methods are snapshot-in, snapshot-out; `apply` must not mutate the
/// input. Per-state mutation inside the engine is assumed non-thread-safe:
/// a snapshot being advanced is owned exclusively by its caller.
pub trait RulesEngine: Send + Sync {
    /// The complete set of action choices at the state's pending procedure.
    fn available_actions(&self, state: &GameState) -> Result<Vec<ActionChoice>, EngineError>;

    /// Enact one action, advancing to the next pending decision point.
    /// Stochastic resolution happens inside and is reflected in the result.
    fn apply(&self, state: &GameState, action: &Action) -> Result<GameState, EngineError>;
}
