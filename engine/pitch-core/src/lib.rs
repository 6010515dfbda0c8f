//! Core types for the pitch decision engine.
//!
//! This crate owns the typed snapshot of a match (`GameState` and friends),
//! the wire codec that converts snapshots and actions to/from the interchange
//! format, and the [`RulesEngine`] trait through which the host's rules
//! implementation is injected. No game rules live here: legality and
//! resolution belong to the host engine, search belongs to the `mcts` crate.

pub mod action;
pub mod ball;
pub mod constants;
pub mod engine;
pub mod enums;
pub mod player;
pub mod position;
pub mod state;
pub mod team;
pub mod wire;

pub use action::Action;
pub use ball::Ball;
pub use engine::{ActionChoice, EngineError, RulesEngine};
pub use enums::{ActionType, PlayerRole, Procedure, Skill, Weather};
pub use player::{Player, PlayerId, PlayerState};
pub use position::Square;
pub use state::{BlockContext, GameState, Side, TurnState};
pub use team::{Dugout, Team, TeamId};
pub use wire::{CodecError, WireAction, WireState};
