//! Decision agent for a turn-based tabletop sports game.
//!
//! Glue between the wire boundary and the search engine: decode a
//! snapshot, route the pending decision (scripted, shortcut, or full
//! search), and hand back one action. The rules engine and the leaf
//! evaluator are injected; the agent retains nothing across calls except
//! its configuration and an in-flight setup plan.
//!
//! ```no_run
//! use std::time::Duration;
//! use agent::{Agent, AgentConfig};
//! use mcts::RolloutEvaluator;
//! use scrimmage::Scrimmage;
//!
//! let engine = Scrimmage::new();
//! let mut agent = Agent::new(
//!     &engine,
//!     Box::new(RolloutEvaluator::default()),
//!     AgentConfig::default(),
//! );
//!
//! let state = pitch_core::wire::state_from_json("...").unwrap();
//! let action = agent.choose_action(&state, Duration::from_millis(1000)).unwrap();
//! println!("{}", pitch_core::wire::action_to_json(&action).unwrap());
//! ```

pub mod agent;
pub mod config;
pub mod formations;

pub use agent::{Agent, AgentError};
pub use config::{AgentConfig, BlockDiceSettings, ScriptedSettings, SearchSettings};
pub use formations::{Formation, LINE_OFFENSE, SPREAD_DEFENSE};
