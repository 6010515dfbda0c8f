//! Monte Carlo Tree Search for a turn-based tabletop sports game.
//!
//! The crate turns a snapshot of a match plus an injected rules engine into
//! a single chosen action under a wall-clock budget:
//!
//! 1. **Selection**: walk the arena tree by UCB1 from the side to act
//! 2. **Expansion**: apply one untried legal action through the
//!    [`SimAdapter`], which transparently resolves scripted sub-decisions
//! 3. **Evaluation**: score the leaf with a [`LeafEvaluator`] (heuristic,
//!    random playout or a pretrained value network)
//! 4. **Backpropagation**: accumulate per-side rewards along the path
//!
//! The rules engine only appears as the `pitch_core::RulesEngine` trait;
//! nothing in here knows a concrete implementation. The same goes for the
//! value network, which hides behind the `onnx` feature.

pub mod actions;
pub mod block_dice;
pub mod config;
pub mod evaluator;
pub mod features;
pub mod node;
pub mod scripted;
pub mod search;
pub mod sim;
pub mod tree;

#[cfg(feature = "onnx")]
pub mod onnx;

pub use actions::legal_actions;
pub use block_dice::{BlockDiceError, BlockDicePolicy};
pub use config::{RootPolicy, SearchConfig};
pub use evaluator::{
    EvaluatorError, HeuristicEvaluator, LeafEvaluator, RolloutEvaluator, UniformEvaluator,
    Valuation,
};
pub use node::{NodeId, SearchNode};
pub use scripted::{ScriptedError, ScriptedPolicy};
pub use search::{run_search, MctsSearch, SearchError, SearchResult};
pub use sim::{block_favor_is_attackers, classify, DecisionKind, ScriptedKind, SimAdapter, SimError};
pub use tree::SearchTree;

#[cfg(feature = "onnx")]
pub use onnx::OnnxEvaluator;
