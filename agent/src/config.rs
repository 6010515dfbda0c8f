//! Agent configuration.
//!
//! Everything tunable about a decision agent in one deserializable struct:
//! search knobs, the block-die preference order, and the scripted-policy
//! constants. Each section converts into the engine-side type it
//! configures.

use mcts::{BlockDicePolicy, RootPolicy, ScriptedPolicy, SearchConfig};
use pitch_core::ActionType;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Seed for expansion tie-breaks and rollouts. Fixed seed + fixed
    /// budget caps = reproducible decisions.
    pub seed: u64,
    pub search: SearchSettings,
    pub block_dice: BlockDiceSettings,
    pub scripted: ScriptedSettings,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            seed: 0,
            search: SearchSettings::default(),
            block_dice: BlockDiceSettings::default(),
            scripted: ScriptedSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub exploration_constant: f64,
    pub budget_check_interval: u32,
    pub max_iterations: Option<u32>,
    pub max_nodes: Option<usize>,
    /// Rank root children by terminal-outcome fraction before visits.
    pub terminal_preference: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        SearchSettings {
            exploration_constant: std::f64::consts::SQRT_2,
            budget_check_interval: 1,
            max_iterations: None,
            max_nodes: None,
            terminal_preference: false,
        }
    }
}

impl SearchSettings {
    pub fn to_search_config(&self) -> SearchConfig {
        let mut config = SearchConfig::default()
            .with_exploration_constant(self.exploration_constant)
            .with_root_policy(if self.terminal_preference {
                RootPolicy::TerminalPreference
            } else {
                RootPolicy::RobustChild
            });
        config.budget_check_interval = self.budget_check_interval;
        config.max_iterations = self.max_iterations;
        config.max_nodes = self.max_nodes;
        config
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BlockDiceSettings {
    /// Die results best-first from the chooser's perspective.
    pub preference: Vec<ActionType>,
    pub accept_trades: bool,
}

impl Default for BlockDiceSettings {
    fn default() -> Self {
        let policy = BlockDicePolicy::default();
        BlockDiceSettings {
            preference: policy.preference,
            accept_trades: policy.accept_trades,
        }
    }
}

impl BlockDiceSettings {
    pub fn to_policy(&self) -> BlockDicePolicy {
        BlockDicePolicy {
            preference: self.preference.clone(),
            accept_trades: self.accept_trades,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScriptedSettings {
    pub coin_call: ActionType,
    pub receiving_formation: ActionType,
    pub kicking_formation: ActionType,
}

impl Default for ScriptedSettings {
    fn default() -> Self {
        let policy = ScriptedPolicy::default();
        ScriptedSettings {
            coin_call: policy.coin_call,
            receiving_formation: policy.receiving_formation,
            kicking_formation: policy.kicking_formation,
        }
    }
}

impl ScriptedSettings {
    pub fn to_policy(&self) -> ScriptedPolicy {
        ScriptedPolicy {
            coin_call: self.coin_call,
            receiving_formation: self.receiving_formation,
            kicking_formation: self.kicking_formation,
        }
    }
}
