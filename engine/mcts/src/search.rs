//! Time-boxed MCTS.
//!
//! One search per decision: selection walks the arena tree by UCB1,
//! expansion applies a single untried action through the simulation
//! adapter, the leaf evaluator scores the new state, and both per-side
//! reward components backpropagate to the root. The tree is discarded when
//! the call returns.
//!
//! Each iteration is atomic: the engine step and the evaluation both happen
//! before the tree is touched, so a failing iteration leaves every
//! invariant intact and already-backpropagated statistics stay valid.

use std::time::{Duration, Instant};

use pitch_core::{Action, GameState, Procedure, Side};
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::config::SearchConfig;
use crate::evaluator::{EvaluatorError, LeafEvaluator, Valuation};
use crate::node::SearchNode;
use crate::sim::{DecisionKind, SimAdapter, SimError};
use crate::tree::SearchTree;

#[derive(Debug, Error)]
pub enum SearchError {
    /// The root offers nothing to choose from. A player-turn decision with
    /// zero legal actions is a logic error upstream, never something to
    /// paper over.
    #[error("no legal actions at the root (procedure {procedure:?})")]
    NoLegalActions { procedure: Procedure },

    #[error(transparent)]
    Sim(#[from] SimError),

    #[error(transparent)]
    Evaluator(#[from] EvaluatorError),
}

/// Outcome of one search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub action: Action,
    /// Completed iterations within the budget.
    pub iterations: u32,
    /// Final tree size in nodes.
    pub nodes: usize,
    /// Mean root valuation per side.
    pub value: Valuation,
    pub elapsed: Duration,
}

/// A configured search over one adapter + evaluator pair.
pub struct MctsSearch<'a, E: LeafEvaluator + ?Sized> {
    sim: &'a SimAdapter<'a>,
    evaluator: &'a E,
    config: SearchConfig,
}

impl<'a, E: LeafEvaluator + ?Sized> MctsSearch<'a, E> {
    pub fn new(sim: &'a SimAdapter<'a>, evaluator: &'a E, config: SearchConfig) -> Self {
        MctsSearch {
            sim,
            evaluator,
            config,
        }
    }

    /// Search from `root_state` until the wall-clock budget (or an optional
    /// iteration/node cap) is exhausted, then extract the best root action.
    pub fn run(
        &self,
        root_state: &GameState,
        budget: Duration,
        rng: &mut ChaCha20Rng,
    ) -> Result<SearchResult, SearchError> {
        let start = Instant::now();
        let root_scores = root_state.scores();

        let untried = self.sim.legal_actions(root_state)?;
        if untried.is_empty() {
            return Err(SearchError::NoLegalActions {
                procedure: root_state.procedure,
            });
        }

        let mut tree = SearchTree::new(SearchNode::new_root(root_state.clone(), untried));
        let mut iterations: u32 = 0;

        loop {
            if iterations % self.config.budget_check_interval.max(1) == 0
                && start.elapsed() >= budget
            {
                break;
            }
            if let Some(max) = self.config.max_iterations {
                if iterations >= max {
                    break;
                }
            }
            if let Some(max) = self.config.max_nodes {
                if tree.len() >= max {
                    break;
                }
            }

            self.run_iteration(&mut tree, root_scores, rng)?;
            iterations += 1;
        }

        let action = match tree.best_root_action(self.config.root_policy) {
            Some(action) => action,
            None => {
                // The budget expired before a single iteration finished.
                // Return the deterministically-first legal action instead
                // of failing; the caller asked for *a* move.
                warn!(
                    budget_ms = budget.as_millis() as u64,
                    "time budget exhausted before any iteration; falling back to first legal action"
                );
                self.first_legal_action(&tree)
            }
        };

        let result = SearchResult {
            action,
            iterations,
            nodes: tree.len(),
            value: tree.root_valuation(),
            elapsed: start.elapsed(),
        };
        debug!(
            action = %result.action,
            iterations = result.iterations,
            nodes = result.nodes,
            elapsed_ms = result.elapsed.as_millis() as u64,
            "search complete"
        );
        Ok(result)
    }

    fn first_legal_action(&self, tree: &SearchTree) -> Action {
        let root = tree.get(tree.root());
        root.untried
            .iter()
            .chain(root.children.iter().map(|(a, _)| a))
            .min()
            .cloned()
            .expect("root action set validated non-empty")
    }

    /// One select → expand → evaluate → backpropagate pass.
    fn run_iteration(
        &self,
        tree: &mut SearchTree,
        root_scores: [u8; 2],
        rng: &mut ChaCha20Rng,
    ) -> Result<(), SearchError> {
        // Selection: descend while fully expanded and non-terminal.
        let mut node_id = tree.root();
        loop {
            let node = tree.get(node_id);
            if node.is_terminal || !node.is_fully_expanded() {
                break;
            }
            match tree.select_child(node_id, self.config.exploration_constant) {
                Some(child) => node_id = child,
                None => break,
            }
        }

        // Terminal leaf: re-sample its value so the statistics keep
        // sharpening around forced outcomes.
        if tree.get(node_id).is_terminal {
            let valuation =
                self.leaf_valuation(&tree.get(node_id).state, root_scores, true, rng)?;
            tree.backpropagate(node_id, valuation, true);
            return Ok(());
        }

        // Expansion: apply one untried action through the adapter before
        // mutating the tree.
        let node = tree.get(node_id);
        let untried_index = rng.gen_range(0..node.untried.len());
        let action = node.untried[untried_index].clone();
        let child_state = self.sim.step(&node.state, &action)?;

        let mut is_terminal = self.sim.classify(&child_state) == DecisionKind::Terminal;
        let child_untried = if is_terminal {
            Vec::new()
        } else {
            self.sim.legal_actions(&child_state)?
        };
        is_terminal = is_terminal || child_untried.is_empty();

        let valuation = self.leaf_valuation(&child_state, root_scores, is_terminal, rng)?;
        trace!(action = %action, terminal = is_terminal, "expanded");

        let child = SearchNode::new_child(node_id, action, child_state, child_untried, is_terminal);
        let child_id = tree.expand(node_id, untried_index, child);
        tree.backpropagate(child_id, valuation, is_terminal);
        Ok(())
    }

    /// Valuation for a leaf. A terminal whose score moved since the root is
    /// decided: ±1 to the scoring side. Everything else asks the evaluator.
    fn leaf_valuation(
        &self,
        state: &GameState,
        root_scores: [u8; 2],
        is_terminal: bool,
        rng: &mut ChaCha20Rng,
    ) -> Result<Valuation, SearchError> {
        if is_terminal {
            let scores = state.scores();
            if scores[Side::Home.index()] > root_scores[Side::Home.index()] {
                return Ok(Valuation::scored_by(Side::Home));
            }
            if scores[Side::Away.index()] > root_scores[Side::Away.index()] {
                return Ok(Valuation::scored_by(Side::Away));
            }
        }
        Ok(self.evaluator.evaluate(self.sim, state, rng)?)
    }
}

/// Convenience wrapper running one search end to end.
pub fn run_search<E: LeafEvaluator + ?Sized>(
    sim: &SimAdapter<'_>,
    evaluator: &E,
    config: SearchConfig,
    root_state: &GameState,
    budget: Duration,
    rng: &mut ChaCha20Rng,
) -> Result<SearchResult, SearchError> {
    MctsSearch::new(sim, evaluator, config).run(root_state, budget, rng)
}
