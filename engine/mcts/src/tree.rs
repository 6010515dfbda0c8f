//! Arena-backed search tree.
//!
//! Nodes live in one contiguous Vec and refer to each other by index, the
//! same shape the rest of the workspace uses for cyclic-looking structures.
//! The tree is built and consumed by a single search; it is never shared
//! between decisions.

use pitch_core::{Action, ActionType, Side};

use crate::config::RootPolicy;
use crate::evaluator::Valuation;
use crate::node::{NodeId, SearchNode};

#[derive(Debug)]
pub struct SearchTree {
    nodes: Vec<SearchNode>,
    root: NodeId,
}

impl SearchTree {
    pub fn new(root: SearchNode) -> Self {
        SearchTree {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Select the child with the best UCB score from the perspective of the
    /// side acting at `node_id`.
    ///
    /// A visited end-turn child is skipped while other options exist:
    /// ending the turn is rarely worth a second look and starves the rest
    /// of the tree of visits otherwise.
    pub fn select_child(&self, node_id: NodeId, exploration: f64) -> Option<NodeId> {
        let node = self.get(node_id);
        let side = node.side_to_act?;
        let parent_visits_ln = (node.visits.max(1) as f64).ln();

        let mut best: Option<(f64, NodeId)> = None;
        for (action, child_id) in &node.children {
            let child = self.get(*child_id);
            if action.action_type == ActionType::EndTurn
                && child.visits >= 1
                && node.children.len() > 1
            {
                continue;
            }
            let score = child.ucb_score(side, parent_visits_ln, exploration);
            if best.map(|(b, _)| score > b).unwrap_or(true) {
                best = Some((score, *child_id));
            }
        }
        best.map(|(_, id)| id)
    }

    /// Move one untried action into a child node. The caller has already
    /// applied the action successfully; this only mutates the tree.
    pub fn expand(
        &mut self,
        parent_id: NodeId,
        untried_index: usize,
        child: SearchNode,
    ) -> NodeId {
        let child_id = NodeId(self.nodes.len() as u32);
        self.nodes.push(child);

        let parent = self.get_mut(parent_id);
        let action = parent.untried.swap_remove(untried_index);
        parent.children.push((action, child_id));
        child_id
    }

    /// Accumulate an evaluation along the path from `leaf_id` to the root.
    /// Both reward components are added at every node; there is no negation
    /// because the valuation is already absolute (per side).
    pub fn backpropagate(&mut self, leaf_id: NodeId, valuation: Valuation, terminal: bool) {
        let mut current = leaf_id;
        while current.is_some() {
            let node = self.get_mut(current);
            node.visits += 1;
            node.reward[Side::Home.index()] += valuation.home as f64;
            node.reward[Side::Away.index()] += valuation.away as f64;
            if terminal {
                node.terminal_visits += 1;
            }
            current = node.parent;
        }
    }

    /// Extract the best root action once the budget has expired.
    ///
    /// Robust child: most visits, ties by mean reward for the root side,
    /// remaining ties by the deterministic action ordering. The
    /// terminal-preference variant ranks by terminal-outcome fraction
    /// before visits.
    pub fn best_root_action(&self, policy: RootPolicy) -> Option<Action> {
        let root = self.get(self.root);
        let side = root.side_to_act?;

        root.children
            .iter()
            .filter(|(_, id)| self.get(*id).visits > 0)
            .max_by(|(action_a, id_a), (action_b, id_b)| {
                let a = self.get(*id_a);
                let b = self.get(*id_b);
                let primary = match policy {
                    RootPolicy::RobustChild => a.visits.cmp(&b.visits),
                    RootPolicy::TerminalPreference => a
                        .terminal_fraction()
                        .partial_cmp(&b.terminal_fraction())
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then(a.visits.cmp(&b.visits)),
                };
                primary
                    .then(
                        a.mean_for(side)
                            .partial_cmp(&b.mean_for(side))
                            .unwrap_or(std::cmp::Ordering::Equal),
                    )
                    // Reversed so that the *smaller* action wins a full tie.
                    .then(action_b.cmp(action_a))
            })
            .map(|(action, _)| action.clone())
    }

    /// Root statistics for logging and diagnostics.
    pub fn root_valuation(&self) -> Valuation {
        let root = self.get(self.root);
        if root.visits == 0 {
            return Valuation::ZERO;
        }
        Valuation {
            home: (root.reward[0] / root.visits as f64) as f32,
            away: (root.reward[1] / root.visits as f64) as f32,
        }
    }
}
