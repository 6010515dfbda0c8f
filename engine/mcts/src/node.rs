//! Search tree nodes.
//!
//! Each node owns the snapshot it represents and the statistics UCB
//! selection reads. Rewards are tracked per side (home, away): the game has
//! two scores, and whose turn it is can change several times along one
//! tree path, so a negamax scalar would not compose.

use pitch_core::{Action, GameState, Side};

/// Index into the node arena. Parent references are plain indices, so the
/// tree has no ownership cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// A node in the search tree.
///
/// Lifecycle: created on expansion, mutated only by further expansion
/// (untried shrinks, children grows) and backpropagation (visits, reward).
/// The whole tree is discarded after one decision.
#[derive(Debug, Clone)]
pub struct SearchNode {
    /// Parent index (NONE for the root).
    pub parent: NodeId,

    /// Action that led here from the parent (None for the root).
    pub action: Option<Action>,

    /// Owned snapshot at this node.
    pub state: GameState,

    /// Side making the choice at this node, if any is pending.
    pub side_to_act: Option<Side>,

    pub visits: u32,

    /// Accumulated reward per side, home first.
    pub reward: [f64; 2],

    /// How many backpropagated evaluations below this node ended in a
    /// provably-terminal (drive-ending) state.
    pub terminal_visits: u32,

    /// Legal actions not yet expanded, in deterministic enumeration order.
    pub untried: Vec<Action>,

    /// Expanded children keyed by the action that produced them.
    pub children: Vec<(Action, NodeId)>,

    pub is_terminal: bool,
}

impl SearchNode {
    pub fn new_root(state: GameState, untried: Vec<Action>) -> Self {
        let side_to_act = state.current_side();
        SearchNode {
            parent: NodeId::NONE,
            action: None,
            side_to_act,
            visits: 0,
            reward: [0.0; 2],
            terminal_visits: 0,
            untried,
            children: Vec::new(),
            is_terminal: false,
            state,
        }
    }

    pub fn new_child(
        parent: NodeId,
        action: Action,
        state: GameState,
        untried: Vec<Action>,
        is_terminal: bool,
    ) -> Self {
        let side_to_act = state.current_side();
        SearchNode {
            parent,
            action: Some(action),
            side_to_act,
            visits: 0,
            reward: [0.0; 2],
            terminal_visits: 0,
            untried,
            children: Vec::new(),
            is_terminal,
            state,
        }
    }

    /// Mean reward for one side. 0 before the first visit.
    #[inline]
    pub fn mean_for(&self, side: Side) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.reward[side.index()] / self.visits as f64
        }
    }

    /// UCB1 from the perspective of the side choosing among siblings.
    /// Unvisited nodes are infinitely attractive so every child is tried
    /// once before any is revisited.
    ///
    /// `parent_visits_ln` is precomputed by the caller; it is shared by
    /// every sibling in one comparison.
    #[inline]
    pub fn ucb_score(&self, side: Side, parent_visits_ln: f64, exploration: f64) -> f64 {
        if self.visits == 0 {
            return f64::INFINITY;
        }
        let exploit = self.mean_for(side);
        let explore = exploration * (parent_visits_ln / self.visits as f64).sqrt();
        exploit + explore
    }

    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }

    #[inline]
    pub fn is_expanded(&self) -> bool {
        !self.children.is_empty()
    }

    /// Fraction of this node's evaluations that ended in a terminal state.
    #[inline]
    pub fn terminal_fraction(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.terminal_visits as f64 / self.visits as f64
        }
    }
}
