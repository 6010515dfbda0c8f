//! Search configuration.

/// How the best root action is extracted once the budget expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RootPolicy {
    /// Most-visited child; ties by mean reward, then by action ordering.
    #[default]
    RobustChild,
    /// Prefer children whose subtree hit the most provably-terminal
    /// (drive-ending) outcomes, then fall back to visit counts.
    TerminalPreference,
}

/// Configuration for a single time-boxed search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Exploration constant for UCB1. √2 is the textbook default.
    pub exploration_constant: f64,

    /// Check the wall clock every this many iterations. 1 keeps overrun
    /// bounded by a single iteration's latency; raise it only when
    /// iterations are much cheaper than a clock read.
    pub budget_check_interval: u32,

    /// Optional hard cap on iterations, applied alongside the time budget.
    pub max_iterations: Option<u32>,

    /// Optional hard cap on tree size in nodes.
    pub max_nodes: Option<usize>,

    pub root_policy: RootPolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            exploration_constant: std::f64::consts::SQRT_2,
            budget_check_interval: 1,
            max_iterations: None,
            max_nodes: None,
            root_policy: RootPolicy::RobustChild,
        }
    }
}

impl SearchConfig {
    /// Small deterministic search for tests.
    pub fn for_testing() -> Self {
        SearchConfig {
            max_iterations: Some(128),
            ..Default::default()
        }
    }

    pub fn with_exploration_constant(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    pub fn with_max_iterations(mut self, n: u32) -> Self {
        self.max_iterations = Some(n);
        self
    }

    pub fn with_max_nodes(mut self, n: usize) -> Self {
        self.max_nodes = Some(n);
        self
    }

    pub fn with_root_policy(mut self, policy: RootPolicy) -> Self {
        self.root_policy = policy;
        self
    }
}
