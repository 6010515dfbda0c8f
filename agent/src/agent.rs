//! The per-decision driver.
//!
//! One `choose_action` call per decision point: planned setup actions
//! drain first (revalidated against the engine's current offer), scripted
//! and defender-block decisions resolve without search, a lone legal
//! action short-circuits, and everything else runs the time-boxed search.
//! No state is retained across calls beyond configuration and the setup
//! plan.

use std::collections::VecDeque;
use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, warn};

use mcts::{
    block_favor_is_attackers, run_search, BlockDiceError, DecisionKind, LeafEvaluator,
    ScriptedError, ScriptedKind, SearchError, SimAdapter, SimError,
};
use pitch_core::{Action, ActionType, GameState, Procedure, RulesEngine, Side};

use crate::config::AgentConfig;
use crate::formations::{self, Formation, LINE_OFFENSE, SPREAD_DEFENSE};

#[derive(Debug, Error)]
pub enum AgentError {
    /// Asked to act on a terminal state: there is nothing to decide.
    #[error("no decision is pending (procedure {procedure:?})")]
    NoPendingDecision { procedure: Procedure },

    /// Setup needs explicit placements but no side is set up.
    #[error("setup decision without a current team")]
    SetupWithoutTeam,

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Sim(#[from] SimError),

    #[error(transparent)]
    Scripted(#[from] ScriptedError),

    #[error(transparent)]
    BlockDice(#[from] BlockDiceError),
}

/// A decision agent bound to one rules engine and one leaf evaluator.
pub struct Agent<'e> {
    sim: SimAdapter<'e>,
    evaluator: Box<dyn LeafEvaluator>,
    config: AgentConfig,
    /// Planned setup placements, drained one action per call.
    planned: VecDeque<Action>,
    rng: ChaCha20Rng,
}

impl<'e> Agent<'e> {
    pub fn new(
        engine: &'e dyn RulesEngine,
        evaluator: Box<dyn LeafEvaluator>,
        config: AgentConfig,
    ) -> Self {
        let sim = SimAdapter::with_policies(
            engine,
            config.scripted.to_policy(),
            config.block_dice.to_policy(),
        );
        let rng = ChaCha20Rng::seed_from_u64(config.seed);
        Agent {
            sim,
            evaluator,
            config,
            planned: VecDeque::new(),
            rng,
        }
    }

    /// Choose the next action for the pending decision, within the budget.
    pub fn choose_action(
        &mut self,
        state: &GameState,
        budget: Duration,
    ) -> Result<Action, AgentError> {
        if let Some(action) = self.next_planned(state)? {
            return Ok(action);
        }

        match self.sim.classify(state) {
            DecisionKind::Terminal => Err(AgentError::NoPendingDecision {
                procedure: state.procedure,
            }),
            DecisionKind::Scripted(ScriptedKind::Setup) => self.setup_action(state),
            DecisionKind::Scripted(kind) => Ok(self.sim.scripted().action(state, kind)?),
            DecisionKind::BlockDiceSelection if !block_favor_is_attackers(state) => {
                debug!("defender holds the block-die favor, applying preference order");
                Ok(self.sim.block_dice().choose(state)?)
            }
            DecisionKind::PlayerTurn | DecisionKind::BlockDiceSelection => {
                self.searched_action(state, budget)
            }
        }
    }

    /// Pop the next planned action if its preconditions still hold. A plan
    /// whose action the engine no longer offers is discarded wholesale and
    /// the decision replanned; a stale action is never substituted or
    /// forwarded.
    fn next_planned(&mut self, state: &GameState) -> Result<Option<Action>, AgentError> {
        let Some(next) = self.planned.front() else {
            return Ok(None);
        };
        if self.is_offered(state, next)? {
            return Ok(self.planned.pop_front());
        }
        warn!(action = %next, "planned action no longer offered; replanning");
        self.planned.clear();
        Ok(None)
    }

    fn is_offered(&self, state: &GameState, action: &Action) -> Result<bool, AgentError> {
        let choices = self
            .sim
            .engine()
            .available_actions(state)
            .map_err(|e| SimError::Engine(e.to_string()))?;
        Ok(choices.iter().any(|choice| {
            choice.action_type == action.action_type
                && (choice.players.is_empty()
                    || action.player.map(|p| choice.players.contains(&p)).unwrap_or(false))
                && (choice.positions.is_empty()
                    || action
                        .position
                        .map(|sq| choice.positions.contains(&sq))
                        .unwrap_or(false))
        }))
    }

    /// Setup: take the engine's formation offer when there is one; plan
    /// explicit placements from the formation table otherwise.
    fn setup_action(&mut self, state: &GameState) -> Result<Action, AgentError> {
        let has_formation_offer = state.rolls.iter().any(|r| {
            matches!(
                r,
                ActionType::SetupFormationLine
                    | ActionType::SetupFormationSpread
                    | ActionType::SetupFormationWedge
                    | ActionType::SetupFormationZone
            )
        });
        if has_formation_offer || !state.rolls.contains(&ActionType::PlacePlayer) {
            return Ok(self.sim.scripted().action(state, ScriptedKind::Setup)?);
        }

        let side = state.current_side().ok_or(AgentError::SetupWithoutTeam)?;
        let formation = self.formation_for(state, side);
        let mut plan: VecDeque<Action> =
            formations::placements(formation, state, side).into();
        plan.push_back(Action::new(ActionType::EndSetup));
        debug!(
            formation = formation.name,
            placements = plan.len() - 1,
            "planned explicit setup"
        );

        self.planned = plan;
        self.next_planned(state)?.ok_or_else(|| {
            AgentError::Scripted(ScriptedError::Unresolvable {
                kind: ScriptedKind::Setup,
                procedure: state.procedure,
            })
        })
    }

    fn formation_for(&self, state: &GameState, side: Side) -> &'static Formation {
        if state.receiving_side() == Some(side) {
            &LINE_OFFENSE
        } else {
            &SPREAD_DEFENSE
        }
    }

    /// Run the search, unless exactly one action is legal.
    fn searched_action(
        &mut self,
        state: &GameState,
        budget: Duration,
    ) -> Result<Action, AgentError> {
        let mut legal = self.sim.legal_actions(state)?;
        match legal.len() {
            0 => Err(AgentError::Search(SearchError::NoLegalActions {
                procedure: state.procedure,
            })),
            1 => {
                debug!(action = %legal[0], "single legal action, skipping search");
                Ok(legal.swap_remove(0))
            }
            _ => {
                let result = run_search(
                    &self.sim,
                    self.evaluator.as_ref(),
                    self.config.search.to_search_config(),
                    state,
                    budget,
                    &mut self.rng,
                )?;
                Ok(result.action)
            }
        }
    }
}
