//! Simulation adapter.
//!
//! The host rules engine runs a stack of nested procedures; one submitted
//! action can leave it waiting anywhere in that stack. The adapter flattens
//! this into a single-step interface for the search: `step` applies an
//! action and then forwards every decision with only one sensible
//! resolution (scripted setup phases, forced side-effect confirmations,
//! defender-favored block-die picks) until the next decision actually worth
//! searching, a terminal state, or an error.

use pitch_core::{Action, EngineError, GameState, Procedure, RulesEngine};
use thiserror::Error;
use tracing::trace;

use crate::actions::legal_actions;
use crate::block_dice::{BlockDiceError, BlockDicePolicy};
use crate::scripted::{ScriptedError, ScriptedPolicy};

/// Sub-decisions resolved by script instead of search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptedKind {
    CoinTossFlip,
    KickReceive,
    Setup,
    PlaceBall,
    Touchback,
    HighKick,
    Interception,
    /// Engine-internal side-effect procedure with a single offered action.
    Forced,
}

/// What the pending decision at a state means to the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionKind {
    /// A strategically meaningful choice: the search target.
    PlayerTurn,
    /// Resolved by the scripted policy.
    Scripted(ScriptedKind),
    /// Pick among pre-rolled block dice.
    BlockDiceSelection,
    /// Game, drive or turn boundary: the search horizon.
    Terminal,
}

/// Classify a snapshot's pending decision. Pure and total: every procedure
/// variant maps to exactly one kind.
pub fn classify(state: &GameState) -> DecisionKind {
    if state.game_over {
        return DecisionKind::Terminal;
    }
    match state.procedure {
        Procedure::EndGame
        | Procedure::EndTurn
        | Procedure::Touchdown
        | Procedure::Turnover
        | Procedure::Half => DecisionKind::Terminal,

        Procedure::Turn
        | Procedure::MoveAction
        | Procedure::BlockAction
        | Procedure::BlitzAction
        | Procedure::PassAction
        | Procedure::HandoffAction
        | Procedure::FoulAction
        | Procedure::Push
        | Procedure::FollowUp
        | Procedure::Reroll
        | Procedure::Ejection => DecisionKind::PlayerTurn,

        Procedure::Block => DecisionKind::BlockDiceSelection,

        Procedure::CoinTossFlip => DecisionKind::Scripted(ScriptedKind::CoinTossFlip),
        Procedure::CoinTossKickReceive => DecisionKind::Scripted(ScriptedKind::KickReceive),
        Procedure::Setup => DecisionKind::Scripted(ScriptedKind::Setup),
        Procedure::PlaceBall => DecisionKind::Scripted(ScriptedKind::PlaceBall),
        Procedure::Touchback => DecisionKind::Scripted(ScriptedKind::Touchback),
        Procedure::HighKick => DecisionKind::Scripted(ScriptedKind::HighKick),
        Procedure::Interception => DecisionKind::Scripted(ScriptedKind::Interception),

        // Everything else is the engine resolving physics (armor, injury,
        // bounces, ...) while offering a lone confirmation action.
        _ => DecisionKind::Scripted(ScriptedKind::Forced),
    }
}

/// True when the side holding the block-die choice is the attacker. Those
/// picks couple with pushes and follow-ups, so they stay inside the
/// search; defender picks resolve by preference order.
pub fn block_favor_is_attackers(state: &GameState) -> bool {
    let (Some(context), Some(chooser)) = (&state.block_context, state.current_side()) else {
        // Without context we cannot tell; surface the decision rather than
        // guess a resolution.
        return true;
    };
    state.side_of_player(context.attacker) == Some(chooser)
}

#[derive(Debug, Error)]
pub enum SimError {
    /// A search-enumerated action was rejected at apply time: the
    /// enumerator and the rules engine have drifted apart. Fatal for the
    /// decision; the offending action and snapshot travel with the error.
    #[error("enumerated action {action} rejected at {procedure:?}: {reason}")]
    EnumerationMismatch {
        action: Action,
        procedure: Procedure,
        reason: String,
        state: Box<GameState>,
    },

    /// A scripted resolution was rejected: the scripted policy has drifted
    /// from the engine's notion of the decision.
    #[error("scripted action {action} rejected at {procedure:?}: {reason}")]
    ScriptedRejected {
        action: Action,
        procedure: Procedure,
        reason: String,
    },

    #[error(transparent)]
    UnsupportedDecision(#[from] ScriptedError),

    #[error(transparent)]
    BlockDice(#[from] BlockDiceError),

    #[error("rules engine failure: {0}")]
    Engine(String),

    /// The forwarding loop ran away: the engine keeps presenting scripted
    /// decisions without converging on a searchable one.
    #[error("gave up forwarding scripted decisions after {limit} steps at {procedure:?}")]
    ForwardingOverflow { limit: u32, procedure: Procedure },
}

/// The search's window onto the rules engine.
pub struct SimAdapter<'e> {
    engine: &'e dyn RulesEngine,
    scripted: ScriptedPolicy,
    block_dice: BlockDicePolicy,
    /// Upper bound on auto-forwarded decisions per step.
    max_forwarded: u32,
}

impl<'e> SimAdapter<'e> {
    pub fn new(engine: &'e dyn RulesEngine) -> Self {
        SimAdapter {
            engine,
            scripted: ScriptedPolicy::default(),
            block_dice: BlockDicePolicy::default(),
            max_forwarded: 64,
        }
    }

    pub fn with_policies(
        engine: &'e dyn RulesEngine,
        scripted: ScriptedPolicy,
        block_dice: BlockDicePolicy,
    ) -> Self {
        SimAdapter {
            engine,
            scripted,
            block_dice,
            max_forwarded: 64,
        }
    }

    pub fn engine(&self) -> &dyn RulesEngine {
        self.engine
    }

    pub fn scripted(&self) -> &ScriptedPolicy {
        &self.scripted
    }

    pub fn block_dice(&self) -> &BlockDicePolicy {
        &self.block_dice
    }

    pub fn classify(&self, state: &GameState) -> DecisionKind {
        classify(state)
    }

    /// Complete legal action set at a state, via the enumerator.
    pub fn legal_actions(&self, state: &GameState) -> Result<Vec<Action>, SimError> {
        legal_actions(self.engine, state).map_err(|e| SimError::Engine(e.to_string()))
    }

    /// Apply one enumerated action, then settle to the next externally
    /// meaningful decision point.
    pub fn step(&self, state: &GameState, action: &Action) -> Result<GameState, SimError> {
        let next = self.engine.apply(state, action).map_err(|e| match e {
            EngineError::Rejected(reason) => SimError::EnumerationMismatch {
                action: action.clone(),
                procedure: state.procedure,
                reason,
                state: Box::new(state.clone()),
            },
            EngineError::Internal(reason) => SimError::Engine(reason),
        })?;
        self.settle(next)
    }

    /// Forward scripted, forced and defender-favored block decisions until
    /// the state waits on a searchable decision or a terminal boundary.
    pub fn settle(&self, mut state: GameState) -> Result<GameState, SimError> {
        for _ in 0..self.max_forwarded {
            let resolution = match self.classify(&state) {
                DecisionKind::Terminal | DecisionKind::PlayerTurn => return Ok(state),
                DecisionKind::BlockDiceSelection => {
                    if block_favor_is_attackers(&state) {
                        return Ok(state);
                    }
                    self.block_dice.choose(&state)?
                }
                DecisionKind::Scripted(kind) => self.scripted.action(&state, kind)?,
            };

            trace!(action = %resolution, procedure = ?state.procedure, "auto-forwarding scripted decision");
            state = self.engine.apply(&state, &resolution).map_err(|e| {
                SimError::ScriptedRejected {
                    action: resolution.clone(),
                    procedure: state.procedure,
                    reason: e.to_string(),
                }
            })?;
        }
        Err(SimError::ForwardingOverflow {
            limit: self.max_forwarded,
            procedure: state.procedure,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitch_core::{ActionChoice, ActionType, BlockContext, PlayerId, Square};
    use scrimmage::{fixtures, Scrimmage};

    #[test]
    fn test_classify_core_kinds() {
        let mut state = fixtures::open_field();
        assert_eq!(classify(&state), DecisionKind::PlayerTurn);

        state.procedure = Procedure::CoinTossFlip;
        assert_eq!(
            classify(&state),
            DecisionKind::Scripted(ScriptedKind::CoinTossFlip)
        );

        state.procedure = Procedure::Block;
        assert_eq!(classify(&state), DecisionKind::BlockDiceSelection);

        state.procedure = Procedure::Armor;
        assert_eq!(classify(&state), DecisionKind::Scripted(ScriptedKind::Forced));

        state.procedure = Procedure::EndTurn;
        assert_eq!(classify(&state), DecisionKind::Terminal);

        state.procedure = Procedure::Turn;
        state.game_over = true;
        assert_eq!(classify(&state), DecisionKind::Terminal);
    }

    #[test]
    fn test_block_favor_attribution() {
        let mut state = fixtures::open_field();
        state.procedure = Procedure::Block;
        state.block_context = Some(BlockContext {
            attacker: PlayerId(1), // home player in the fixture
            defender: PlayerId(21),
            position: None,
            knock_out: false,
            push_chain: vec![],
        });

        // Home chooses and home attacks: the attacker holds the favor.
        assert!(block_favor_is_attackers(&state));

        // Away chooses while home attacks: defender favor.
        state.current_team_id = Some("away".into());
        assert!(!block_favor_is_attackers(&state));
    }

    #[test]
    fn test_step_reaches_next_player_turn() {
        let engine = Scrimmage::new();
        let sim = SimAdapter::new(&engine);
        let state = fixtures::open_field();

        let next = sim
            .step(&state, &Action::for_player(ActionType::StartMove, PlayerId(1)))
            .unwrap();
        assert_eq!(sim.classify(&next), DecisionKind::PlayerTurn);
        assert_eq!(next.procedure, Procedure::MoveAction);
    }

    #[test]
    fn test_step_surfaces_mismatch_with_snapshot() {
        let engine = Scrimmage::new();
        let sim = SimAdapter::new(&engine);
        let state = fixtures::open_field();

        let bogus = Action::for_player(ActionType::StartMove, PlayerId(999));
        match sim.step(&state, &bogus) {
            Err(SimError::EnumerationMismatch {
                action,
                procedure,
                state: snapshot,
                ..
            }) => {
                assert_eq!(action, bogus);
                assert_eq!(procedure, Procedure::Turn);
                assert_eq!(snapshot.procedure, Procedure::Turn);
            }
            other => panic!("expected EnumerationMismatch, got {other:?}"),
        }
    }

    /// Engine that walks a coin-toss chain to a turn, to prove the adapter
    /// unwraps several chained scripted decisions in one step call.
    struct TossChain;

    impl RulesEngine for TossChain {
        fn available_actions(&self, state: &GameState) -> Result<Vec<ActionChoice>, EngineError> {
            Ok(match state.procedure {
                Procedure::CoinTossFlip => vec![
                    ActionChoice::bare(ActionType::Heads),
                    ActionChoice::bare(ActionType::Tails),
                ],
                Procedure::CoinTossKickReceive => vec![
                    ActionChoice::bare(ActionType::Kick),
                    ActionChoice::bare(ActionType::Receive),
                ],
                Procedure::Turn => vec![ActionChoice::bare(ActionType::EndTurn)],
                _ => vec![],
            })
        }

        fn apply(&self, state: &GameState, action: &Action) -> Result<GameState, EngineError> {
            let mut next = state.clone();
            match (state.procedure, action.action_type) {
                (Procedure::CoinTossFlip, ActionType::Heads | ActionType::Tails) => {
                    next.procedure = Procedure::CoinTossKickReceive;
                }
                (Procedure::CoinTossKickReceive, ActionType::Receive | ActionType::Kick) => {
                    next.procedure = Procedure::Turn;
                }
                (Procedure::Turn, ActionType::EndTurn) => {
                    next.procedure = Procedure::EndTurn;
                }
                _ => return Err(EngineError::Rejected(format!("{action} out of place"))),
            }
            Ok(next)
        }
    }

    #[test]
    fn test_settle_forwards_chained_scripted_decisions() {
        let engine = TossChain;
        let sim = SimAdapter::new(&engine);
        let mut state = fixtures::open_field();
        state.procedure = Procedure::CoinTossFlip;

        let settled = sim.settle(state).unwrap();
        assert_eq!(settled.procedure, Procedure::Turn);
    }

    /// Engine that never leaves the coin toss; the adapter must give up
    /// loudly instead of spinning.
    struct StuckToss;

    impl RulesEngine for StuckToss {
        fn available_actions(&self, _: &GameState) -> Result<Vec<ActionChoice>, EngineError> {
            Ok(vec![ActionChoice::bare(ActionType::Tails)])
        }

        fn apply(&self, state: &GameState, _: &Action) -> Result<GameState, EngineError> {
            Ok(state.clone())
        }
    }

    #[test]
    fn test_settle_bounds_forwarding() {
        let engine = StuckToss;
        let sim = SimAdapter::new(&engine);
        let mut state = fixtures::open_field();
        state.procedure = Procedure::CoinTossFlip;

        assert!(matches!(
            sim.settle(state),
            Err(SimError::ForwardingOverflow { .. })
        ));
    }

    #[test]
    fn test_settle_auto_picks_for_the_defender() {
        /// One defender-favored block pick, then a turn.
        struct DefenderBlock;

        impl RulesEngine for DefenderBlock {
            fn available_actions(&self, state: &GameState) -> Result<Vec<ActionChoice>, EngineError> {
                Ok(match state.procedure {
                    Procedure::Block => vec![
                        ActionChoice::bare(ActionType::SelectAttackerDown),
                        ActionChoice::bare(ActionType::SelectPush),
                    ],
                    _ => vec![ActionChoice::bare(ActionType::EndTurn)],
                })
            }

            fn apply(&self, state: &GameState, action: &Action) -> Result<GameState, EngineError> {
                let mut next = state.clone();
                match action.action_type {
                    ActionType::SelectAttackerDown | ActionType::SelectPush => {
                        next.procedure = Procedure::Turn;
                        next.block_context = None;
                        next.current_team_id = Some("away".into());
                        Ok(next)
                    }
                    _ => Err(EngineError::Rejected("only dice here".into())),
                }
            }
        }

        let engine = DefenderBlock;
        let sim = SimAdapter::new(&engine);
        let mut state = fixtures::open_field();
        state.procedure = Procedure::Block;
        state.rolls = vec![ActionType::SelectAttackerDown, ActionType::SelectPush];
        // Away attacks, home currently chooses: defender favor, auto-pick.
        state.block_context = Some(BlockContext {
            attacker: PlayerId(21),
            defender: PlayerId(1),
            position: Some(Square::new(15, 8)),
            knock_out: false,
            push_chain: vec![],
        });

        let settled = sim.settle(state).unwrap();
        assert_eq!(settled.procedure, Procedure::Turn);
    }
}
