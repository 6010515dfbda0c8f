//! Leaf evaluation.
//!
//! The search estimates a state's worth either by a fast positional
//! heuristic, by a random playout to a drive boundary, or by a pretrained
//! value network. All three sit behind [`LeafEvaluator`]; which one runs is
//! purely configuration.

use pitch_core::{
    constants::{PITCH_HEIGHT, PITCH_WIDTH},
    GameState, Player, Procedure, Side, Square,
};
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;

use crate::sim::{DecisionKind, SimAdapter, SimError};

/// A state's estimated value per side, each in [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Valuation {
    pub home: f32,
    pub away: f32,
}

impl Valuation {
    pub const ZERO: Valuation = Valuation {
        home: 0.0,
        away: 0.0,
    };

    /// ±1 for the side that just scored.
    pub fn scored_by(side: Side) -> Valuation {
        match side {
            Side::Home => Valuation { home: 1.0, away: -1.0 },
            Side::Away => Valuation { home: -1.0, away: 1.0 },
        }
    }

    pub fn for_side(&self, side: Side) -> f32 {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }

    pub fn clamped(self) -> Valuation {
        Valuation {
            home: self.home.clamp(-1.0, 1.0),
            away: self.away.clamp(-1.0, 1.0),
        }
    }
}

#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("evaluation failed: {0}")]
    Evaluation(String),

    #[error("model error: {0}")]
    Model(String),

    #[error(transparent)]
    Sim(#[from] SimError),
}

/// Estimates state value at search-tree leaves.
///
/// The adapter and RNG are part of the signature so playout-based
/// evaluators can simulate; stateless evaluators ignore them.
pub trait LeafEvaluator: Send + Sync {
    fn evaluate(
        &self,
        sim: &SimAdapter<'_>,
        state: &GameState,
        rng: &mut ChaCha20Rng,
    ) -> Result<Valuation, EvaluatorError>;
}

impl<E: LeafEvaluator + ?Sized> LeafEvaluator for Box<E> {
    fn evaluate(
        &self,
        sim: &SimAdapter<'_>,
        state: &GameState,
        rng: &mut ChaCha20Rng,
    ) -> Result<Valuation, EvaluatorError> {
        (**self).evaluate(sim, state, rng)
    }
}

/// Neutral valuation everywhere. Reduces the search to uniform sampling;
/// useful for exercising the machinery in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformEvaluator;

impl UniformEvaluator {
    pub fn new() -> Self {
        UniformEvaluator
    }
}

impl LeafEvaluator for UniformEvaluator {
    fn evaluate(
        &self,
        _sim: &SimAdapter<'_>,
        _state: &GameState,
        _rng: &mut ChaCha20Rng,
    ) -> Result<Valuation, EvaluatorError> {
        Ok(Valuation::ZERO)
    }
}

/// Positional heuristic.
///
/// Per side: holding the ball is scored by the carrier's distance to the
/// target endzone with a small bonus for nearby support; facing an enemy
/// carrier is scored by how deep they are and how well covered; a loose
/// ball is scored by proximity to it. A touchdown state is simply ±1.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicEvaluator;

const MAX_FIELD_DISTANCE: f32 = (PITCH_WIDTH + PITCH_HEIGHT) as f32;

impl HeuristicEvaluator {
    pub fn new() -> Self {
        HeuristicEvaluator
    }

    /// Pure positional valuation, usable without an adapter.
    pub fn valuation(&self, state: &GameState) -> Valuation {
        if state.procedure == Procedure::Touchdown {
            if let Some(side) = state.current_side() {
                return Valuation::scored_by(side);
            }
        }

        Valuation {
            home: self.side_score(state, Side::Home),
            away: self.side_score(state, Side::Away),
        }
        .clamped()
    }

    fn side_score(&self, state: &GameState, side: Side) -> f32 {
        let players: Vec<&Player> = state
            .team(side)
            .players_on_pitch()
            .filter(|p| p.position.is_some())
            .collect();
        if players.is_empty() {
            // Nobody on the pitch cannot win the drive.
            return -1.0;
        }

        let Some(ball_position) = state.ball_position() else {
            return 0.0;
        };

        match state.ball_carrier() {
            Some(carrier) => {
                let carrier_pos = carrier.position.unwrap_or(ball_position);
                if state.side_of_player(carrier.id) == Some(side) {
                    self.offensive_score(&players, carrier, carrier_pos, side)
                } else {
                    self.defensive_score(&players, carrier_pos, side)
                }
            }
            None => self.loose_ball_score(&players, ball_position),
        }
    }

    fn offensive_score(
        &self,
        players: &[&Player],
        carrier: &Player,
        carrier_pos: Square,
        side: Side,
    ) -> f32 {
        let endzone_distance = (carrier_pos.x - side.target_endzone_x()).abs() as f32;
        let carrier_score = 0.985 - 0.03 * endzone_distance;

        let mut support = 0.0;
        for player in players {
            if player.id == carrier.id {
                continue;
            }
            let Some(pos) = player.position else { continue };
            let d = pos.distance(&carrier_pos) as f32;
            support += if d <= 5.0 {
                0.1 * (1.0 - d / 5.0)
            } else {
                0.05 * (1.0 - d / MAX_FIELD_DISTANCE)
            };
        }
        let avg_support = if players.len() > 1 {
            (support / (players.len() - 1) as f32) * 0.01
        } else {
            0.0
        };

        carrier_score + avg_support
    }

    fn defensive_score(&self, players: &[&Player], carrier_pos: Square, side: Side) -> f32 {
        let own_endzone_x = side.opponent().target_endzone_x();
        let enemy_distance = (carrier_pos.x - own_endzone_x).abs() as f32;
        let base = -(0.99 - 0.03 * enemy_distance);

        let mut coverage = 0.0;
        for player in players {
            let Some(pos) = player.position else { continue };
            let d = pos.distance(&carrier_pos) as f32;
            coverage += 0.4 * (1.0 - d / MAX_FIELD_DISTANCE);
        }
        base + (coverage / players.len() as f32) * 0.1
    }

    fn loose_ball_score(&self, players: &[&Player], ball_position: Square) -> f32 {
        let mut score = 0.0;
        for player in players {
            let Some(pos) = player.position else { continue };
            let d = pos.distance(&ball_position) as f32;
            score += 0.3 * (1.0 - d / MAX_FIELD_DISTANCE);
        }
        score / players.len() as f32
    }
}

impl LeafEvaluator for HeuristicEvaluator {
    fn evaluate(
        &self,
        _sim: &SimAdapter<'_>,
        state: &GameState,
        _rng: &mut ChaCha20Rng,
    ) -> Result<Valuation, EvaluatorError> {
        Ok(self.valuation(state))
    }
}

/// Random playout to a drive-ending condition.
///
/// Plays uniformly random legal actions through the adapter (which keeps
/// every scripted decision resolved) until a score change, a terminal
/// boundary, or the depth cap. A score change is worth ±1 to the scoring
/// side; otherwise the positional heuristic values the reached state.
#[derive(Debug, Clone)]
pub struct RolloutEvaluator {
    pub max_steps: u32,
    fallback: HeuristicEvaluator,
}

impl Default for RolloutEvaluator {
    fn default() -> Self {
        RolloutEvaluator {
            max_steps: 30,
            fallback: HeuristicEvaluator::new(),
        }
    }
}

impl RolloutEvaluator {
    pub fn new(max_steps: u32) -> Self {
        RolloutEvaluator {
            max_steps,
            ..Default::default()
        }
    }
}

impl LeafEvaluator for RolloutEvaluator {
    fn evaluate(
        &self,
        sim: &SimAdapter<'_>,
        state: &GameState,
        rng: &mut ChaCha20Rng,
    ) -> Result<Valuation, EvaluatorError> {
        let initial_scores = state.scores();
        let mut current = state.clone();

        for _ in 0..self.max_steps {
            if sim.classify(&current) == DecisionKind::Terminal {
                break;
            }
            let actions = sim.legal_actions(&current)?;
            if actions.is_empty() {
                break;
            }
            let pick = &actions[rng.gen_range(0..actions.len())];
            current = sim.step(&current, pick)?;

            let scores = current.scores();
            if scores != initial_scores {
                let side = if scores[0] > initial_scores[0] {
                    Side::Home
                } else {
                    Side::Away
                };
                return Ok(Valuation::scored_by(side));
            }
        }

        Ok(self.fallback.valuation(&current))
    }
}
