//! ONNX value-network evaluator.
//!
//! Loads a model exported by the offline training pipeline and scores
//! states during search. The model takes the two tensors produced by
//! [`crate::features`] and returns a single `(home, away)` value pair:
//!
//! - Input "spatial": shape (1, 27, 28, 17) float32
//! - Input "non_spatial": shape (1, 15) float32
//! - Output "value": shape (1, 2) float32 in [-1, 1]

use std::path::Path;
use std::sync::Mutex;

use ort::{session::Session, value::Value};
use rand_chacha::ChaCha20Rng;
use tracing::info;

use crate::evaluator::{EvaluatorError, LeafEvaluator, Valuation};
use crate::features::{
    non_spatial_input, spatial_input, BOARD_HEIGHT, BOARD_WIDTH, NON_SPATIAL_FEATURES,
    SPATIAL_LAYERS,
};
use crate::sim::SimAdapter;
use pitch_core::GameState;

/// Value-network evaluator backed by ONNX Runtime.
///
/// `Session::run` needs `&mut self` while [`LeafEvaluator`] takes `&self`
/// for shared use, so the session sits behind a Mutex. Inference is bounded
/// by model size, never by the game, so it cannot blow the time budget the
/// way an unbounded external call could.
pub struct OnnxEvaluator {
    session: Mutex<Session>,
}

impl std::fmt::Debug for OnnxEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxEvaluator").finish_non_exhaustive()
    }
}

impl OnnxEvaluator {
    /// Load a model from disk.
    pub fn load<P: AsRef<Path>>(model_path: P) -> Result<Self, EvaluatorError> {
        let session = Session::builder()
            .map_err(|e| EvaluatorError::Model(format!("failed to create session builder: {e}")))?
            .with_intra_threads(1)
            .map_err(|e| EvaluatorError::Model(format!("failed to set intra threads: {e}")))?
            .commit_from_file(&model_path)
            .map_err(|e| EvaluatorError::Model(format!("failed to load model: {e}")))?;

        info!(path = %model_path.as_ref().display(), "value network loaded");
        Ok(OnnxEvaluator {
            session: Mutex::new(session),
        })
    }

    /// Load a model already in memory.
    pub fn load_from_memory(model_data: &[u8]) -> Result<Self, EvaluatorError> {
        let session = Session::builder()
            .map_err(|e| EvaluatorError::Model(format!("failed to create session builder: {e}")))?
            .with_intra_threads(1)
            .map_err(|e| EvaluatorError::Model(format!("failed to set intra threads: {e}")))?
            .commit_from_memory(model_data)
            .map_err(|e| EvaluatorError::Model(format!("failed to load model from memory: {e}")))?;

        Ok(OnnxEvaluator {
            session: Mutex::new(session),
        })
    }

    fn infer(&self, state: &GameState) -> Result<Valuation, EvaluatorError> {
        let spatial = Value::from_array((
            [1, SPATIAL_LAYERS, BOARD_WIDTH, BOARD_HEIGHT],
            spatial_input(state),
        ))
        .map_err(|e| EvaluatorError::Model(format!("bad spatial tensor: {e}")))?;
        let non_spatial =
            Value::from_array(([1, NON_SPATIAL_FEATURES], non_spatial_input(state)))
                .map_err(|e| EvaluatorError::Model(format!("bad non-spatial tensor: {e}")))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| EvaluatorError::Model(format!("session lock poisoned: {e}")))?;

        let inputs = ort::inputs![
            "spatial" => spatial,
            "non_spatial" => non_spatial,
        ]
        .map_err(|e| EvaluatorError::Model(format!("failed to bind inputs: {e}")))?;
        let outputs = session
            .run(inputs)
            .map_err(|e| EvaluatorError::Model(format!("inference failed: {e}")))?;

        let (_, values) = outputs["value"]
            .try_extract_raw_tensor::<f32>()
            .map_err(|e| EvaluatorError::Model(format!("bad value output: {e}")))?;
        if values.len() < 2 {
            return Err(EvaluatorError::Model(format!(
                "value output has {} elements, expected 2",
                values.len()
            )));
        }

        Ok(Valuation {
            home: values[0],
            away: values[1],
        }
        .clamped())
    }
}

impl LeafEvaluator for OnnxEvaluator {
    fn evaluate(
        &self,
        _sim: &SimAdapter<'_>,
        state: &GameState,
        _rng: &mut ChaCha20Rng,
    ) -> Result<Valuation, EvaluatorError> {
        self.infer(state)
    }
}
