//! The ball (or balls; some variants play with more than one).

use serde::{Deserialize, Serialize};

use crate::position::Square;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    /// None while the ball is off the pitch (e.g. waiting for a kick).
    pub position: Option<Square>,
    pub is_carried: bool,
}

impl Ball {
    pub fn new(position: Option<Square>, is_carried: bool) -> Self {
        Ball {
            position,
            is_carried,
        }
    }
}
