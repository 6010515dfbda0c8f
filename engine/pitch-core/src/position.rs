//! Board coordinates.

use serde::{Deserialize, Serialize};

use crate::constants::{PITCH_HEIGHT, PITCH_WIDTH};

/// A square on the pitch. Coordinates include the out-of-bounds border.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Square {
    pub x: i32,
    pub y: i32,
}

impl Square {
    pub fn new(x: i32, y: i32) -> Self {
        Square { x, y }
    }

    /// Chebyshev distance: diagonal steps count as one move.
    pub fn distance(&self, other: &Square) -> u32 {
        (self.x - other.x).abs().max((self.y - other.y).abs()) as u32
    }

    pub fn is_adjacent(&self, other: &Square) -> bool {
        self.distance(other) == 1
    }

    pub fn is_out_of_bounds(&self) -> bool {
        self.x <= 0 || self.x >= PITCH_WIDTH - 1 || self.y <= 0 || self.y >= PITCH_HEIGHT - 1
    }

    /// All in-bounds neighbours in the eight directions.
    pub fn neighbours(&self) -> Vec<Square> {
        let mut out = Vec::with_capacity(8);
        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let sq = Square::new(self.x + dx, self.y + dy);
                if !sq.is_out_of_bounds() {
                    out.push(sq);
                }
            }
        }
        out
    }
}
