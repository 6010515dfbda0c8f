//! Pitch geometry.
//!
//! The board includes a one-square border of out-of-bounds squares, so the
//! playable area spans x in 1..=PITCH_WIDTH-2 and y in 1..=PITCH_HEIGHT-2.
//! The two columns just inside the border are the endzones.

pub const PITCH_WIDTH: i32 = 28;
pub const PITCH_HEIGHT: i32 = 17;

/// Leftmost playable column (the home team's target endzone).
pub const LEFT_ENDZONE_X: i32 = 1;

/// Rightmost playable column (the away team's target endzone).
pub const RIGHT_ENDZONE_X: i32 = PITCH_WIDTH - 2;
