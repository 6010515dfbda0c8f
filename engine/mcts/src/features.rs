//! Neural-network input encoding.
//!
//! The value network reads two tensors: a spatial grid of board layers and
//! a flat vector of match context. Layout is (C, W, H) flattened row-major,
//! `layer * (W * H) + x * H + y`, matching the exported model.

use pitch_core::{
    constants::{PITCH_HEIGHT, PITCH_WIDTH},
    GameState, Skill, Team, Weather,
};

pub const BOARD_WIDTH: usize = PITCH_WIDTH as usize;
pub const BOARD_HEIGHT: usize = PITCH_HEIGHT as usize;

/// Ball layer + 13 layers per team.
pub const SPATIAL_LAYERS: usize = 27;
pub const NON_SPATIAL_FEATURES: usize = 15;

const LAYER_SIZE: usize = BOARD_WIDTH * BOARD_HEIGHT;
const TEAM_LAYERS: usize = 13;

/// Flattened spatial tensor, shape [SPATIAL_LAYERS, BOARD_WIDTH, BOARD_HEIGHT].
pub fn spatial_input(state: &GameState) -> Vec<f32> {
    let mut data = vec![0.0f32; SPATIAL_LAYERS * LAYER_SIZE];

    // Layer 0: ball position.
    if let Some(pos) = state.ball_position() {
        if let Some(idx) = cell_index(pos.x, pos.y) {
            data[idx] = 1.0;
        }
    }

    // Layers 1-13 home, 14-26 away.
    encode_team(&state.home_team, &mut data, 1);
    encode_team(&state.away_team, &mut data, 1 + TEAM_LAYERS);

    data
}

fn encode_team(team: &Team, data: &mut [f32], offset: usize) {
    for player in team.players_on_pitch() {
        let Some(pos) = player.position else { continue };
        let Some(base) = cell_index(pos.x, pos.y) else { continue };

        let mut set = |layer: usize, value: f32| {
            data[(offset + layer) * LAYER_SIZE + base] = value;
        };
        set(0, 1.0);
        set(1, player.ma as f32);
        set(2, player.st as f32);
        set(3, player.ag as f32);
        set(4, player.av as f32);
        set(5, player.state.up as u8 as f32);
        set(6, player.state.used as u8 as f32);
        set(7, player.state.stunned as u8 as f32);
        set(8, player.has_skill(Skill::Block) as u8 as f32);
        set(9, player.has_skill(Skill::Dodge) as u8 as f32);
        set(10, player.has_skill(Skill::SureHands) as u8 as f32);
        set(11, player.has_skill(Skill::Catch) as u8 as f32);
        set(12, player.has_skill(Skill::Pass) as u8 as f32);
    }
}

fn cell_index(x: i32, y: i32) -> Option<usize> {
    if (0..PITCH_WIDTH).contains(&x) && (0..PITCH_HEIGHT).contains(&y) {
        Some(x as usize * BOARD_HEIGHT + y as usize)
    } else {
        None
    }
}

/// Flat match-context vector, shape [NON_SPATIAL_FEATURES].
pub fn non_spatial_input(state: &GameState) -> Vec<f32> {
    let mut features = Vec::with_capacity(NON_SPATIAL_FEATURES);

    features.push(state.half as f32);
    features.push(state.round as f32);
    features.push(state.home_team.rerolls as f32);
    features.push(state.home_team.score as f32);
    features.push(state.away_team.rerolls as f32);
    features.push(state.away_team.score as f32);

    match &state.turn_state {
        Some(ts) => {
            features.push(ts.blitz_available as u8 as f32);
            features.push(ts.pass_available as u8 as f32);
            features.push(ts.handoff_available as u8 as f32);
            features.push(ts.foul_available as u8 as f32);
        }
        None => features.extend([0.0; 4]),
    }

    for weather in [
        Weather::Nice,
        Weather::VerySunny,
        Weather::PouringRain,
        Weather::Blizzard,
        Weather::SwelteringHeat,
    ] {
        features.push((state.weather == weather) as u8 as f32);
    }

    features
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrimmage::fixtures;

    #[test]
    fn test_tensor_shapes() {
        let state = fixtures::open_field();
        assert_eq!(spatial_input(&state).len(), SPATIAL_LAYERS * LAYER_SIZE);
        assert_eq!(non_spatial_input(&state).len(), NON_SPATIAL_FEATURES);
    }

    #[test]
    fn test_ball_and_player_layers() {
        let state = fixtures::open_field();
        let data = spatial_input(&state);

        let ball = state.ball_position().unwrap();
        assert_eq!(data[cell_index(ball.x, ball.y).unwrap()], 1.0);

        // Home player #1 at (16,8): occupancy on layer 1, MA on layer 2.
        let base = cell_index(16, 8).unwrap();
        assert_eq!(data[LAYER_SIZE + base], 1.0);
        assert_eq!(data[2 * LAYER_SIZE + base], 6.0);

        // Away player #21 at (10,8) lands in the away block.
        let away_base = cell_index(10, 8).unwrap();
        assert_eq!(data[14 * LAYER_SIZE + away_base], 1.0);
    }

    #[test]
    fn test_skill_layers() {
        let state = fixtures::open_field();
        let data = spatial_input(&state);
        // Home player #1 carries Block.
        let base = cell_index(16, 8).unwrap();
        assert_eq!(data[(1 + 8) * LAYER_SIZE + base], 1.0);
        assert_eq!(data[(1 + 9) * LAYER_SIZE + base], 0.0);
    }

    #[test]
    fn test_off_pitch_players_are_skipped() {
        let mut state = fixtures::open_field();
        state
            .home_team
            .players_by_id
            .get_mut(&pitch_core::PlayerId(2))
            .unwrap()
            .position = None;
        // Must not panic, and the vacated square reads empty.
        let data = spatial_input(&state);
        let base = cell_index(18, 10).unwrap();
        assert_eq!(data[LAYER_SIZE + base], 0.0);
    }

    #[test]
    fn test_non_spatial_layout() {
        let state = fixtures::open_field();
        let features = non_spatial_input(&state);
        assert_eq!(features[0], 1.0); // half
        assert_eq!(features[1], 1.0); // round
        assert_eq!(features[2], 3.0); // home rerolls
        assert_eq!(features[6], 1.0); // blitz available
        assert_eq!(features[10], 1.0); // weather one-hot: nice
        assert_eq!(features[11..15], [0.0, 0.0, 0.0, 0.0]);
    }
}
