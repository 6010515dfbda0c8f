//! Ready-made snapshots for tests and benches.

use pitch_core::{
    Ball, Dugout, GameState, Player, PlayerId, PlayerRole, PlayerState, Procedure, Skill, Square,
    Team, TurnState, Weather,
};

/// Id of the home ball carrier placed by the fixtures below.
pub const CARRIER_ID: PlayerId = PlayerId(1);

pub fn player(id: u32, role: PlayerRole, skills: Vec<Skill>, square: Square) -> Player {
    Player {
        id: PlayerId(id),
        role,
        skills,
        ma: 6,
        st: 3,
        ag: 3,
        av: 8,
        position: Some(square),
        state: PlayerState::default(),
    }
}

/// A turn snapshot for the home side with the given rosters on the pitch.
pub fn turn_state(home: Vec<Player>, away: Vec<Player>, balls: Vec<Ball>) -> GameState {
    let mut home_team = Team::new("home");
    for p in home {
        home_team.players_by_id.insert(p.id, p);
    }
    let mut away_team = Team::new("away");
    for p in away {
        away_team.players_by_id.insert(p.id, p);
    }
    GameState {
        half: 1,
        round: 1,
        game_over: false,
        weather: Weather::Nice,
        balls,
        home_team,
        away_team,
        home_dugout: Dugout::new("home"),
        away_dugout: Dugout::new("away"),
        procedure: Procedure::Turn,
        parent_procedure: None,
        current_team_id: Some("home".into()),
        active_player_id: None,
        rolls: vec![],
        position: None,
        block_context: None,
        turn_state: Some(TurnState::default()),
        kicking_this_drive: None,
        receiving_this_drive: None,
    }
}

/// Two home movers and one away defender, ball loose midfield.
pub fn open_field() -> GameState {
    turn_state(
        vec![
            player(1, PlayerRole::Blitzer, vec![Skill::Block], Square::new(16, 8)),
            player(2, PlayerRole::Lineman, vec![], Square::new(18, 10)),
        ],
        vec![player(21, PlayerRole::Lineman, vec![], Square::new(10, 8))],
        vec![Ball::new(Some(Square::new(13, 8)), false)],
    )
}

/// The home carrier a few squares from the endzone it scores in, clear run.
pub fn carrier_near_endzone(distance: i32) -> GameState {
    let start = Square::new(1 + distance, 8);
    turn_state(
        vec![player(CARRIER_ID.0, PlayerRole::Catcher, vec![Skill::Catch], start)],
        vec![player(21, PlayerRole::Lineman, vec![], Square::new(20, 3))],
        vec![Ball::new(Some(start), true)],
    )
}
