//! The match snapshot the search operates on.

use serde::{Deserialize, Serialize};

use crate::ball::Ball;
use crate::constants::{LEFT_ENDZONE_X, PITCH_WIDTH, RIGHT_ENDZONE_X};
use crate::enums::{ActionType, Procedure, Weather};
use crate::player::{Player, PlayerId};
use crate::position::Square;
use crate::team::{Dugout, Team, TeamId};

/// Which bench a team sits on. Home defends the right half and scores in
/// the left endzone; away is the mirror image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }

    /// Index into per-side arrays (home first).
    pub fn index(self) -> usize {
        match self {
            Side::Home => 0,
            Side::Away => 1,
        }
    }

    /// The x column this side scores in.
    pub fn target_endzone_x(self) -> i32 {
        match self {
            Side::Home => LEFT_ENDZONE_X,
            Side::Away => RIGHT_ENDZONE_X,
        }
    }

    /// True if the square lies in this side's own half.
    pub fn owns_half(self, square: Square) -> bool {
        match self {
            Side::Home => square.x >= PITCH_WIDTH / 2,
            Side::Away => square.x < PITCH_WIDTH / 2,
        }
    }
}

/// Special-action availability for the running turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnState {
    pub blitz: bool,
    pub quick_snap: bool,
    pub blitz_available: bool,
    pub pass_available: bool,
    pub foul_available: bool,
    pub handoff_available: bool,
}

impl Default for TurnState {
    fn default() -> Self {
        TurnState {
            blitz: false,
            quick_snap: false,
            blitz_available: true,
            pass_available: true,
            foul_available: true,
            handoff_available: true,
        }
    }
}

/// Context carried while a block is mid-resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockContext {
    pub attacker: PlayerId,
    pub defender: PlayerId,
    pub position: Option<Square>,
    pub knock_out: bool,
    #[serde(default)]
    pub push_chain: Vec<Square>,
}

/// One immutable-by-convention snapshot of the match.
///
/// Every transition produces a new owned snapshot; search branches never
/// share mutable state. Exactly one procedure is pending at a time, and
/// `active_player_id` is set only while a player-specific sub-decision is
/// open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub half: u8,
    pub round: u8,
    pub game_over: bool,
    pub weather: Weather,
    #[serde(default)]
    pub balls: Vec<Ball>,
    pub home_team: Team,
    pub away_team: Team,
    pub home_dugout: Dugout,
    pub away_dugout: Dugout,
    pub procedure: Procedure,
    pub parent_procedure: Option<Procedure>,
    pub current_team_id: Option<TeamId>,
    pub active_player_id: Option<PlayerId>,
    /// Action types the engine currently offers (pre-rolled dice included).
    #[serde(default)]
    pub rolls: Vec<ActionType>,
    /// Context square for the pending procedure (pass origin, push target).
    pub position: Option<Square>,
    pub block_context: Option<BlockContext>,
    pub turn_state: Option<TurnState>,
    #[serde(default)]
    pub kicking_this_drive: Option<TeamId>,
    #[serde(default)]
    pub receiving_this_drive: Option<TeamId>,
}

impl GameState {
    pub fn team(&self, side: Side) -> &Team {
        match side {
            Side::Home => &self.home_team,
            Side::Away => &self.away_team,
        }
    }

    pub fn dugout(&self, side: Side) -> &Dugout {
        match side {
            Side::Home => &self.home_dugout,
            Side::Away => &self.away_dugout,
        }
    }

    pub fn side_of_team(&self, team_id: &str) -> Option<Side> {
        if self.home_team.team_id == team_id {
            Some(Side::Home)
        } else if self.away_team.team_id == team_id {
            Some(Side::Away)
        } else {
            None
        }
    }

    /// The side whose decision is pending, if any.
    pub fn current_side(&self) -> Option<Side> {
        self.current_team_id
            .as_deref()
            .and_then(|id| self.side_of_team(id))
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.home_team
            .player(id)
            .or_else(|| self.away_team.player(id))
    }

    pub fn side_of_player(&self, id: PlayerId) -> Option<Side> {
        if self.home_team.player(id).is_some() {
            Some(Side::Home)
        } else if self.away_team.player(id).is_some() {
            Some(Side::Away)
        } else {
            None
        }
    }

    pub fn player_at(&self, square: Square) -> Option<&Player> {
        self.home_team
            .players_on_pitch()
            .chain(self.away_team.players_on_pitch())
            .find(|p| p.position == Some(square))
    }

    pub fn active_player(&self) -> Option<&Player> {
        self.active_player_id.and_then(|id| self.player(id))
    }

    pub fn ball_position(&self) -> Option<Square> {
        self.balls.first().and_then(|b| b.position)
    }

    /// The player standing on a carried ball's square.
    pub fn ball_carrier(&self) -> Option<&Player> {
        self.balls
            .iter()
            .find(|b| b.is_carried)
            .and_then(|b| b.position)
            .and_then(|sq| self.player_at(sq))
    }

    /// Number of opposing tackle zones covering a square for `side`.
    pub fn tackle_zones_at(&self, side: Side, square: Square) -> usize {
        self.team(side.opponent())
            .players_on_pitch()
            .filter(|p| p.is_active())
            .filter(|p| p.position.map(|pos| pos.is_adjacent(&square)).unwrap_or(false))
            .count()
    }

    /// Opposing players adjacent to a square, in id order.
    pub fn adjacent_opponents(&self, side: Side, square: Square) -> Vec<&Player> {
        self.team(side.opponent())
            .players_on_pitch()
            .filter(|p| p.position.map(|pos| pos.is_adjacent(&square)).unwrap_or(false))
            .collect()
    }

    pub fn receiving_side(&self) -> Option<Side> {
        self.receiving_this_drive
            .as_deref()
            .and_then(|id| self.side_of_team(id))
    }

    /// Scores as a per-side pair (home first).
    pub fn scores(&self) -> [u8; 2] {
        [self.home_team.score, self.away_team.score]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::PlayerRole;
    use crate::player::PlayerState;

    fn player(id: u32, square: Square) -> Player {
        Player {
            id: PlayerId(id),
            role: PlayerRole::Lineman,
            skills: vec![],
            ma: 6,
            st: 3,
            ag: 3,
            av: 8,
            position: Some(square),
            state: PlayerState::default(),
        }
    }

    fn two_team_state() -> GameState {
        let mut home = Team::new("home");
        home.players_by_id
            .insert(PlayerId(1), player(1, Square::new(15, 8)));
        let mut away = Team::new("away");
        away.players_by_id
            .insert(PlayerId(21), player(21, Square::new(14, 8)));
        away.players_by_id
            .insert(PlayerId(22), player(22, Square::new(10, 3)));
        GameState {
            half: 1,
            round: 3,
            game_over: false,
            weather: Weather::Nice,
            balls: vec![Ball::new(Some(Square::new(15, 8)), true)],
            home_team: home,
            away_team: away,
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

    #[test]
    fn test_side_lookup() {
        let state = two_team_state();
        assert_eq!(state.side_of_team("home"), Some(Side::Home));
        assert_eq!(state.side_of_team("away"), Some(Side::Away));
        assert_eq!(state.side_of_team("nobody"), None);
        assert_eq!(state.current_side(), Some(Side::Home));
    }

    #[test]
    fn test_player_lookup_spans_both_teams() {
        let state = two_team_state();
        assert!(state.player(PlayerId(1)).is_some());
        assert!(state.player(PlayerId(22)).is_some());
        assert!(state.player(PlayerId(99)).is_none());
        assert_eq!(state.side_of_player(PlayerId(21)), Some(Side::Away));
    }

    #[test]
    fn test_ball_carrier() {
        let state = two_team_state();
        let carrier = state.ball_carrier().expect("carried ball has a carrier");
        assert_eq!(carrier.id, PlayerId(1));
    }

    #[test]
    fn test_tackle_zones() {
        let state = two_team_state();
        // Home player at (15,8); away #21 stands adjacent at (14,8).
        assert_eq!(state.tackle_zones_at(Side::Home, Square::new(15, 8)), 1);
        assert_eq!(state.tackle_zones_at(Side::Away, Square::new(10, 3)), 0);
    }

    #[test]
    fn test_endzone_orientation() {
        assert_eq!(Side::Home.target_endzone_x(), 1);
        assert_eq!(Side::Away.target_endzone_x(), 26);
        assert!(Side::Home.owns_half(Square::new(20, 8)));
        assert!(Side::Away.owns_half(Square::new(5, 8)));
    }
}
