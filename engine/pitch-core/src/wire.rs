//! Wire codec.
//!
//! Converts between the host's interchange representation of states and
//! actions and the typed model in this crate. The mapping is pure and
//! bidirectional; decoding validates the invariants the search relies on
//! (a pending procedure, both teams present, globally unique player ids)
//! instead of trusting the peer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::action::Action;
use crate::ball::Ball;
use crate::enums::{ActionType, PlayerRole, Procedure, Skill, Weather};
use crate::player::{Player, PlayerId, PlayerState};
use crate::position::Square;
use crate::state::{BlockContext, GameState, TurnState};
use crate::team::{Dugout, Team, TeamId};

/// Errors raised while crossing the wire boundary.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed wire payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("wire state carries no pending procedure")]
    MissingProcedure,

    #[error("player id {0} appears on both teams")]
    DuplicatePlayerId(PlayerId),

    #[error("unknown player id {0}")]
    UnknownPlayerId(PlayerId),

    #[error("team id {0:?} matches neither side")]
    UnknownTeam(TeamId),
}

/// Interchange form of a team: the roster is keyed by integer player id
/// and the players themselves carry no id field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireTeam {
    pub team_id: TeamId,
    pub score: u8,
    pub rerolls: u8,
    pub bribes: u8,
    pub players_by_id: BTreeMap<u32, WirePlayer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WirePlayer {
    pub role: PlayerRole,
    #[serde(default)]
    pub skills: Vec<Skill>,
    pub ma: u8,
    pub st: u8,
    pub ag: u8,
    pub av: u8,
    pub position: Option<Square>,
    pub state: PlayerState,
}

/// Interchange form of a full snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireState {
    pub half: u8,
    pub round: u8,
    pub game_over: bool,
    pub weather: Weather,
    #[serde(default)]
    pub balls: Vec<Ball>,
    pub home_team: WireTeam,
    pub away_team: WireTeam,
    pub home_dugout: Dugout,
    pub away_dugout: Dugout,
    pub procedure: Option<Procedure>,
    #[serde(default)]
    pub parent_procedure: Option<Procedure>,
    pub current_team_id: Option<TeamId>,
    pub active_player_id: Option<PlayerId>,
    #[serde(default)]
    pub rolls: Vec<ActionType>,
    #[serde(default)]
    pub position: Option<Square>,
    #[serde(default)]
    pub block_context: Option<BlockContext>,
    #[serde(default)]
    pub turn_state: Option<TurnState>,
    #[serde(default)]
    pub kicking_this_drive: Option<TeamId>,
    #[serde(default)]
    pub receiving_this_drive: Option<TeamId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireAction {
    pub action_type: ActionType,
    pub position: Option<Square>,
    pub player: Option<PlayerId>,
}

fn decode_team(wire: &WireTeam) -> Team {
    let players_by_id = wire
        .players_by_id
        .iter()
        .map(|(&id, wp)| {
            let id = PlayerId(id);
            (
                id,
                Player {
                    id,
                    role: wp.role,
                    skills: wp.skills.clone(),
                    ma: wp.ma,
                    st: wp.st,
                    ag: wp.ag,
                    av: wp.av,
                    position: wp.position,
                    state: wp.state.clone(),
                },
            )
        })
        .collect();
    Team {
        team_id: wire.team_id.clone(),
        score: wire.score,
        rerolls: wire.rerolls,
        bribes: wire.bribes,
        players_by_id,
    }
}

fn encode_team(team: &Team) -> WireTeam {
    let players_by_id = team
        .players_by_id
        .iter()
        .map(|(id, p)| {
            (
                id.0,
                WirePlayer {
                    role: p.role,
                    skills: p.skills.clone(),
                    ma: p.ma,
                    st: p.st,
                    ag: p.ag,
                    av: p.av,
                    position: p.position,
                    state: p.state.clone(),
                },
            )
        })
        .collect();
    WireTeam {
        team_id: team.team_id.clone(),
        score: team.score,
        rerolls: team.rerolls,
        bribes: team.bribes,
        players_by_id,
    }
}

/// Decode a wire snapshot into the typed model, validating invariants.
pub fn decode(wire: &WireState) -> Result<GameState, CodecError> {
    let procedure = wire.procedure.ok_or(CodecError::MissingProcedure)?;

    let home_team = decode_team(&wire.home_team);
    let away_team = decode_team(&wire.away_team);

    for id in home_team.players_by_id.keys() {
        if away_team.players_by_id.contains_key(id) {
            return Err(CodecError::DuplicatePlayerId(*id));
        }
    }

    let state = GameState {
        half: wire.half,
        round: wire.round,
        game_over: wire.game_over,
        weather: wire.weather,
        balls: wire.balls.clone(),
        home_team,
        away_team,
        home_dugout: wire.home_dugout.clone(),
        away_dugout: wire.away_dugout.clone(),
        procedure,
        parent_procedure: wire.parent_procedure,
        current_team_id: wire.current_team_id.clone(),
        active_player_id: wire.active_player_id,
        rolls: wire.rolls.clone(),
        position: wire.position,
        block_context: wire.block_context.clone(),
        turn_state: wire.turn_state.clone(),
        kicking_this_drive: wire.kicking_this_drive.clone(),
        receiving_this_drive: wire.receiving_this_drive.clone(),
    };

    if let Some(team_id) = &state.current_team_id {
        if state.side_of_team(team_id).is_none() {
            return Err(CodecError::UnknownTeam(team_id.clone()));
        }
    }
    if let Some(id) = state.active_player_id {
        if state.player(id).is_none() {
            return Err(CodecError::UnknownPlayerId(id));
        }
    }

    Ok(state)
}

/// Encode a typed snapshot back to the interchange form. Total.
pub fn encode(state: &GameState) -> WireState {
    WireState {
        half: state.half,
        round: state.round,
        game_over: state.game_over,
        weather: state.weather,
        balls: state.balls.clone(),
        home_team: encode_team(&state.home_team),
        away_team: encode_team(&state.away_team),
        home_dugout: state.home_dugout.clone(),
        away_dugout: state.away_dugout.clone(),
        procedure: Some(state.procedure),
        parent_procedure: state.parent_procedure,
        current_team_id: state.current_team_id.clone(),
        active_player_id: state.active_player_id,
        rolls: state.rolls.clone(),
        position: state.position,
        block_context: state.block_context.clone(),
        turn_state: state.turn_state.clone(),
        kicking_this_drive: state.kicking_this_drive.clone(),
        receiving_this_drive: state.receiving_this_drive.clone(),
    }
}

/// Decode a wire action, resolving its player reference against the
/// snapshot's roster. A reference to an absent player is an error, never a
/// guess.
pub fn decode_action(wire: &WireAction, state: &GameState) -> Result<Action, CodecError> {
    if let Some(id) = wire.player {
        if state.player(id).is_none() {
            return Err(CodecError::UnknownPlayerId(id));
        }
    }
    Ok(Action {
        action_type: wire.action_type,
        player: wire.player,
        position: wire.position,
    })
}

pub fn encode_action(action: &Action) -> WireAction {
    WireAction {
        action_type: action.action_type,
        position: action.position,
        player: action.player,
    }
}

/// Parse a JSON snapshot straight into the typed model.
pub fn state_from_json(json: &str) -> Result<GameState, CodecError> {
    decode(&serde_json::from_str(json)?)
}

pub fn state_to_json(state: &GameState) -> Result<String, CodecError> {
    Ok(serde_json::to_string(&encode(state))?)
}

pub fn action_to_json(action: &Action) -> Result<String, CodecError> {
    Ok(serde_json::to_string(&encode_action(action))?)
}
