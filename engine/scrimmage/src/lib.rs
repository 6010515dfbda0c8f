//! A miniature rules engine.
//!
//! Implements [`RulesEngine`] over a movement-and-scoring subset of the
//! game: players take move actions square by square, carrying the ball
//! scores in the opponent's endzone, and the turn ends on demand. There are
//! no dice, so every transition is deterministic and search tests are
//! seed-stable end to end.
//!
//! This crate plays the role a toy game crate plays for a generic search
//! engine: something real to stand behind the trait. It is not a rules
//! reference.

pub mod fixtures;

use pitch_core::{
    Action, ActionChoice, ActionType, EngineError, GameState, Procedure, RulesEngine, Side,
    Square,
};

pub struct Scrimmage;

impl Scrimmage {
    pub fn new() -> Self {
        Scrimmage
    }

    fn turn_choices(&self, state: &GameState) -> Result<Vec<ActionChoice>, EngineError> {
        let side = state
            .current_side()
            .ok_or_else(|| EngineError::Internal("turn without a current team".into()))?;

        let movers: Vec<_> = state
            .team(side)
            .players_on_pitch()
            .filter(|p| !p.state.used && p.state.up)
            .map(|p| p.id)
            .collect();

        let mut choices = Vec::new();
        if !movers.is_empty() {
            choices.push(ActionChoice::with_players(ActionType::StartMove, movers));
        }
        choices.push(ActionChoice::bare(ActionType::EndTurn));
        Ok(choices)
    }

    fn move_choices(&self, state: &GameState) -> Result<Vec<ActionChoice>, EngineError> {
        let player = state
            .active_player()
            .ok_or_else(|| EngineError::Internal("move action without an active player".into()))?;
        let from = player
            .position
            .ok_or_else(|| EngineError::Internal("active player is off the pitch".into()))?;

        let mut choices = Vec::new();
        if player.state.moves < player.ma {
            let free: Vec<Square> = from
                .neighbours()
                .into_iter()
                .filter(|sq| state.player_at(*sq).is_none())
                .collect();
            if !free.is_empty() {
                choices.push(ActionChoice::with_positions(ActionType::Move, free));
            }
        }
        choices.push(ActionChoice::with_players(
            ActionType::EndPlayerTurn,
            vec![player.id],
        ));
        Ok(choices)
    }

    fn is_offered(&self, state: &GameState, action: &Action) -> Result<bool, EngineError> {
        for choice in self.available_actions(state)? {
            if choice.action_type != action.action_type {
                continue;
            }
            let offered = if !choice.players.is_empty() {
                action.player.map(|p| choice.players.contains(&p)).unwrap_or(false)
            } else if !choice.positions.is_empty() {
                action
                    .position
                    .map(|sq| choice.positions.contains(&sq))
                    .unwrap_or(false)
            } else {
                action.player.is_none() && action.position.is_none()
            };
            if offered {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn apply_start_move(&self, state: &GameState, action: &Action) -> GameState {
        let mut next = state.clone();
        next.procedure = Procedure::MoveAction;
        next.active_player_id = action.player;
        next
    }

    fn apply_move(&self, state: &GameState, action: &Action) -> Result<GameState, EngineError> {
        let mut next = state.clone();
        let side = next
            .current_side()
            .ok_or_else(|| EngineError::Internal("move without a current team".into()))?;
        let id = next
            .active_player_id
            .ok_or_else(|| EngineError::Internal("move without an active player".into()))?;
        let to = action
            .position
            .ok_or_else(|| EngineError::Rejected("move without a target square".into()))?;

        let team = match side {
            Side::Home => &mut next.home_team,
            Side::Away => &mut next.away_team,
        };
        let player = team
            .players_by_id
            .get_mut(&id)
            .ok_or_else(|| EngineError::Internal(format!("active player {id} not on roster")))?;
        let from = player
            .position
            .ok_or_else(|| EngineError::Internal("active player is off the pitch".into()))?;

        player.position = Some(to);
        player.state.moves += 1;
        player.state.squares_moved.push(to);
        let exhausted = player.state.moves >= player.ma;

        let carries_ball = next
            .balls
            .iter()
            .any(|b| b.is_carried && b.position == Some(from));
        if carries_ball {
            for ball in &mut next.balls {
                if ball.is_carried && ball.position == Some(from) {
                    ball.position = Some(to);
                }
            }
            if to.x == side.target_endzone_x() {
                match side {
                    Side::Home => next.home_team.score += 1,
                    Side::Away => next.away_team.score += 1,
                }
                next.procedure = Procedure::Touchdown;
                next.active_player_id = None;
                return Ok(next);
            }
        }

        if exhausted {
            self.finish_player_turn(&mut next, id)?;
        }
        Ok(next)
    }

    fn finish_player_turn(
        &self,
        state: &mut GameState,
        id: pitch_core::PlayerId,
    ) -> Result<(), EngineError> {
        let side = state
            .current_side()
            .ok_or_else(|| EngineError::Internal("player turn without a current team".into()))?;
        let team = match side {
            Side::Home => &mut state.home_team,
            Side::Away => &mut state.away_team,
        };
        let player = team
            .players_by_id
            .get_mut(&id)
            .ok_or_else(|| EngineError::Internal(format!("player {id} not on roster")))?;
        player.state.used = true;
        player.state.moves = 0;
        state.active_player_id = None;
        state.procedure = Procedure::Turn;
        Ok(())
    }
}

impl Default for Scrimmage {
    fn default() -> Self {
        Self::new()
    }
}

impl RulesEngine for Scrimmage {
    fn available_actions(&self, state: &GameState) -> Result<Vec<ActionChoice>, EngineError> {
        match state.procedure {
            Procedure::Turn => self.turn_choices(state),
            Procedure::MoveAction => self.move_choices(state),
            Procedure::Touchdown | Procedure::EndTurn | Procedure::Turnover => Ok(Vec::new()),
            other => Err(EngineError::Internal(format!(
                "scrimmage does not model procedure {other:?}"
            ))),
        }
    }

    fn apply(&self, state: &GameState, action: &Action) -> Result<GameState, EngineError> {
        if !self.is_offered(state, action)? {
            return Err(EngineError::Rejected(format!(
                "{action} is not offered at {:?}",
                state.procedure
            )));
        }

        match action.action_type {
            ActionType::StartMove => Ok(self.apply_start_move(state, action)),
            ActionType::Move => self.apply_move(state, action),
            ActionType::EndPlayerTurn => {
                let mut next = state.clone();
                let id = action
                    .player
                    .ok_or_else(|| EngineError::Rejected("end player turn without a player".into()))?;
                self.finish_player_turn(&mut next, id)?;
                Ok(next)
            }
            ActionType::EndTurn => {
                let mut next = state.clone();
                next.procedure = Procedure::EndTurn;
                next.active_player_id = None;
                Ok(next)
            }
            other => Err(EngineError::Rejected(format!(
                "scrimmage cannot enact {other:?}"
            ))),
        }
    }
}
