//! Players and their per-turn state.

use serde::{Deserialize, Serialize};

use crate::enums::{PlayerRole, Skill};
use crate::position::Square;

/// Wire player ids are small integers; a newtype keeps them from mixing
/// with other numeric ids.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub up: bool,
    pub used: bool,
    pub moves: u8,
    pub stunned: bool,
    pub knocked_out: bool,
    #[serde(default)]
    pub squares_moved: Vec<Square>,
    pub has_blocked: bool,
}

impl Default for PlayerState {
    fn default() -> Self {
        PlayerState {
            up: true,
            used: false,
            moves: 0,
            stunned: false,
            knocked_out: false,
            squares_moved: Vec::new(),
            has_blocked: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub role: PlayerRole,
    pub skills: Vec<Skill>,
    pub ma: u8,
    pub st: u8,
    pub ag: u8,
    pub av: u8,
    /// None while off the pitch (reserves, knocked out, removed).
    pub position: Option<Square>,
    pub state: PlayerState,
}

impl Player {
    pub fn has_skill(&self, skill: Skill) -> bool {
        self.skills.contains(&skill)
    }

    pub fn is_on_pitch(&self) -> bool {
        self.position.is_some()
    }

    /// Standing, not stunned: the player projects a tackle zone.
    pub fn is_active(&self) -> bool {
        self.state.up && !self.state.stunned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(skills: Vec<Skill>) -> Player {
        Player {
            id: PlayerId(1),
            role: PlayerRole::Lineman,
            skills,
            ma: 6,
            st: 3,
            ag: 3,
            av: 8,
            position: Some(Square::new(10, 8)),
            state: PlayerState::default(),
        }
    }

    #[test]
    fn test_has_skill() {
        let p = player(vec![Skill::Block, Skill::SureHands]);
        assert!(p.has_skill(Skill::Block));
        assert!(!p.has_skill(Skill::Dodge));
    }

    #[test]
    fn test_activity_flags() {
        let mut p = player(vec![]);
        assert!(p.is_active());
        p.state.stunned = true;
        assert!(!p.is_active());
        p.state.stunned = false;
        p.state.up = false;
        assert!(!p.is_active());
    }
}
