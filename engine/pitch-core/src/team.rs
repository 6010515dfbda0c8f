//! Teams and dugouts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::player::{Player, PlayerId};

pub type TeamId = String;

/// A team's on-pitch roster and match counters.
///
/// `players_by_id` is a BTreeMap so every iteration over the roster is in
/// id order; enumeration and search results stay reproducible across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub team_id: TeamId,
    pub score: u8,
    pub rerolls: u8,
    pub bribes: u8,
    pub players_by_id: BTreeMap<PlayerId, Player>,
}

impl Team {
    pub fn new(team_id: impl Into<TeamId>) -> Self {
        Team {
            team_id: team_id.into(),
            score: 0,
            rerolls: 3,
            bribes: 0,
            players_by_id: BTreeMap::new(),
        }
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players_by_id.get(&id)
    }

    /// Players currently standing on a square, in id order.
    pub fn players_on_pitch(&self) -> impl Iterator<Item = &Player> {
        self.players_by_id.values().filter(|p| p.is_on_pitch())
    }
}

/// Off-pitch zones, tracked as player ids owned by the enclosing snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dugout {
    pub team_id: TeamId,
    pub reserves: Vec<PlayerId>,
    pub kod: Vec<PlayerId>,
    pub dungeon: Vec<PlayerId>,
}

impl Dugout {
    pub fn new(team_id: impl Into<TeamId>) -> Self {
        Dugout {
            team_id: team_id.into(),
            ..Default::default()
        }
    }
}
