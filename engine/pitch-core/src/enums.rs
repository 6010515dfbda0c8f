//! Closed enums shared with the wire protocol.
//!
//! Variant spellings must match the host's interchange format: procedures
//! are serialized by their PascalCase names, everything else in
//! SCREAMING_SNAKE_CASE.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerRole {
    Blitzer,
    Catcher,
    Lineman,
    Thrower,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Skill {
    Block,
    Catch,
    Dodge,
    Pass,
    SureHands,
}

/// The procedure currently awaiting a decision in the host rules engine.
///
/// The host models its execution as a stack of nested procedures; the codec
/// only ever sees the top of that stack. Variants cover every procedure the
/// decision core can be consulted on, plus the side-effect procedures the
/// simulation adapter forwards through without exposing them to the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Procedure {
    Armor,
    BlitzAction,
    Block,
    BlockAction,
    Bounce,
    Casualty,
    Catch,
    CoinTossFlip,
    CoinTossKickReceive,
    Dodge,
    Ejection,
    EndGame,
    EndPlayerTurn,
    EndTurn,
    FollowUp,
    Foul,
    FoulAction,
    GFI,
    Half,
    Handoff,
    HandoffAction,
    HighKick,
    Injury,
    Intercept,
    Interception,
    Kickoff,
    KickoffTable,
    KnockDown,
    KnockOut,
    Move,
    MoveAction,
    PassAction,
    PassAttempt,
    Pickup,
    PlaceBall,
    Push,
    Reroll,
    Setup,
    StandUp,
    StartGame,
    Touchback,
    Touchdown,
    Turn,
    Turnover,
    WeatherTable,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Block,
    Continue,
    DontUseApothecary,
    DontUseBribe,
    DontUseReroll,
    EndPlayerTurn,
    EndSetup,
    EndTurn,
    FollowUp,
    Foul,
    Handoff,
    Heads,
    Kick,
    Move,
    Pass,
    PlaceBall,
    PlacePlayer,
    Push,
    Receive,
    SelectAttackerDown,
    SelectBothDown,
    SelectDefenderDown,
    SelectDefenderStumbles,
    SelectNone,
    SelectPlayer,
    SelectPush,
    SetupFormationLine,
    SetupFormationSpread,
    SetupFormationWedge,
    SetupFormationZone,
    StandUp,
    StartBlitz,
    StartBlock,
    StartFoul,
    StartGame,
    StartHandoff,
    StartMove,
    StartPass,
    Tails,
    UseBribe,
    UseReroll,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Weather {
    Blizzard,
    #[default]
    Nice,
    PouringRain,
    SwelteringHeat,
    VerySunny,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_spellings() {
        assert_eq!(
            serde_json::to_string(&ActionType::SelectAttackerDown).unwrap(),
            "\"SELECT_ATTACKER_DOWN\""
        );
        assert_eq!(
            serde_json::to_string(&Procedure::CoinTossKickReceive).unwrap(),
            "\"CoinTossKickReceive\""
        );
        assert_eq!(
            serde_json::to_string(&Weather::PouringRain).unwrap(),
            "\"POURING_RAIN\""
        );
        assert_eq!(
            serde_json::to_string(&Skill::SureHands).unwrap(),
            "\"SURE_HANDS\""
        );
    }

    #[test]
    fn test_action_type_roundtrip() {
        let parsed: ActionType = serde_json::from_str("\"END_TURN\"").unwrap();
        assert_eq!(parsed, ActionType::EndTurn);
    }
}
