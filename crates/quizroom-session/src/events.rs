//! Broadcast event vocabulary.
//!
//! One channel per room code; subscribers see these in the order the
//! corresponding state mutations were committed. The JSON tag uses the
//! client's event names (`roomUpdated`, `gameStarted`, ...).

use serde::{Deserialize, Serialize};

use quizroom_room::{Leaderboard, Room, Summary};

/// An event published to a room's channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum RoomEvent {
    /// Roster or status change while the room is OPEN, and the
    /// room-deleted notice (which carries no room).
    RoomUpdated {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        room: Option<Room>,
        message: String,
    },

    /// The host started the game; the room now carries its questions.
    GameStarted { room: Room, message: String },

    /// An accepted submission from a participant who is still playing.
    ProgressUpdated { leaderboard: Leaderboard, message: String },

    /// A participant finished every question (or finished explicitly).
    PlayerFinished {
        leaderboard: Leaderboard,
        summary: Summary,
        message: String,
    },

    /// Terminal event: every participant finished, the room is CLOSED.
    /// Fires exactly once per room.
    GameFinished { room: Room, message: String },
}

impl RoomEvent {
    /// The wire name of this event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RoomUpdated { .. } => "roomUpdated",
            Self::GameStarted { .. } => "gameStarted",
            Self::ProgressUpdated { .. } => "progressUpdated",
            Self::PlayerFinished { .. } => "playerFinished",
            Self::GameFinished { .. } => "gameFinished",
        }
    }
}
