//! Error taxonomy for room operations.
//!
//! Every variant carries enough context for a useful message, and
//! [`RoomError::kind`] maps each one onto the stable machine-readable
//! classification the gateway exposes to clients.

use quizroom_protocol::{
    ParticipantStatus, QuestionId, RoomCode, RoomStatus, UserId,
};

/// Stable classification of a [`RoomError`], independent of the exact
/// variant wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced room, participant, or question does not exist.
    NotFound,
    /// A uniqueness rule was violated (duplicate join, code space
    /// exhausted).
    Conflict,
    /// The action is not valid in the current room/participant state.
    InvalidState,
    /// A configured capacity bound was hit.
    CapacityExceeded,
    /// Persistence or broadcast failure unrelated to caller input.
    Internal,
}

/// Errors raised by room session operations.
///
/// All validation failures are detected before any mutation; a caller
/// seeing one of these can assume persisted state is untouched (the
/// `Internal` kinds excepted, which surface I/O failures after the
/// store's own guarantees apply).
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// No active room matches the given code.
    #[error("room {0} not found")]
    RoomNotFound(RoomCode),

    /// The user already occupies a participant slot in this room.
    #[error("player {0} has already been in this room")]
    AlreadyJoined(UserId),

    /// The user is not a participant of this room.
    #[error("player {0} has not been in this room")]
    NotInRoom(UserId),

    /// Late joins are rejected once the game is running.
    #[error("room {0} has already been in progress")]
    RoomInProgress(RoomCode),

    /// The participant cap was reached.
    #[error("room {0} has been full")]
    RoomFull(RoomCode),

    /// Only the host (participant index 0) may start the game.
    #[error("player {0} is not the host of this room")]
    NotHost(UserId),

    /// Starting requires a minimum roster size.
    #[error("at least {0} players are needed to start")]
    NotEnoughPlayers(usize),

    /// Every participant must be READY before the game starts.
    #[error("all players have not been ready to start")]
    NotAllReady,

    /// Requested question total is outside (0, max]. The total is the
    /// unwrapped `u64` sum of the per-tier counts.
    #[error(
        "total number of questions should be between 1 and {max}, got {requested}"
    )]
    QuestionCountOutOfRange { requested: u64, max: u32 },

    /// The submitted question id matches no slot in this room.
    #[error("invalid question id {0}")]
    UnknownQuestion(QuestionId),

    /// Resubmissions must strictly improve on the recorded score.
    #[error(
        "submitted score {submitted} does not improve on recorded {recorded}"
    )]
    ScoreNotImproved { submitted: u32, recorded: u32 },

    /// Scores are bounded to 0–100 by the scoring contract.
    #[error("point {0} is out of range (0-100)")]
    PointOutOfRange(u32),

    /// A zero elapsed time would read back as "unanswered".
    #[error("elapsed time must be positive")]
    ZeroTime,

    /// The requested participant status change is not in the
    /// transition table.
    #[error(
        "player {user} cannot move from {from} to {to} while the room is {room}"
    )]
    IllegalTransition {
        user: UserId,
        from: ParticipantStatus,
        to: ParticipantStatus,
        room: RoomStatus,
    },

    /// Ran out of retries while drawing a free room code.
    #[error("no free room code after {0} attempts")]
    CodeSpaceExhausted(usize),

    /// The room's command channel is closed.
    #[error("room {0} is unavailable")]
    Unavailable(RoomCode),

    /// Backing-store failure.
    #[error("storage failure: {0}")]
    Storage(String),

    /// Pub/sub publish failure.
    #[error("broadcast failure: {0}")]
    Broadcast(String),
}

impl RoomError {
    /// The stable machine-readable kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RoomNotFound(_)
            | Self::NotInRoom(_)
            | Self::UnknownQuestion(_) => ErrorKind::NotFound,

            Self::AlreadyJoined(_) | Self::CodeSpaceExhausted(_) => {
                ErrorKind::Conflict
            }

            Self::RoomInProgress(_)
            | Self::NotHost(_)
            | Self::NotEnoughPlayers(_)
            | Self::NotAllReady
            | Self::ScoreNotImproved { .. }
            | Self::PointOutOfRange(_)
            | Self::ZeroTime
            | Self::IllegalTransition { .. } => ErrorKind::InvalidState,

            Self::RoomFull(_) | Self::QuestionCountOutOfRange { .. } => {
                ErrorKind::CapacityExceeded
            }

            Self::Unavailable(_)
            | Self::Storage(_)
            | Self::Broadcast(_) => ErrorKind::Internal,
        }
    }
}
