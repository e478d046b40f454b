//! Status enums, user profile snapshots, and request shapes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::UserId;

// ---------------------------------------------------------------------------
// RoomStatus
// ---------------------------------------------------------------------------

/// The lifecycle state of a room.
///
/// ```text
/// OPEN --(host starts, all ready)--> PROGRESS --(all finished)--> CLOSED
/// OPEN --(last participant leaves)--> [deleted]
/// ```
///
/// - **Open**: accepting joins, participants toggle between WAITING and
///   READY.
/// - **Progress**: questions drawn, submissions accepted, no late joins.
/// - **Closed**: every participant finished; the room is retained for
///   result lookups but its code is back in the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoomStatus {
    Open,
    Progress,
    Closed,
}

impl RoomStatus {
    /// Returns `true` if the room is accepting new participants.
    pub fn is_joinable(self) -> bool {
        matches!(self, Self::Open)
    }

    /// Returns `true` if the room counts as active (holds its code in
    /// the active-room index).
    pub fn is_active(self) -> bool {
        matches!(self, Self::Open | Self::Progress)
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Progress => write!(f, "PROGRESS"),
            Self::Closed => write!(f, "CLOSED"),
        }
    }
}

// ---------------------------------------------------------------------------
// ParticipantStatus
// ---------------------------------------------------------------------------

/// A participant's sub-state within the room lifecycle.
///
/// WAITING ⇄ READY toggles freely while the room is OPEN; FINISHED is
/// one-way and only reachable while the room is in PROGRESS. The full
/// table lives in [`ParticipantStatus::can_become`] so illegal moves are
/// an enumeration, not scattered `if`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ParticipantStatus {
    Waiting,
    Ready,
    Finished,
}

impl ParticipantStatus {
    /// Returns `true` if a participant in this status may move to
    /// `next` while the room is in `room` status.
    pub fn can_become(self, next: Self, room: RoomStatus) -> bool {
        use ParticipantStatus::{Finished, Ready, Waiting};
        matches!(
            (room, self, next),
            (RoomStatus::Open, Waiting, Ready)
                | (RoomStatus::Open, Ready, Waiting)
                | (RoomStatus::Progress, Waiting | Ready, Finished)
        )
    }
}

impl fmt::Display for ParticipantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting => write!(f, "WAITING"),
            Self::Ready => write!(f, "READY"),
            Self::Finished => write!(f, "FINISHED"),
        }
    }
}

// ---------------------------------------------------------------------------
// Difficulty
// ---------------------------------------------------------------------------

/// Question difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Easy => write!(f, "EASY"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::Hard => write!(f, "HARD"),
        }
    }
}

// ---------------------------------------------------------------------------
// UserProfile
// ---------------------------------------------------------------------------

/// The role attached to a user account.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

/// A verified user identity, as handed over by the auth collaborator.
///
/// Rooms copy these fields into a participant snapshot at join time;
/// later profile changes do not propagate into rooms already joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub avatar_url: String,
    #[serde(default)]
    pub role: UserRole,
}

// ---------------------------------------------------------------------------
// QuestionQuantities
// ---------------------------------------------------------------------------

/// Per-difficulty question counts requested by the host at game start.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "camelCase")]
pub struct QuestionQuantities {
    pub num_of_easy: u32,
    pub num_of_medium: u32,
    pub num_of_hard: u32,
}

impl QuestionQuantities {
    /// Total number of questions requested across all tiers.
    ///
    /// Widened to `u64`: the per-tier counts are client-supplied, so
    /// the sum must not wrap before it is checked against the
    /// question-count bound.
    pub fn total(self) -> u64 {
        u64::from(self.num_of_easy)
            + u64::from(self.num_of_medium)
            + u64::from(self.num_of_hard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_status_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&RoomStatus::Open).unwrap(),
            "\"OPEN\""
        );
        assert_eq!(
            serde_json::to_string(&RoomStatus::Progress).unwrap(),
            "\"PROGRESS\""
        );
        assert_eq!(
            serde_json::to_string(&RoomStatus::Closed).unwrap(),
            "\"CLOSED\""
        );
    }

    #[test]
    fn test_room_status_is_joinable() {
        assert!(RoomStatus::Open.is_joinable());
        assert!(!RoomStatus::Progress.is_joinable());
        assert!(!RoomStatus::Closed.is_joinable());
    }

    #[test]
    fn test_room_status_is_active() {
        assert!(RoomStatus::Open.is_active());
        assert!(RoomStatus::Progress.is_active());
        assert!(!RoomStatus::Closed.is_active());
    }

    #[test]
    fn test_participant_status_toggles_while_open() {
        use ParticipantStatus::{Ready, Waiting};
        assert!(Waiting.can_become(Ready, RoomStatus::Open));
        assert!(Ready.can_become(Waiting, RoomStatus::Open));
    }

    #[test]
    fn test_participant_status_finishes_only_in_progress() {
        use ParticipantStatus::{Finished, Ready, Waiting};
        assert!(Ready.can_become(Finished, RoomStatus::Progress));
        assert!(Waiting.can_become(Finished, RoomStatus::Progress));
        assert!(!Ready.can_become(Finished, RoomStatus::Open));
        assert!(!Waiting.can_become(Finished, RoomStatus::Closed));
    }

    #[test]
    fn test_participant_status_finished_is_terminal() {
        use ParticipantStatus::{Finished, Ready, Waiting};
        for room in [RoomStatus::Open, RoomStatus::Progress, RoomStatus::Closed]
        {
            assert!(!Finished.can_become(Ready, room));
            assert!(!Finished.can_become(Waiting, room));
        }
    }

    #[test]
    fn test_participant_status_same_state_is_not_a_transition() {
        use ParticipantStatus::{Ready, Waiting};
        assert!(!Ready.can_become(Ready, RoomStatus::Open));
        assert!(!Waiting.can_become(Waiting, RoomStatus::Open));
    }

    #[test]
    fn test_no_toggling_once_in_progress() {
        use ParticipantStatus::{Ready, Waiting};
        assert!(!Ready.can_become(Waiting, RoomStatus::Progress));
        assert!(!Waiting.can_become(Ready, RoomStatus::Progress));
    }

    #[test]
    fn test_user_profile_json_shape() {
        let profile = UserProfile {
            id: UserId(1),
            username: "alice".into(),
            avatar_url: "https://cdn.example/a.png".into(),
            role: UserRole::User,
        };
        let json: serde_json::Value =
            serde_json::to_value(&profile).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["username"], "alice");
        assert_eq!(json["avatarUrl"], "https://cdn.example/a.png");
        assert_eq!(json["role"], "USER");
    }

    #[test]
    fn test_user_profile_role_defaults_when_missing() {
        let json = r#"{
            "id": 2,
            "username": "bob",
            "avatarUrl": "https://cdn.example/b.png"
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.role, UserRole::User);
    }

    #[test]
    fn test_question_quantities_total_and_shape() {
        let q = QuestionQuantities {
            num_of_easy: 1,
            num_of_medium: 2,
            num_of_hard: 3,
        };
        assert_eq!(q.total(), 6);

        let json: serde_json::Value = serde_json::to_value(q).unwrap();
        assert_eq!(json["numOfEasy"], 1);
        assert_eq!(json["numOfMedium"], 2);
        assert_eq!(json["numOfHard"], 3);
    }

    #[test]
    fn test_question_quantities_total_does_not_wrap() {
        let q = QuestionQuantities {
            num_of_easy: u32::MAX,
            num_of_medium: 11,
            num_of_hard: 0,
        };
        assert_eq!(q.total(), u64::from(u32::MAX) + 11);

        let q = QuestionQuantities {
            num_of_easy: u32::MAX,
            num_of_medium: u32::MAX,
            num_of_hard: u32::MAX,
        };
        assert_eq!(q.total(), u64::from(u32::MAX) * 3);
    }

    #[test]
    fn test_difficulty_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&Difficulty::Medium).unwrap(),
            "\"MEDIUM\""
        );
    }
}
