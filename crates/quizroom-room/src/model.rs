//! The Room aggregate: participants, point slots, and room state.
//!
//! Participants are owned denormalized snapshots of the joining user,
//! not live references — profile changes after join do not propagate
//! into a running room. The whole aggregate serializes to the client
//! wire shape (camelCase), since room events carry it verbatim.

use serde::{Deserialize, Serialize};

use quizroom_bank::Question;
use quizroom_protocol::{
    ParticipantStatus, QuestionId, RoomCode, RoomId, RoomStatus, UserId,
    UserProfile, UserRole,
};

/// One per-question score slot.
///
/// `time == 0` means the slot is still unanswered; accepted submissions
/// always carry a positive elapsed time, so the sentinel is unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointRecord {
    pub question_id: QuestionId,
    /// Awarded score, 0–100.
    pub point: u32,
    /// Elapsed seconds for the accepted submission; 0 = unanswered.
    pub time: u32,
}

impl PointRecord {
    /// A zero-initialized slot for the given question.
    pub fn zeroed(question_id: QuestionId) -> Self {
        Self { question_id, point: 0, time: 0 }
    }

    /// Returns `true` once a submission has been accepted for this slot.
    pub fn is_answered(&self) -> bool {
        self.time != 0
    }
}

/// A user's membership record within one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub user_id: UserId,
    pub username: String,
    pub avatar_url: String,
    pub role: UserRole,
    pub status: ParticipantStatus,
    /// One slot per room question, aligned by index to
    /// `Room::questions`. Empty until the game starts.
    pub points: Vec<PointRecord>,
    /// Running sum of awarded points across all slots.
    pub total: u32,
}

impl Participant {
    /// Snapshots a verified user profile into a WAITING participant.
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            user_id: profile.id,
            username: profile.username.clone(),
            avatar_url: profile.avatar_url.clone(),
            role: profile.role,
            status: ParticipantStatus::Waiting,
            points: Vec::new(),
            total: 0,
        }
    }

    /// Index of the slot for `question_id`, if this room has it.
    pub fn slot_index(&self, question_id: QuestionId) -> Option<usize> {
        self.points.iter().position(|p| p.question_id == question_id)
    }

    /// Returns `true` once every slot has an accepted submission.
    ///
    /// A participant with no slots (game not started) is never
    /// considered done.
    pub fn all_answered(&self) -> bool {
        !self.points.is_empty()
            && self.points.iter().all(PointRecord::is_answered)
    }

    /// Overwrites slot `index` with an accepted submission and adds the
    /// score delta to the running total.
    ///
    /// Callers must have checked the monotonic-score rule: `point` is
    /// at least the currently recorded value.
    pub fn record(&mut self, index: usize, point: u32, time: u32) {
        let slot = &mut self.points[index];
        self.total += point - slot.point;
        slot.point = point;
        slot.time = time;
    }
}

/// One quiz match, identified by a short numeric join code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Store-assigned id; the repository fills this in on create.
    pub id: RoomId,
    pub room_code: RoomCode,
    pub status: RoomStatus,
    /// Insertion order is join order; index 0 is the host.
    pub participants: Vec<Participant>,
    /// Populated exactly once at game start, immutable afterwards.
    pub questions: Vec<Question>,
}

impl Room {
    /// A fresh OPEN room with the creator as its only participant.
    ///
    /// The id is a placeholder until the repository assigns one.
    pub fn open(room_code: RoomCode, creator: &UserProfile) -> Self {
        Self {
            id: RoomId(0),
            room_code,
            status: RoomStatus::Open,
            participants: vec![Participant::from_profile(creator)],
            questions: Vec::new(),
        }
    }

    /// The host: whoever currently occupies participant index 0.
    ///
    /// Host identity is positional, not a stored flag — when the host
    /// leaves, the next earliest joiner takes over implicitly.
    pub fn host(&self) -> Option<&Participant> {
        self.participants.first()
    }

    /// Returns `true` if `user_id` is the current host.
    pub fn is_host(&self, user_id: UserId) -> bool {
        self.host().is_some_and(|p| p.user_id == user_id)
    }

    /// Looks up a participant by user id.
    pub fn participant(&self, user_id: UserId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.user_id == user_id)
    }

    /// Mutable participant lookup by user id.
    pub fn participant_mut(
        &mut self,
        user_id: UserId,
    ) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.user_id == user_id)
    }

    /// Returns `true` if the user already occupies a slot.
    pub fn has_participant(&self, user_id: UserId) -> bool {
        self.participant(user_id).is_some()
    }

    /// Removes a participant, preserving the relative order of the
    /// rest. Returns the removed snapshot.
    pub fn remove_participant(
        &mut self,
        user_id: UserId,
    ) -> Option<Participant> {
        let index = self
            .participants
            .iter()
            .position(|p| p.user_id == user_id)?;
        Some(self.participants.remove(index))
    }

    /// Returns `true` if every participant is READY.
    pub fn all_ready(&self) -> bool {
        self.participants
            .iter()
            .all(|p| p.status == ParticipantStatus::Ready)
    }

    /// Returns `true` if every participant is FINISHED.
    pub fn all_finished(&self) -> bool {
        self.participants
            .iter()
            .all(|p| p.status == ParticipantStatus::Finished)
    }

    /// Moves the room into PROGRESS with the drawn question list and a
    /// zero-initialized slot per question for every participant.
    pub fn begin(&mut self, questions: Vec<Question>) {
        for participant in &mut self.participants {
            participant.points =
                questions.iter().map(|q| PointRecord::zeroed(q.id)).collect();
        }
        self.questions = questions;
        self.status = RoomStatus::Progress;
    }
}
