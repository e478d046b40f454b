//! Shared vocabulary for the Quizroom backend.
//!
//! Everything that crosses a layer boundary lives here: identifier
//! newtypes, the room/participant status enums, question difficulties,
//! and the question-quantity request shape. The serde representations
//! are the wire contract with the web client (camelCase fields,
//! SCREAMING-CASE enum values), so the tests in this crate pin exact
//! JSON shapes.

mod ids;
mod types;

pub use ids::{
    CODE_RANGE, InvalidRoomCode, QuestionId, RoomCode, RoomId, UserId,
};
pub use types::{
    Difficulty, ParticipantStatus, QuestionQuantities, RoomStatus,
    UserProfile, UserRole,
};
