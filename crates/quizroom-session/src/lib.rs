//! Room session state machine.
//!
//! Each live room runs as an isolated Tokio task (actor model): every
//! mutating operation for a room — join, leave, status update, start,
//! submit, finish — is a command on that room's channel, so the
//! read-modify-persist cycle is serialized per room while distinct
//! rooms proceed in parallel. [`SessionService`] is the front end:
//! it owns the handle map and the [`ActiveRoomIndex`], and is what a
//! gateway calls with a verified user identity.
//!
//! # Key types
//!
//! - [`SessionService`] — create rooms, route operations by room code
//! - [`RoomRepository`] / [`Broadcaster`] — collaborator seams, with
//!   in-memory implementations for tests and embedding
//! - [`RoomEvent`] — the broadcast vocabulary, one channel per room code
//! - [`ActiveRoomIndex`] — atomic reserve/release of live room codes

mod actor;
mod broadcast;
mod events;
mod index;
mod repository;
mod service;

pub use actor::{LeaveOutcome, SessionHandle, SubmitOutcome, Submission};
pub use broadcast::{Broadcaster, ChannelBroadcaster};
pub use events::RoomEvent;
pub use index::ActiveRoomIndex;
pub use repository::{InMemoryRoomRepository, RoomRepository};
pub use service::SessionService;
