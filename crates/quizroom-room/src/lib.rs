//! The Room aggregate and everything computed from it.
//!
//! A room is one quiz match: an ordered roster of participant snapshots,
//! a question list drawn once at game start, and per-question score
//! slots. This crate holds the owned data model, the pure board
//! computations (leaderboard, summary, rank labels), the room
//! configuration knobs, and the error taxonomy shared across the stack.
//!
//! Nothing here does I/O — the session layer drives these types through
//! its per-room actors.

mod board;
mod config;
mod error;
mod model;

pub use board::{
    BoardRow, Leaderboard, Summary, SummaryRow, leaderboard, rank_label,
    rank_of, summary,
};
pub use config::RoomConfig;
pub use error::{ErrorKind, RoomError};
pub use model::{Participant, PointRecord, Room};
