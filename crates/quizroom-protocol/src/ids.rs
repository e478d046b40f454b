//! Identifier newtypes.
//!
//! Plain integers and strings are too easy to mix up across call sites,
//! so every identity gets its own wrapper type. `#[serde(transparent)]`
//! keeps the wire representation flat: a `UserId(42)` serializes as
//! `42`, not `{"0":42}`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A unique identifier for a user account.
///
/// Supplied by the identity collaborator with every inbound action;
/// the core trusts it without re-verifying credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U-{}", self.0)
    }
}

/// A unique identifier for a room row in the backing store.
///
/// Assigned by the repository at creation, immutable afterwards. Not to
/// be confused with [`RoomCode`], which is the short join code and may
/// be reused after a room closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

/// A unique identifier for a quiz question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub u64);

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q-{}", self.0)
    }
}

/// The inclusive range room codes are drawn from. Code generators draw
/// from this range so every code is exactly six digits with no leading
/// zero.
pub const CODE_RANGE: std::ops::RangeInclusive<u32> = 100_000..=999_999;

/// A 6-digit numeric room join code.
///
/// Unique among *active* rooms only — once a room closes or is deleted
/// its code returns to the pool. Also doubles as the broadcast channel
/// name for the room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Wraps a numeric draw from the code range.
    ///
    /// # Panics
    ///
    /// Debug-asserts that `n` is within the 6-digit range; callers draw
    /// with `rand::Rng::random_range(100_000..=999_999)` so this holds
    /// by construction.
    pub fn from_number(n: u32) -> Self {
        debug_assert!(CODE_RANGE.contains(&n));
        Self(n.to_string())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error returned when parsing a [`RoomCode`] from client input.
#[derive(Debug, thiserror::Error)]
#[error("invalid room code {0:?}: expected 6 digits")]
pub struct InvalidRoomCode(pub String);

impl FromStr for RoomCode {
    type Err = InvalidRoomCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let numeric = s.len() == 6 && s.bytes().all(|b| b.is_ascii_digit());
        // Leading zeroes never occur: the draw range starts at 100000.
        if numeric && !s.starts_with('0') {
            Ok(Self(s.to_string()))
        } else {
            Err(InvalidRoomCode(s.to_string()))
        }
    }
}
