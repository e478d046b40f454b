//! Active room index: process-wide set of live room codes.
//!
//! The source of truth for "does this code collide" during code
//! generation. Check-and-add is a single atomic step under the lock,
//! so two concurrent creates can never draw the same code. The index
//! holds codes of OPEN and PROGRESS rooms only; a code returns to the
//! pool as soon as its room closes or is deleted.

use std::collections::HashSet;
use std::sync::Mutex;

use rand::Rng;

use quizroom_protocol::{CODE_RANGE, RoomCode};
use quizroom_room::RoomError;

/// In-memory registry of live room codes.
///
/// Injected into the [`SessionService`](crate::SessionService) rather
/// than living as a process singleton, so tests can stand up isolated
/// instances.
#[derive(Debug, Default)]
pub struct ActiveRoomIndex {
    codes: Mutex<HashSet<RoomCode>>,
}

impl ActiveRoomIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the code is currently live.
    pub fn contains(&self, code: &RoomCode) -> bool {
        self.codes.lock().expect("index lock poisoned").contains(code)
    }

    /// Atomically reserves a code. Returns `false` if it was already
    /// taken.
    pub fn reserve(&self, code: RoomCode) -> bool {
        self.codes.lock().expect("index lock poisoned").insert(code)
    }

    /// Releases a code back to the pool. Returns `false` if it was not
    /// reserved.
    pub fn release(&self, code: &RoomCode) -> bool {
        self.codes.lock().expect("index lock poisoned").remove(code)
    }

    /// Number of live codes.
    pub fn len(&self) -> usize {
        self.codes.lock().expect("index lock poisoned").len()
    }

    /// Returns `true` if no rooms are live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all live codes, sorted for stable output.
    pub fn snapshot(&self) -> Vec<RoomCode> {
        let mut codes: Vec<RoomCode> = self
            .codes
            .lock()
            .expect("index lock poisoned")
            .iter()
            .cloned()
            .collect();
        codes.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        codes
    }

    /// Draws random codes until one reserves, bounded by `attempts`.
    ///
    /// The code space is sparse (900k codes), so the expected retry
    /// count is ~1; the bound exists so a pathologically full index
    /// fails with a capacity error instead of spinning.
    pub fn reserve_fresh(
        &self,
        attempts: usize,
    ) -> Result<RoomCode, RoomError> {
        let mut rng = rand::rng();
        for _ in 0..attempts {
            let code =
                RoomCode::from_number(rng.random_range(CODE_RANGE));
            if self.reserve(code.clone()) {
                return Ok(code);
            }
        }
        Err(RoomError::CodeSpaceExhausted(attempts))
    }
}
