//! Room configuration.

use serde::{Deserialize, Serialize};

/// Tunables for the room session layer.
///
/// One config applies to every room a service creates; observed
/// deployments vary the participant cap (5 or 10), so it is a knob
/// rather than a literal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Maximum participants per room.
    pub max_participants: usize,

    /// Minimum participants required for the host to start the game.
    pub min_players_to_start: usize,

    /// Upper bound on the total question count per match.
    pub max_questions: u32,

    /// How many random draws to try before giving up on finding a free
    /// room code. The code space is sparse enough that more than one
    /// retry is already rare.
    pub max_code_attempts: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            max_participants: 10,
            min_players_to_start: 2,
            max_questions: 10,
            max_code_attempts: 1024,
        }
    }
}
