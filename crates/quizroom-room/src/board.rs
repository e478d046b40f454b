//! Leaderboard and summary computation.
//!
//! Pure functions over a participant snapshot — same input, same
//! output, no hidden state. The session layer recomputes these after
//! every accepted submission and ships them in broadcast events.

use serde::{Deserialize, Serialize};

use quizroom_protocol::ParticipantStatus;

use crate::Participant;

/// One participant's standing for a single question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardRow {
    pub username: String,
    pub point: u32,
    pub time: u32,
}

/// Per-question ranking: one sub-list per question, aligned by index to
/// the room's question list.
pub type Leaderboard = Vec<Vec<BoardRow>>;

/// One participant's whole-match aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub username: String,
    pub status: ParticipantStatus,
    pub point: u32,
    pub time: u32,
}

/// Whole-match ranking, best total first.
pub type Summary = Vec<SummaryRow>;

/// Builds the per-question leaderboard.
///
/// For each question, participants who answered it come first, ordered
/// by point descending with ties broken by lower time; participants who
/// have not answered follow in join order.
pub fn leaderboard(participants: &[Participant]) -> Leaderboard {
    let question_count =
        participants.first().map_or(0, |p| p.points.len());
    let mut board = Vec::with_capacity(question_count);

    for i in 0..question_count {
        let mut answered = Vec::new();
        let mut unanswered = Vec::new();

        for participant in participants {
            let slot = &participant.points[i];
            let row = BoardRow {
                username: participant.username.clone(),
                point: slot.point,
                time: slot.time,
            };
            if slot.is_answered() {
                answered.push(row);
            } else {
                unanswered.push(row);
            }
        }

        // Stable sort: equal (point, time) pairs keep join order.
        answered.sort_by(|a, b| {
            b.point.cmp(&a.point).then(a.time.cmp(&b.time))
        });
        answered.extend(unanswered);
        board.push(answered);
    }

    board
}

/// Builds the whole-match summary: total point and time per
/// participant, best total first, ties broken by lower total time.
pub fn summary(participants: &[Participant]) -> Summary {
    let mut rows: Summary = participants
        .iter()
        .map(|participant| {
            let (point, time) = participant
                .points
                .iter()
                .fold((0, 0), |(p, t), slot| (p + slot.point, t + slot.time));
            SummaryRow {
                username: participant.username.clone(),
                status: participant.status,
                point,
                time,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.point.cmp(&a.point).then(a.time.cmp(&b.time)));
    rows
}

/// 1-based rank of `username` within a summary, if present.
pub fn rank_of(summary: &Summary, username: &str) -> Option<usize> {
    summary.iter().position(|row| row.username == username).map(|i| i + 1)
}

/// Ordinal label for a 1-based rank: "1st", "2nd", "3rd", "4th", ...
pub fn rank_label(rank: usize) -> String {
    match rank {
        1 => "1st".to_string(),
        2 => "2nd".to_string(),
        3 => "3rd".to_string(),
        n => format!("{n}th"),
    }
}
