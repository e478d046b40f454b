//! Question bank: the read path over the admin-managed question pool.
//!
//! The session layer only ever needs two things from the pool — random
//! difficulty-filtered draws at game start, and lookups by id — so that
//! is the whole [`QuestionBank`] trait. Production backs it with the
//! relational store; tests and the demo use [`InMemoryQuestionBank`].

use std::future::Future;

use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use quizroom_protocol::{Difficulty, QuestionId};

/// A quiz question: a reference artifact plus palette hints.
///
/// Immutable once created. Rooms copy drawn questions into their
/// question list at game start; question CRUD itself is ordinary admin
/// plumbing outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    /// Location of the reference artifact the submitted work is scored
    /// against.
    pub image_url: String,
    /// Palette hint shown to participants.
    pub colors: Vec<String>,
    pub difficulty: Difficulty,
}

/// Read-only access to the question pool.
///
/// The returned futures are `Send` so the room actors can await them
/// from spawned tasks; implementations just write `async fn`.
pub trait QuestionBank: Send + Sync + 'static {
    /// Draws up to `count` questions uniformly, without replacement,
    /// from the pool matching `difficulty`.
    ///
    /// Returns fewer than `count` only when the pool is smaller; an
    /// undersized pool is not an error. `count == 0` short-circuits
    /// without touching the pool.
    fn draw_random(
        &self,
        count: u32,
        difficulty: Difficulty,
    ) -> impl Future<Output = Vec<Question>> + Send;

    /// Looks up a single question by id.
    fn find_by_id(
        &self,
        id: QuestionId,
    ) -> impl Future<Output = Option<Question>> + Send;
}

/// A fixed in-memory question pool.
#[derive(Debug, Clone, Default)]
pub struct InMemoryQuestionBank {
    questions: Vec<Question>,
}

impl InMemoryQuestionBank {
    /// Creates a bank over the given pool.
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Number of questions in the pool, across all difficulties.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Returns `true` if the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl QuestionBank for InMemoryQuestionBank {
    async fn draw_random(
        &self,
        count: u32,
        difficulty: Difficulty,
    ) -> Vec<Question> {
        if count == 0 {
            return Vec::new();
        }
        let pool: Vec<&Question> = self
            .questions
            .iter()
            .filter(|q| q.difficulty == difficulty)
            .collect();
        pool.choose_multiple(&mut rand::rng(), count as usize)
            .map(|q| (*q).clone())
            .collect()
    }

    async fn find_by_id(&self, id: QuestionId) -> Option<Question> {
        self.questions.iter().find(|q| q.id == id).cloned()
    }
}
