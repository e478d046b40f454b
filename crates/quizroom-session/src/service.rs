//! Service front end: creates rooms and routes operations by room code.
//!
//! Owns the handle map and the [`ActiveRoomIndex`]. Callers arrive with
//! a verified [`UserProfile`] (authentication is the gateway's job);
//! the service looks up the room's session handle and forwards the
//! command. Handles for CLOSED or deleted rooms are retired here, which
//! releases the room code back to the pool and lets the actor task wind
//! down once its channel closes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use quizroom_bank::QuestionBank;
use quizroom_protocol::{
    ParticipantStatus, QuestionQuantities, RoomCode, RoomStatus,
    UserProfile,
};
use quizroom_room::{
    Leaderboard, Room, RoomConfig, RoomError, Summary, leaderboard,
    summary,
};

use crate::actor::{self, LeaveOutcome, SessionHandle, SubmitOutcome, Submission};
use crate::{ActiveRoomIndex, Broadcaster, RoomEvent, RoomRepository};

const SESSION_CHANNEL_SIZE: usize = 64;

/// Entry point for all room operations.
pub struct SessionService<R, B, Q> {
    repo: Arc<R>,
    broadcaster: Arc<B>,
    bank: Arc<Q>,
    config: RoomConfig,
    index: ActiveRoomIndex,
    sessions: Mutex<HashMap<RoomCode, SessionHandle>>,
}

impl<R, B, Q> SessionService<R, B, Q>
where
    R: RoomRepository,
    B: Broadcaster,
    Q: QuestionBank,
{
    /// Builds a service over the given collaborators.
    pub fn new(
        repo: Arc<R>,
        broadcaster: Arc<B>,
        bank: Arc<Q>,
        config: RoomConfig,
    ) -> Self {
        Self {
            repo,
            broadcaster,
            bank,
            config,
            index: ActiveRoomIndex::new(),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// The config every room created by this service runs under.
    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    /// Creates a room with a fresh unique code, `creator` as host, and
    /// a dedicated session actor.
    pub async fn create_room(
        &self,
        creator: &UserProfile,
    ) -> Result<Room, RoomError> {
        let code = self.index.reserve_fresh(self.config.max_code_attempts)?;

        let room = match self.repo.create(Room::open(code.clone(), creator)).await
        {
            Ok(room) => room,
            Err(err) => {
                self.index.release(&code);
                return Err(err);
            }
        };

        let handle = actor::spawn_session(
            code.clone(),
            self.config.clone(),
            Arc::clone(&self.repo),
            Arc::clone(&self.broadcaster),
            Arc::clone(&self.bank),
            SESSION_CHANNEL_SIZE,
        );
        self.sessions
            .lock()
            .expect("session map lock poisoned")
            .insert(code.clone(), handle);

        tracing::info!(code = %code, host = %creator.id, "room created");

        self.broadcaster
            .publish(
                &code,
                RoomEvent::RoomUpdated {
                    room: Some(room.clone()),
                    message: format!("Room {code} has been created"),
                },
            )
            .await?;

        Ok(room)
    }

    /// Adds `user` to the OPEN room with this code.
    pub async fn join_room(
        &self,
        code: &RoomCode,
        user: UserProfile,
    ) -> Result<Room, RoomError> {
        self.handle(code)?.join(user).await
    }

    /// Removes `user`; deletes the room if they were the last one.
    pub async fn leave_room(
        &self,
        code: &RoomCode,
        user: UserProfile,
    ) -> Result<LeaveOutcome, RoomError> {
        let outcome = self.handle(code)?.leave(user).await?;
        if matches!(outcome, LeaveOutcome::Deleted) {
            self.retire(code);
        }
        Ok(outcome)
    }

    /// Moves `user` between WAITING, READY and FINISHED.
    pub async fn update_status(
        &self,
        code: &RoomCode,
        user: UserProfile,
        status: ParticipantStatus,
    ) -> Result<Room, RoomError> {
        let room = self.handle(code)?.set_status(user, status).await?;
        if room.status == RoomStatus::Closed {
            self.retire(code);
        }
        Ok(room)
    }

    /// Host-only: draws questions per `quantities` and starts the game.
    pub async fn start_game(
        &self,
        code: &RoomCode,
        user: UserProfile,
        quantities: QuestionQuantities,
    ) -> Result<Room, RoomError> {
        self.handle(code)?.start(user, quantities).await
    }

    /// Records a scored submission for `user`.
    pub async fn submit_work(
        &self,
        code: &RoomCode,
        user: UserProfile,
        submission: Submission,
    ) -> Result<SubmitOutcome, RoomError> {
        let outcome = self.handle(code)?.submit(user, submission).await?;
        if outcome.game_over {
            self.retire(code);
        }
        Ok(outcome)
    }

    /// Marks `user` FINISHED without completing every question.
    pub async fn finish_game(
        &self,
        code: &RoomCode,
        user: UserProfile,
    ) -> Result<Room, RoomError> {
        let room = self.handle(code)?.finish(user).await?;
        if room.status == RoomStatus::Closed {
            self.retire(code);
        }
        Ok(room)
    }

    /// Codes of every live (OPEN or PROGRESS) room, sorted.
    pub fn active_codes(&self) -> Vec<RoomCode> {
        self.index.snapshot()
    }

    /// Final boards for the newest room with this code, CLOSED rooms
    /// included.
    pub async fn result_board(
        &self,
        code: &RoomCode,
    ) -> Result<(Leaderboard, Summary), RoomError> {
        let room = self
            .repo
            .find_by_code(code)
            .await?
            .ok_or_else(|| RoomError::RoomNotFound(code.clone()))?;
        Ok((leaderboard(&room.participants), summary(&room.participants)))
    }

    /// Current state of the live room with this code.
    pub async fn room(&self, code: &RoomCode) -> Result<Room, RoomError> {
        self.repo
            .find_active_by_code(code)
            .await?
            .ok_or_else(|| RoomError::RoomNotFound(code.clone()))
    }

    /// Clones the session handle for a live room. The map lock is held
    /// only for the lookup; awaits happen on the clone.
    fn handle(&self, code: &RoomCode) -> Result<SessionHandle, RoomError> {
        self.sessions
            .lock()
            .expect("session map lock poisoned")
            .get(code)
            .cloned()
            .ok_or_else(|| RoomError::RoomNotFound(code.clone()))
    }

    /// Drops the session handle and frees the room code. The actor task
    /// exits once the last handle clone is gone.
    fn retire(&self, code: &RoomCode) {
        self.sessions
            .lock()
            .expect("session map lock poisoned")
            .remove(code);
        self.index.release(code);
        tracing::info!(code = %code, "room session retired");
    }
}
