//! Room session actor: an isolated Tokio task that serializes every
//! mutation of one room.
//!
//! Commands arrive over an mpsc channel with oneshot reply channels.
//! Each command runs a full validate-mutate-persist-broadcast cycle
//! against a fresh repository read, so concurrent client actions for
//! the same room can never interleave their read-modify-write, while
//! different rooms run on independent tasks.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use quizroom_bank::{Question, QuestionBank};
use quizroom_protocol::{
    Difficulty, ParticipantStatus, QuestionQuantities, RoomCode,
    RoomStatus, UserProfile,
};
use quizroom_room::{
    Leaderboard, Participant, Room, RoomConfig, RoomError, Summary,
    leaderboard, rank_label, rank_of, summary,
};

use crate::{Broadcaster, RoomEvent, RoomRepository};

/// A scored submission for one question.
#[derive(Debug, Clone, Copy)]
pub struct Submission {
    pub question_id: quizroom_protocol::QuestionId,
    /// Awarded score, 0–100, computed upstream by the scoring function.
    pub point: u32,
    /// Elapsed seconds; must be positive (0 encodes "unanswered").
    pub time: u32,
}

/// Result of a leave operation.
#[derive(Debug, Clone)]
pub enum LeaveOutcome {
    /// The participant left; the room lives on.
    Left(Room),
    /// The last participant left; the room was deleted and its code
    /// released.
    Deleted,
}

/// Result of an accepted submission.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    /// Per-question ranking after this submission.
    pub leaderboard: Leaderboard,
    /// Whole-match summary; present once this participant finished.
    pub summary: Option<Summary>,
    /// Ordinal rank label for this participant, once finished.
    pub rank: Option<String>,
    /// True when this submission finished the whole room (now CLOSED).
    pub game_over: bool,
}

/// Commands sent to a room session actor.
enum SessionCommand {
    Join {
        user: UserProfile,
        reply: oneshot::Sender<Result<Room, RoomError>>,
    },
    Leave {
        user: UserProfile,
        reply: oneshot::Sender<Result<LeaveOutcome, RoomError>>,
    },
    SetStatus {
        user: UserProfile,
        status: ParticipantStatus,
        reply: oneshot::Sender<Result<Room, RoomError>>,
    },
    Start {
        user: UserProfile,
        quantities: QuestionQuantities,
        reply: oneshot::Sender<Result<Room, RoomError>>,
    },
    Submit {
        user: UserProfile,
        submission: Submission,
        reply: oneshot::Sender<Result<SubmitOutcome, RoomError>>,
    },
    Finish {
        user: UserProfile,
        reply: oneshot::Sender<Result<Room, RoomError>>,
    },
}

/// Handle to a running room session. Cheap to clone; the
/// [`SessionService`](crate::SessionService) holds one per live room.
#[derive(Clone)]
pub struct SessionHandle {
    code: RoomCode,
    sender: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    /// The room code this handle belongs to.
    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<Result<T, RoomError>>) -> SessionCommand,
    ) -> Result<T, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(make(reply_tx))
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?
    }

    /// Adds a participant snapshot of `user` to the room.
    pub async fn join(&self, user: UserProfile) -> Result<Room, RoomError> {
        self.request(|reply| SessionCommand::Join { user, reply }).await
    }

    /// Removes `user` from the room, deleting it if they were last.
    pub async fn leave(
        &self,
        user: UserProfile,
    ) -> Result<LeaveOutcome, RoomError> {
        self.request(|reply| SessionCommand::Leave { user, reply }).await
    }

    /// Moves `user` to `status` per the transition table.
    pub async fn set_status(
        &self,
        user: UserProfile,
        status: ParticipantStatus,
    ) -> Result<Room, RoomError> {
        self.request(|reply| SessionCommand::SetStatus {
            user,
            status,
            reply,
        })
        .await
    }

    /// Host-only: draws questions and moves the room to PROGRESS.
    pub async fn start(
        &self,
        user: UserProfile,
        quantities: QuestionQuantities,
    ) -> Result<Room, RoomError> {
        self.request(|reply| SessionCommand::Start {
            user,
            quantities,
            reply,
        })
        .await
    }

    /// Records a scored submission and recomputes the boards.
    pub async fn submit(
        &self,
        user: UserProfile,
        submission: Submission,
    ) -> Result<SubmitOutcome, RoomError> {
        self.request(|reply| SessionCommand::Submit {
            user,
            submission,
            reply,
        })
        .await
    }

    /// Marks `user` FINISHED without completing every question.
    pub async fn finish(&self, user: UserProfile) -> Result<Room, RoomError> {
        self.request(|reply| SessionCommand::Finish { user, reply }).await
    }
}

/// The actor state. Runs inside its own Tokio task until every handle
/// is dropped.
struct RoomSession<R, B, Q> {
    code: RoomCode,
    config: RoomConfig,
    repo: Arc<R>,
    broadcaster: Arc<B>,
    bank: Arc<Q>,
    receiver: mpsc::Receiver<SessionCommand>,
}

impl<R, B, Q> RoomSession<R, B, Q>
where
    R: RoomRepository,
    B: Broadcaster,
    Q: QuestionBank,
{
    async fn run(mut self) {
        tracing::info!(code = %self.code, "room session started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                SessionCommand::Join { user, reply } => {
                    let _ = reply.send(self.handle_join(user).await);
                }
                SessionCommand::Leave { user, reply } => {
                    let _ = reply.send(self.handle_leave(user).await);
                }
                SessionCommand::SetStatus { user, status, reply } => {
                    let _ = reply
                        .send(self.handle_set_status(user, status).await);
                }
                SessionCommand::Start { user, quantities, reply } => {
                    let _ = reply
                        .send(self.handle_start(user, quantities).await);
                }
                SessionCommand::Submit { user, submission, reply } => {
                    let _ = reply
                        .send(self.handle_submit(user, submission).await);
                }
                SessionCommand::Finish { user, reply } => {
                    let _ = reply.send(self.handle_finish(user).await);
                }
            }
        }

        tracing::info!(code = %self.code, "room session stopped");
    }

    /// Fresh read of the room; stale copies are never reused across
    /// commands.
    async fn load(&self) -> Result<Room, RoomError> {
        self.repo
            .find_active_by_code(&self.code)
            .await?
            .ok_or_else(|| RoomError::RoomNotFound(self.code.clone()))
    }

    async fn publish(&self, event: RoomEvent) -> Result<(), RoomError> {
        self.broadcaster.publish(&self.code, event).await
    }

    async fn handle_join(
        &self,
        user: UserProfile,
    ) -> Result<Room, RoomError> {
        let mut room = self.load().await?;

        if room.has_participant(user.id) {
            return Err(RoomError::AlreadyJoined(user.id));
        }
        if room.status == RoomStatus::Progress {
            return Err(RoomError::RoomInProgress(self.code.clone()));
        }
        if room.participants.len() >= self.config.max_participants {
            return Err(RoomError::RoomFull(self.code.clone()));
        }

        room.participants.push(Participant::from_profile(&user));
        self.repo.save(&room).await?;

        tracing::info!(
            code = %self.code,
            user = %user.id,
            participants = room.participants.len(),
            "player joined"
        );

        self.publish(RoomEvent::RoomUpdated {
            room: Some(room.clone()),
            message: format!(
                "Player {} has joined the room",
                user.username
            ),
        })
        .await?;

        Ok(room)
    }

    async fn handle_leave(
        &self,
        user: UserProfile,
    ) -> Result<LeaveOutcome, RoomError> {
        let mut room = self.load().await?;

        if !room.has_participant(user.id) {
            return Err(RoomError::NotInRoom(user.id));
        }

        if room.participants.len() == 1 {
            self.repo.delete(room.id).await?;
            tracing::info!(code = %self.code, "last player left, room deleted");
            self.publish(RoomEvent::RoomUpdated {
                room: None,
                message: format!("Room {} has been deleted", self.code),
            })
            .await?;
            return Ok(LeaveOutcome::Deleted);
        }

        room.remove_participant(user.id);
        self.repo.save(&room).await?;

        tracing::info!(
            code = %self.code,
            user = %user.id,
            participants = room.participants.len(),
            "player left"
        );

        self.publish(RoomEvent::RoomUpdated {
            room: Some(room.clone()),
            message: format!("Player {} has left the room", user.username),
        })
        .await?;

        Ok(LeaveOutcome::Left(room))
    }

    async fn handle_set_status(
        &self,
        user: UserProfile,
        status: ParticipantStatus,
    ) -> Result<Room, RoomError> {
        let mut room = self.load().await?;
        let room_status = room.status;

        let participant = room
            .participant_mut(user.id)
            .ok_or(RoomError::NotInRoom(user.id))?;

        if !participant.status.can_become(status, room_status) {
            return Err(RoomError::IllegalTransition {
                user: user.id,
                from: participant.status,
                to: status,
                room: room_status,
            });
        }
        participant.status = status;

        let message = match status {
            ParticipantStatus::Ready => {
                format!("Player {} readies to start", user.username)
            }
            ParticipantStatus::Waiting => format!(
                "Player {} has changed to waiting state",
                user.username
            ),
            ParticipantStatus::Finished => {
                format!("Player {} has finished the game", user.username)
            }
        };

        // A direct FINISHED set can be the one that closes the room.
        if status == ParticipantStatus::Finished && room.all_finished() {
            return self.close_room(room).await;
        }

        self.repo.save(&room).await?;
        self.publish(RoomEvent::RoomUpdated {
            room: Some(room.clone()),
            message,
        })
        .await?;

        Ok(room)
    }

    async fn handle_start(
        &self,
        user: UserProfile,
        quantities: QuestionQuantities,
    ) -> Result<Room, RoomError> {
        // The widened total cannot have wrapped, so a hostile request
        // with huge per-tier counts fails here instead of passing.
        let total = quantities.total();
        if total == 0 || total > u64::from(self.config.max_questions) {
            return Err(RoomError::QuestionCountOutOfRange {
                requested: total,
                max: self.config.max_questions,
            });
        }

        let mut room = self.load().await?;

        if !room.has_participant(user.id) {
            return Err(RoomError::NotInRoom(user.id));
        }
        if !room.is_host(user.id) {
            return Err(RoomError::NotHost(user.id));
        }
        if room.participants.len() < self.config.min_players_to_start {
            return Err(RoomError::NotEnoughPlayers(
                self.config.min_players_to_start,
            ));
        }
        if !room.all_ready() {
            return Err(RoomError::NotAllReady);
        }

        // EASY + MEDIUM + HARD concatenation, drawn once; the list is
        // immutable for the rest of the match.
        let mut questions: Vec<Question> = Vec::with_capacity(total as usize);
        questions.extend(
            self.bank
                .draw_random(quantities.num_of_easy, Difficulty::Easy)
                .await,
        );
        questions.extend(
            self.bank
                .draw_random(quantities.num_of_medium, Difficulty::Medium)
                .await,
        );
        questions.extend(
            self.bank
                .draw_random(quantities.num_of_hard, Difficulty::Hard)
                .await,
        );

        room.begin(questions);
        self.repo.save(&room).await?;

        tracing::info!(
            code = %self.code,
            questions = room.questions.len(),
            participants = room.participants.len(),
            "game started"
        );

        self.publish(RoomEvent::GameStarted {
            room: room.clone(),
            message: "Questions have been generated successfully".into(),
        })
        .await?;

        Ok(room)
    }

    async fn handle_submit(
        &self,
        user: UserProfile,
        submission: Submission,
    ) -> Result<SubmitOutcome, RoomError> {
        if submission.point > 100 {
            return Err(RoomError::PointOutOfRange(submission.point));
        }
        if submission.time == 0 {
            return Err(RoomError::ZeroTime);
        }

        let mut room = self.load().await?;

        let index = room
            .participants
            .iter()
            .position(|p| p.user_id == user.id)
            .ok_or(RoomError::NotInRoom(user.id))?;

        let slot = room.participants[index]
            .slot_index(submission.question_id)
            .ok_or(RoomError::UnknownQuestion(submission.question_id))?;

        let recorded = &room.participants[index].points[slot];
        // Monotonic-score rule: a resubmission must strictly improve.
        if recorded.is_answered() && submission.point <= recorded.point {
            return Err(RoomError::ScoreNotImproved {
                submitted: submission.point,
                recorded: recorded.point,
            });
        }

        room.participants[index].record(
            slot,
            submission.point,
            submission.time,
        );

        if room.participants[index].all_answered() {
            room.participants[index].status = ParticipantStatus::Finished;
            let board = leaderboard(&room.participants);
            let rows = summary(&room.participants);
            let rank = rank_of(&rows, &user.username)
                .map(rank_label)
                .unwrap_or_default();

            if room.all_finished() {
                self.close_room(room).await?;
                return Ok(SubmitOutcome {
                    leaderboard: board,
                    summary: Some(rows),
                    rank: Some(rank),
                    game_over: true,
                });
            }

            self.repo.save(&room).await?;
            self.publish(RoomEvent::PlayerFinished {
                leaderboard: board.clone(),
                summary: rows.clone(),
                message: format!(
                    "Player {} currently ranked {} in the game",
                    user.username, rank
                ),
            })
            .await?;

            return Ok(SubmitOutcome {
                leaderboard: board,
                summary: Some(rows),
                rank: Some(rank),
                game_over: false,
            });
        }

        let board = leaderboard(&room.participants);
        self.repo.save(&room).await?;
        self.publish(RoomEvent::ProgressUpdated {
            leaderboard: board.clone(),
            message: format!(
                "Player {} has earned {} points to question {}",
                user.username,
                submission.point,
                slot + 1
            ),
        })
        .await?;

        Ok(SubmitOutcome {
            leaderboard: board,
            summary: None,
            rank: None,
            game_over: false,
        })
    }

    async fn handle_finish(
        &self,
        user: UserProfile,
    ) -> Result<Room, RoomError> {
        let mut room = self.load().await?;
        let room_status = room.status;

        let participant = room
            .participant_mut(user.id)
            .ok_or(RoomError::NotInRoom(user.id))?;

        if !participant
            .status
            .can_become(ParticipantStatus::Finished, room_status)
        {
            return Err(RoomError::IllegalTransition {
                user: user.id,
                from: participant.status,
                to: ParticipantStatus::Finished,
                room: room_status,
            });
        }
        participant.status = ParticipantStatus::Finished;

        if room.all_finished() {
            return self.close_room(room).await;
        }

        let board = leaderboard(&room.participants);
        let rows = summary(&room.participants);
        let rank = rank_of(&rows, &user.username)
            .map(rank_label)
            .unwrap_or_default();

        self.repo.save(&room).await?;
        self.publish(RoomEvent::PlayerFinished {
            leaderboard: board,
            summary: rows,
            message: format!(
                "Player {} currently ranked {} in the game",
                user.username, rank
            ),
        })
        .await?;

        Ok(room)
    }

    /// Terminal transition: every participant is FINISHED. Persists the
    /// CLOSED room and fires the one `gameFinished` broadcast.
    async fn close_room(&self, mut room: Room) -> Result<Room, RoomError> {
        room.status = RoomStatus::Closed;
        self.repo.save(&room).await?;

        tracing::info!(code = %self.code, "all players finished, room closed");

        self.publish(RoomEvent::GameFinished {
            room: room.clone(),
            message: "All players have finished the game".into(),
        })
        .await?;

        Ok(room)
    }
}

/// Spawns a session actor for `code` and returns its handle.
pub(crate) fn spawn_session<R, B, Q>(
    code: RoomCode,
    config: RoomConfig,
    repo: Arc<R>,
    broadcaster: Arc<B>,
    bank: Arc<Q>,
    channel_size: usize,
) -> SessionHandle
where
    R: RoomRepository,
    B: Broadcaster,
    Q: QuestionBank,
{
    let (tx, rx) = mpsc::channel(channel_size);

    let session = RoomSession {
        code: code.clone(),
        config,
        repo,
        broadcaster,
        bank,
        receiver: rx,
    };

    tokio::spawn(session.run());

    SessionHandle { code, sender: tx }
}
