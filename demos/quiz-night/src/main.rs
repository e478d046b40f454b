//! Scripted quiz night against the in-memory stack.
//!
//! Three players run one full match: create, join, ready up, start,
//! submit, finish. A subscriber task prints every broadcast event as
//! JSON, which is exactly what a real-time gateway would relay to
//! clients. Run with `RUST_LOG=info` to see the session logs too.

use std::sync::Arc;

use quizroom_bank::{InMemoryQuestionBank, Question};
use quizroom_protocol::{
    Difficulty, ParticipantStatus, QuestionId, QuestionQuantities, UserId,
    UserProfile, UserRole,
};
use quizroom_room::RoomError;
use quizroom_session::{
    ChannelBroadcaster, InMemoryRoomRepository, SessionService, Submission,
};
use tracing_subscriber::EnvFilter;

fn question_pool() -> Vec<Question> {
    let tiers = [
        (Difficulty::Easy, 1..=4),
        (Difficulty::Medium, 11..=14),
        (Difficulty::Hard, 21..=24),
    ];
    tiers
        .into_iter()
        .flat_map(|(difficulty, ids)| {
            ids.map(move |id| Question {
                id: QuestionId(id),
                image_url: format!("https://cdn.example/targets/{id}.png"),
                colors: vec!["#1d2b53".into(), "#fff1e8".into()],
                difficulty,
            })
        })
        .collect()
}

fn player(id: u64, username: &str) -> UserProfile {
    UserProfile {
        id: UserId(id),
        username: username.into(),
        avatar_url: format!("https://cdn.example/avatars/{username}.png"),
        role: UserRole::User,
    }
}

#[tokio::main]
async fn main() -> Result<(), RoomError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let repo = Arc::new(InMemoryRoomRepository::new());
    let broadcaster = Arc::new(ChannelBroadcaster::default());
    let bank = Arc::new(InMemoryQuestionBank::new(question_pool()));
    let service = SessionService::new(
        repo,
        Arc::clone(&broadcaster),
        bank,
        Default::default(),
    );

    let alice = player(1, "alice");
    let bob = player(2, "bob");
    let cam = player(3, "cam");

    // Lobby phase.
    let room = service.create_room(&alice).await?;
    let code = room.room_code.clone();
    println!("room {code} created, host {}", alice.username);

    // Relay the room's channel to stdout, as a gateway would.
    let mut events = broadcaster.subscribe(&code);
    let relay = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match serde_json::to_string(&event) {
                Ok(json) => println!("  [{}] {json}", event.name()),
                Err(err) => eprintln!("  relay encode error: {err}"),
            }
        }
    });

    service.join_room(&code, bob.clone()).await?;
    service.join_room(&code, cam.clone()).await?;
    for p in [&alice, &bob, &cam] {
        service
            .update_status(&code, p.clone(), ParticipantStatus::Ready)
            .await?;
    }

    // The host starts a short mixed-difficulty match.
    let room = service
        .start_game(
            &code,
            alice.clone(),
            QuestionQuantities {
                num_of_easy: 2,
                num_of_medium: 1,
                num_of_hard: 0,
            },
        )
        .await?;
    println!("game started with {} questions", room.questions.len());

    // Scripted submissions: everyone answers everything; bob retries
    // his first question with a better score along the way.
    let scripted: &[(&UserProfile, usize, u32, u32)] = &[
        (&alice, 0, 82, 31),
        (&bob, 0, 64, 28),
        (&cam, 0, 91, 44),
        (&bob, 0, 88, 61), // improved retry
        (&alice, 1, 75, 52),
        (&bob, 1, 97, 40),
        (&cam, 1, 70, 39),
        (&alice, 2, 60, 77),
        (&bob, 2, 55, 63),
        (&cam, 2, 83, 70),
    ];
    for &(who, slot, point, time) in scripted {
        let outcome = service
            .submit_work(
                &code,
                who.clone(),
                Submission {
                    question_id: room.questions[slot].id,
                    point,
                    time,
                },
            )
            .await?;
        if let Some(rank) = outcome.rank {
            println!("{} finished, ranked {rank}", who.username);
        }
    }

    // The room is CLOSED; final boards remain queryable.
    let (_, summary) = service.result_board(&code).await?;
    println!("final standings:");
    for (i, row) in summary.iter().enumerate() {
        println!(
            "  {}. {} — {} pts in {}s",
            i + 1,
            row.username,
            row.point,
            row.time
        );
    }

    relay.abort();
    Ok(())
}
