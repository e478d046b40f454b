//! Repository seam for the Room aggregate.
//!
//! The relational store is an external collaborator; the session layer
//! only needs these few calls. Implementations must give back a fresh
//! copy on every read — the actors re-load before each mutation and
//! must never see a stale cached aggregate.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;

use quizroom_protocol::{RoomCode, RoomId};
use quizroom_room::{Room, RoomError};

/// Persistence for the Room aggregate (participants embedded).
///
/// The returned futures are `Send` so the room actors can await them
/// from spawned tasks; implementations just write `async fn`.
pub trait RoomRepository: Send + Sync + 'static {
    /// Finds the OPEN or PROGRESS room with this code, if any.
    ///
    /// Codes are reused over time, but at most one *active* room holds
    /// a given code at any instant.
    fn find_active_by_code(
        &self,
        code: &RoomCode,
    ) -> impl Future<Output = Result<Option<Room>, RoomError>> + Send;

    /// Finds the newest room with this code regardless of status.
    /// CLOSED rooms stay visible here for result lookups.
    fn find_by_code(
        &self,
        code: &RoomCode,
    ) -> impl Future<Output = Result<Option<Room>, RoomError>> + Send;

    /// Persists a new room and returns it with its assigned id.
    fn create(
        &self,
        room: Room,
    ) -> impl Future<Output = Result<Room, RoomError>> + Send;

    /// Persists the current state of an existing room.
    fn save(
        &self,
        room: &Room,
    ) -> impl Future<Output = Result<(), RoomError>> + Send;

    /// Deletes a room outright (last participant left).
    fn delete(
        &self,
        id: RoomId,
    ) -> impl Future<Output = Result<(), RoomError>> + Send;
}

/// HashMap-backed repository for tests and the demo.
#[derive(Debug, Default)]
pub struct InMemoryRoomRepository {
    rooms: Mutex<HashMap<RoomId, Room>>,
    next_id: AtomicU64,
}

impl InMemoryRoomRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of stored rooms, any status.
    pub async fn room_count(&self) -> usize {
        self.rooms.lock().await.len()
    }
}

impl RoomRepository for InMemoryRoomRepository {
    async fn find_active_by_code(
        &self,
        code: &RoomCode,
    ) -> Result<Option<Room>, RoomError> {
        let rooms = self.rooms.lock().await;
        Ok(rooms
            .values()
            .find(|r| r.room_code == *code && r.status.is_active())
            .cloned())
    }

    async fn find_by_code(
        &self,
        code: &RoomCode,
    ) -> Result<Option<Room>, RoomError> {
        let rooms = self.rooms.lock().await;
        // Newest room wins when a closed room's code has been reused.
        Ok(rooms
            .values()
            .filter(|r| r.room_code == *code)
            .max_by_key(|r| r.id.0)
            .cloned())
    }

    async fn create(&self, mut room: Room) -> Result<Room, RoomError> {
        room.id = RoomId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.rooms.lock().await.insert(room.id, room.clone());
        Ok(room)
    }

    async fn save(&self, room: &Room) -> Result<(), RoomError> {
        self.rooms.lock().await.insert(room.id, room.clone());
        Ok(())
    }

    async fn delete(&self, id: RoomId) -> Result<(), RoomError> {
        self.rooms.lock().await.remove(&id);
        Ok(())
    }
}
