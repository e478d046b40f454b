//! Broadcaster seam: the real-time pub/sub channel.
//!
//! The concrete provider is an external collaborator; the core only
//! needs `publish(room_code, event)`. The actor publishes after every
//! committed mutation, so per-channel event order follows commit order.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

use tokio::sync::broadcast;

use quizroom_protocol::RoomCode;
use quizroom_room::RoomError;

use crate::RoomEvent;

/// Publishes room events to a channel keyed by room code.
///
/// The returned future is `Send` so the room actors can await it from
/// spawned tasks; implementations just write `async fn`.
pub trait Broadcaster: Send + Sync + 'static {
    /// Delivers `event` to all subscribers of the room's channel.
    ///
    /// Delivery guarantees beyond "eventually, in publish order" are
    /// the provider's concern.
    fn publish(
        &self,
        channel: &RoomCode,
        event: RoomEvent,
    ) -> impl Future<Output = Result<(), RoomError>> + Send;
}

/// In-process broadcaster over `tokio::sync::broadcast` channels, one
/// per room code. Used by tests and the demo; production swaps in a
/// provider-backed implementation.
#[derive(Debug)]
pub struct ChannelBroadcaster {
    channels: Mutex<HashMap<RoomCode, broadcast::Sender<RoomEvent>>>,
    capacity: usize,
}

impl ChannelBroadcaster {
    /// Creates a broadcaster whose per-room channels buffer up to
    /// `capacity` events.
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
            capacity,
        }
    }

    /// Subscribes to a room's channel, creating it if needed.
    ///
    /// Events published before the subscription are not replayed.
    pub fn subscribe(
        &self,
        channel: &RoomCode,
    ) -> broadcast::Receiver<RoomEvent> {
        self.sender(channel).subscribe()
    }

    fn sender(&self, channel: &RoomCode) -> broadcast::Sender<RoomEvent> {
        let mut channels =
            self.channels.lock().expect("broadcast lock poisoned");
        channels
            .entry(channel.clone())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }
}

impl Default for ChannelBroadcaster {
    fn default() -> Self {
        Self::new(64)
    }
}

impl Broadcaster for ChannelBroadcaster {
    async fn publish(
        &self,
        channel: &RoomCode,
        event: RoomEvent,
    ) -> Result<(), RoomError> {
        // A send with no live subscribers is not a failure; the event
        // simply has no audience yet.
        let _ = self.sender(channel).send(event);
        Ok(())
    }
}
