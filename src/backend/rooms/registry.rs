/**
 * Room Registry
 *
 * Open rooms, one actor handle per room id. Opening a room is the seeding
 * sequence: resolve metadata, load the participant grants, perform the one
 * durable buffer read, then spawn the actor. Reopening after eviction runs
 * the same sequence, which is exactly what a reconnecting client needs -
 * the buffer is re-read, never assumed.
 *
 * Idle rooms (no presence, no subscribers) are evicted by a periodic sweep
 * so abandoned rooms don't hold their buffers in memory forever.
 */
use std::collections::HashMap;
use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::backend::error::ApiError;
use crate::backend::membership;
use crate::backend::persist::store::DocumentStore;
use crate::backend::rooms::actor::{RoomActor, RoomHandle};
use crate::backend::rooms::db;
use crate::shared::room::Participant;

/// Registry of live room actors
pub struct RoomRegistry {
    pool: SqlitePool,
    store: Arc<dyn DocumentStore>,
    event_capacity: usize,
    rooms: Mutex<HashMap<Uuid, RoomHandle>>,
}

impl RoomRegistry {
    pub fn new(pool: SqlitePool, store: Arc<dyn DocumentStore>, event_capacity: usize) -> Self {
        Self {
            pool,
            store,
            event_capacity,
            rooms: Mutex::new(HashMap::new()),
        }
    }

    /// Get the live handle for a room, materializing the actor on first use
    ///
    /// Fails with `NotFound` when no such room exists, and with
    /// `TransientIo` when the one durable read cannot be performed -
    /// seeding an empty buffer on a failed read could let a later flush
    /// revert a previously completed one.
    pub async fn open(&self, room_id: Uuid) -> Result<RoomHandle, ApiError> {
        let mut rooms = self.rooms.lock().await;
        if let Some(handle) = rooms.get(&room_id) {
            if !handle.is_closed() {
                return Ok(handle.clone());
            }
        }

        let room = db::get_room(&self.pool, room_id)
            .await?
            .ok_or_else(|| ApiError::not_found("room"))?;
        let participants = membership::db::list_participants(&self.pool, room_id).await?;
        // The one durable read of the buffer; absent content is the empty
        // document.
        let initial_buffer = self.store.read(room_id).await?.unwrap_or_default();

        tracing::info!(
            "[Room] opened {} ({} participants, {} byte buffer)",
            room_id,
            participants.len(),
            initial_buffer.len()
        );

        let handle = RoomActor::spawn(room, initial_buffer, participants, self.event_capacity);
        rooms.insert(room_id, handle.clone());
        Ok(handle)
    }

    /// The live handle for a room, without materializing it
    pub async fn peek(&self, room_id: Uuid) -> Option<RoomHandle> {
        let rooms = self.rooms.lock().await;
        rooms.get(&room_id).filter(|h| !h.is_closed()).cloned()
    }

    /// Push refreshed membership into the live actor, if the room is open
    ///
    /// No-op for rooms that are not currently live; they reload membership
    /// from the database when next opened.
    pub async fn membership_changed(&self, room_id: Uuid, participants: Vec<Participant>) {
        if let Some(handle) = self.peek(room_id).await {
            handle.set_participants(participants);
        }
    }

    /// Evict rooms with no presence and no subscribers
    ///
    /// Returns the number of evicted rooms.
    pub async fn evict_idle(&self) -> usize {
        let mut rooms = self.rooms.lock().await;
        let mut idle = Vec::new();
        for (room_id, handle) in rooms.iter() {
            if handle.is_closed() || handle.is_idle().await {
                idle.push(*room_id);
            }
        }
        for room_id in &idle {
            rooms.remove(room_id);
            tracing::debug!("[Room] evicted idle room {}", room_id);
        }
        idle.len()
    }

    /// Number of currently open rooms
    pub async fn open_count(&self) -> usize {
        self.rooms.lock().await.len()
    }
}
