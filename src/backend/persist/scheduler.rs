/**
 * Flush Scheduler
 *
 * Debounced, coalescing persistence of room buffers. Every accepted edit
 * resets a per-(room, session) timer; when the quiet period elapses, the
 * scheduler performs exactly one durable write of the buffer content *at
 * fire time* - intermediate states typed inside the window are never
 * persisted. The outcome is reported back to the originating session only,
 * via a targeted `persist-status` event.
 *
 * A failed flush is not retried here: the buffer stays live-synced, and the
 * next edit's timer attempts to persist the newer content anyway. Retrying
 * out-of-band would race a newer flush.
 */
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::backend::debounce::Debouncer;
use crate::backend::persist::store::DocumentStore;
use crate::backend::rooms::actor::RoomHandle;
use crate::shared::UserIdentity;

/// A pending flush is keyed by (room, session connection)
type FlushKey = (Uuid, Uuid);

/// Debounced writer of room buffers to the durable store
pub struct FlushScheduler {
    debounce: Debouncer<FlushKey>,
    store: Arc<dyn DocumentStore>,
}

impl FlushScheduler {
    /// Create a scheduler flushing through `store` after `quiet_period`
    pub fn new(store: Arc<dyn DocumentStore>, quiet_period: Duration) -> Self {
        Self {
            debounce: Debouncer::new(quiet_period),
            store,
        }
    }

    /// Quiet period before a scheduled flush fires
    pub fn quiet_period(&self) -> Duration {
        self.debounce.window()
    }

    /// The store this scheduler writes through
    pub fn store(&self) -> Arc<dyn DocumentStore> {
        self.store.clone()
    }

    /// Reset the flush timer for (room, session) after an accepted edit
    ///
    /// Cancels any pending flush for the same key and schedules a new one.
    /// When the timer fires, the *current* live buffer is read from the
    /// room actor and written in one atomic replace, tagged with the acting
    /// user; the outcome goes back to the originating connection.
    pub fn schedule_flush(&self, room: RoomHandle, connection_id: Uuid, author: UserIdentity) {
        let store = self.store.clone();
        let key = (room.room_id(), connection_id);

        self.debounce.schedule(key, async move {
            let room_id = room.room_id();
            let content = match room.buffer().await {
                Ok(content) => content,
                Err(err) => {
                    // Room actor went away before the timer fired; nothing
                    // left to persist.
                    tracing::debug!("[Persist] skipped flush for {}: {}", room_id, err);
                    return;
                }
            };

            let result = store.write(room_id, &content, &author.user_id).await;
            match &result {
                Ok(()) => {
                    tracing::debug!(
                        "[Persist] flushed {} bytes for room {} (author {})",
                        content.len(),
                        room_id,
                        author.user_id
                    );
                }
                Err(err) => {
                    tracing::warn!("[Persist] flush failed for room {}: {}", room_id, err);
                }
            }

            room.notify_persisted(connection_id, result.map_err(|e| e.to_string()));
        });
    }

    /// Cancel a pending flush, if any (session teardown)
    pub fn cancel(&self, room_id: Uuid, connection_id: Uuid) -> bool {
        self.debounce.cancel(&(room_id, connection_id))
    }
}
