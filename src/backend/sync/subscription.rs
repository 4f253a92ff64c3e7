/**
 * Live Room Subscription
 *
 * Server-Sent Events endpoint for a room's live channel
 * (GET /rooms/{room_id}/events). Connecting is the join-room control
 * action: the room actor is opened (performing the one durable buffer read
 * if this is the first connection), the connection is registered with
 * presence, and the first event on the stream is `room-joined` carrying the
 * connection id and the participant snapshot. Everything after that comes
 * from the room's broadcast channel, filtered per connection:
 *
 * - `codeUpdate` events are not echoed back to their originator
 * - targeted events (persist outcomes, the join ack) reach only their
 *   target connection
 *
 * Dropping the stream - explicit leave-room or abrupt transport death -
 * releases the presence entry through a drop guard, so both teardown paths
 * are identical. A client that reconnects gets a fresh connection id and
 * must redo the joining sequence, including re-fetching the buffer.
 */
use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::stream::{self, StreamExt};
use uuid::Uuid;

use crate::backend::error::ApiError;
use crate::backend::middleware::auth::Identity;
use crate::backend::rooms::RoomHandle;
use crate::backend::server::state::AppState;
use crate::shared::{EventKind, RoomEvent};

/// Releases the presence entry when the SSE stream is dropped
struct PresenceGuard {
    handle: RoomHandle,
    connection_id: Uuid,
}

impl Drop for PresenceGuard {
    fn drop(&mut self) {
        tracing::debug!(
            "[Sync] connection {} left room {}",
            self.connection_id,
            self.handle.room_id()
        );
        self.handle.leave(self.connection_id);
    }
}

/// Per-connection delivery filter
///
/// Targeted events reach only their target; code updates are never echoed
/// back to the connection that published them.
pub fn should_deliver(event: &RoomEvent, connection_id: Uuid) -> bool {
    if let Some(target) = event.target {
        return target == connection_id;
    }
    if event.kind == EventKind::CodeUpdate && event.origin == Some(connection_id) {
        return false;
    }
    true
}

/// Subscribe to a room's live channel (GET /rooms/{room_id}/events)
pub async fn room_events(
    State(app_state): State<AppState>,
    Identity(user): Identity,
    Path(room_id): Path<Uuid>,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, axum::Error>>>, ApiError> {
    let handle = app_state.registry.open(room_id).await?;
    let connection_id = Uuid::new_v4();

    // Subscribe before joining so this connection observes its own join
    // broadcast and everything after it.
    let receiver = handle.subscribe().await?;
    let participants = handle.join(connection_id, user.clone()).await?;

    tracing::info!(
        "[Sync] {} joined room {} as connection {}",
        user.user_id,
        room_id,
        connection_id
    );

    let joined = sse_event(&RoomEvent::room_joined(connection_id, &participants))?;
    let guard = PresenceGuard {
        handle,
        connection_id,
    };

    let live = stream::unfold(
        (receiver, connection_id, guard),
        |(mut receiver, connection_id, guard)| async move {
            loop {
                match receiver.recv().await {
                    Ok(event) => {
                        if !should_deliver(&event, connection_id) {
                            continue;
                        }
                        match sse_event(&event) {
                            Ok(sse) => return Some((Ok(sse), (receiver, connection_id, guard))),
                            Err(err) => {
                                tracing::error!("[Sync] failed to encode event: {}", err);
                                continue;
                            }
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        // Last-writer-wins: the next event carries the full
                        // buffer, so a lagging receiver self-heals.
                        tracing::warn!("[Sync] receiver lagged, skipped {} events", skipped);
                        continue;
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        return None;
                    }
                }
            }
        },
    );

    let stream = stream::once(async move { Ok(joined) }).chain(live);
    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

/// Encode a room event as an SSE frame named after its wire kind
fn sse_event(event: &RoomEvent) -> Result<Event, ApiError> {
    let data = serde_json::to_string(event)?;
    Ok(Event::default().event(event.kind.wire_name()).data(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::room::EditEvent;

    fn code_update(origin: Uuid) -> RoomEvent {
        let edit = EditEvent {
            room_id: Uuid::new_v4(),
            code: "x = 1".to_string(),
            author_display_name: "Alice".to_string(),
            emitted_at: "2026-01-01T00:00:00Z".to_string(),
        };
        RoomEvent::code_update(&edit, origin)
    }

    #[test]
    fn test_code_update_not_echoed_to_origin() {
        let origin = Uuid::new_v4();
        let other = Uuid::new_v4();
        let event = code_update(origin);

        assert!(!should_deliver(&event, origin));
        assert!(should_deliver(&event, other));
    }

    #[test]
    fn test_targeted_event_reaches_only_target() {
        let target = Uuid::new_v4();
        let other = Uuid::new_v4();
        let event = RoomEvent::persist_status(target, Ok(()));

        assert!(should_deliver(&event, target));
        assert!(!should_deliver(&event, other));
    }

    #[test]
    fn test_broadcast_event_reaches_everyone() {
        let event = RoomEvent::participants_update(&[]);
        assert!(should_deliver(&event, Uuid::new_v4()));
    }
}
