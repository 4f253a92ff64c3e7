/**
 * Room Actor
 *
 * One task per open room, owning everything live about it: the shared code
 * buffer, the presence set, the cached role grants and the room's broadcast
 * sender. All operations for a room are processed in arrival order on this
 * task; different rooms run on independent tasks. Nothing in the command
 * loop awaits I/O, so one room can never stall another.
 *
 * Handlers talk to the actor through a cloneable `RoomHandle`. Fire-and-
 * forget commands (leave, membership refresh, flush outcomes) use plain
 * sends so they also work from `Drop` implementations; request/response
 * commands pair the send with a oneshot reply.
 */
use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{broadcast, mpsc, oneshot};
use uuid::Uuid;

use crate::backend::error::ApiError;
use crate::backend::presence::PresenceSet;
use crate::shared::room::{EditEvent, Participant, ParticipantInfo, Role, Room, UserIdentity};
use crate::shared::RoomEvent;

/// Result of a publish attempt, decided inside the actor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Content accepted and broadcast; the flush timer should be reset
    Applied,
    /// Content equals the live buffer; dropped to prevent feedback loops
    Unchanged,
    /// The acting identity has no `edit` grant for this room
    Forbidden,
}

/// Commands processed by the room actor, in arrival order
enum RoomCommand {
    Join {
        connection_id: Uuid,
        user: UserIdentity,
        reply: oneshot::Sender<Vec<ParticipantInfo>>,
    },
    Leave {
        connection_id: Uuid,
    },
    Subscribe {
        reply: oneshot::Sender<broadcast::Receiver<RoomEvent>>,
    },
    Publish {
        connection_id: Uuid,
        user: UserIdentity,
        code: String,
        reply: oneshot::Sender<PublishOutcome>,
    },
    Buffer {
        reply: oneshot::Sender<String>,
    },
    Snapshot {
        reply: oneshot::Sender<Vec<ParticipantInfo>>,
    },
    SetParticipants {
        participants: Vec<Participant>,
    },
    Persisted {
        connection_id: Uuid,
        result: Result<(), String>,
    },
    IsIdle {
        reply: oneshot::Sender<bool>,
    },
}

/// Cloneable handle to one room's actor
#[derive(Clone)]
pub struct RoomHandle {
    room: Arc<Room>,
    tx: mpsc::UnboundedSender<RoomCommand>,
}

impl RoomHandle {
    pub fn room(&self) -> &Room {
        &self.room
    }

    pub fn room_id(&self) -> Uuid {
        self.room.room_id
    }

    /// Whether the actor task has terminated
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Register a presence entry and return the participant-with-presence
    /// snapshot; broadcasts `participants-update` to the room
    pub async fn join(
        &self,
        connection_id: Uuid,
        user: UserIdentity,
    ) -> Result<Vec<ParticipantInfo>, ApiError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::Join {
            connection_id,
            user,
            reply,
        })?;
        rx.await.map_err(|_| Self::closed())
    }

    /// Remove a presence entry
    ///
    /// Plain send so abrupt disconnects (drop guards) can issue it; a
    /// closed actor makes this a no-op.
    pub fn leave(&self, connection_id: Uuid) {
        let _ = self.tx.send(RoomCommand::Leave { connection_id });
    }

    /// Subscribe to the room's live event channel
    pub async fn subscribe(&self) -> Result<broadcast::Receiver<RoomEvent>, ApiError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::Subscribe { reply })?;
        rx.await.map_err(|_| Self::closed())
    }

    /// Publish an edit: role gate, last-writer-wins apply, broadcast
    pub async fn publish(
        &self,
        connection_id: Uuid,
        user: UserIdentity,
        code: String,
    ) -> Result<PublishOutcome, ApiError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::Publish {
            connection_id,
            user,
            code,
            reply,
        })?;
        rx.await.map_err(|_| Self::closed())
    }

    /// Current live buffer content
    pub async fn buffer(&self) -> Result<String, ApiError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::Buffer { reply })?;
        rx.await.map_err(|_| Self::closed())
    }

    /// Current participant-with-presence snapshot, without joining
    pub async fn snapshot(&self) -> Result<Vec<ParticipantInfo>, ApiError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::Snapshot { reply })?;
        rx.await.map_err(|_| Self::closed())
    }

    /// Replace the cached role grants and broadcast the updated list
    pub fn set_participants(&self, participants: Vec<Participant>) {
        let _ = self.tx.send(RoomCommand::SetParticipants { participants });
    }

    /// Report a flush outcome to the originating connection
    pub fn notify_persisted(&self, connection_id: Uuid, result: Result<(), String>) {
        let _ = self.tx.send(RoomCommand::Persisted {
            connection_id,
            result,
        });
    }

    /// Whether the room has no presence and no subscribers
    ///
    /// A closed actor counts as idle so the registry can evict it.
    pub async fn is_idle(&self) -> bool {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(RoomCommand::IsIdle { reply }).is_err() {
            return true;
        }
        rx.await.unwrap_or(true)
    }

    fn send(&self, command: RoomCommand) -> Result<(), ApiError> {
        self.tx.send(command).map_err(|_| Self::closed())
    }

    fn closed() -> ApiError {
        ApiError::transient("room actor unavailable")
    }
}

/// The per-room serialized actor
pub struct RoomActor {
    room: Arc<Room>,
    buffer: String,
    presence: PresenceSet,
    roles: HashMap<String, Role>,
    events: broadcast::Sender<RoomEvent>,
    rx: mpsc::UnboundedReceiver<RoomCommand>,
}

impl RoomActor {
    /// Spawn the actor for a room seeded with its persisted buffer and
    /// membership, returning the handle
    pub fn spawn(
        room: Room,
        initial_buffer: String,
        participants: Vec<Participant>,
        event_capacity: usize,
    ) -> RoomHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(event_capacity);
        let room = Arc::new(room);

        let actor = RoomActor {
            room: room.clone(),
            buffer: initial_buffer,
            presence: PresenceSet::new(),
            roles: participants
                .into_iter()
                .map(|p| (p.user_id, p.role))
                .collect(),
            events,
            rx,
        };
        tokio::spawn(actor.run());

        RoomHandle { room, tx }
    }

    async fn run(mut self) {
        tracing::debug!("[Room] actor started for {}", self.room.room_id);
        while let Some(command) = self.rx.recv().await {
            self.handle(command);
        }
        tracing::debug!("[Room] actor stopped for {}", self.room.room_id);
    }

    fn handle(&mut self, command: RoomCommand) {
        match command {
            RoomCommand::Join {
                connection_id,
                user,
                reply,
            } => {
                self.presence.join(connection_id, user);
                let snapshot = self.participant_infos();
                let _ = reply.send(snapshot.clone());
                self.broadcast(RoomEvent::participants_update(&snapshot));
            }
            RoomCommand::Leave { connection_id } => {
                if self.presence.leave(connection_id) {
                    let snapshot = self.participant_infos();
                    self.broadcast(RoomEvent::participants_update(&snapshot));
                }
            }
            RoomCommand::Subscribe { reply } => {
                let _ = reply.send(self.events.subscribe());
            }
            RoomCommand::Publish {
                connection_id,
                user,
                code,
                reply,
            } => {
                let outcome = self.apply_publish(connection_id, &user, code);
                let _ = reply.send(outcome);
            }
            RoomCommand::Buffer { reply } => {
                let _ = reply.send(self.buffer.clone());
            }
            RoomCommand::Snapshot { reply } => {
                let _ = reply.send(self.participant_infos());
            }
            RoomCommand::SetParticipants { participants } => {
                self.roles = participants
                    .into_iter()
                    .map(|p| (p.user_id, p.role))
                    .collect();
                let snapshot = self.participant_infos();
                self.broadcast(RoomEvent::participants_update(&snapshot));
            }
            RoomCommand::Persisted {
                connection_id,
                result,
            } => {
                self.broadcast(RoomEvent::persist_status(connection_id, result));
            }
            RoomCommand::IsIdle { reply } => {
                let idle = self.presence.is_empty() && self.events.receiver_count() == 0;
                let _ = reply.send(idle);
            }
        }
    }

    /// Role gate, identical-content guard, last-writer-wins apply
    fn apply_publish(
        &mut self,
        connection_id: Uuid,
        user: &UserIdentity,
        code: String,
    ) -> PublishOutcome {
        match self.roles.get(&user.user_id) {
            Some(Role::Edit) => {}
            _ => {
                tracing::debug!(
                    "[Room] rejected publish from {} in {}: no edit grant",
                    user.user_id,
                    self.room.room_id
                );
                return PublishOutcome::Forbidden;
            }
        }

        if code == self.buffer {
            // Re-delivered content we already hold; dropping it here breaks
            // the feedback loop.
            return PublishOutcome::Unchanged;
        }

        self.buffer = code.clone();
        let edit = EditEvent {
            room_id: self.room.room_id,
            code,
            author_display_name: user.display_name.clone(),
            emitted_at: Utc::now().to_rfc3339(),
        };
        self.broadcast(RoomEvent::code_update(&edit, connection_id));
        PublishOutcome::Applied
    }

    /// Membership annotated with presence; sorted for stable output
    fn participant_infos(&self) -> Vec<ParticipantInfo> {
        let mut infos: Vec<ParticipantInfo> = self
            .roles
            .iter()
            .map(|(user_id, role)| ParticipantInfo {
                user_id: user_id.clone(),
                display_name: self.presence.display_name(user_id).map(str::to_string),
                role: *role,
                online: self.presence.is_online(user_id),
            })
            .collect();
        infos.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        infos
    }

    fn broadcast(&self, event: RoomEvent) {
        // Ignore if no receivers
        let _ = self.events.send(event);
    }
}
