/**
 * Room Event System
 *
 * This module defines the events broadcast on a room's live channel:
 * code updates, participant/presence changes, join acknowledgements and
 * targeted persistence outcomes.
 *
 * Routing metadata (`origin`, `target`) never leaves the server: `origin`
 * lets the subscription layer suppress echo-back to the author of an edit,
 * `target` restricts an event to a single connection (persistence results
 * go to the originating session only).
 */
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::shared::room::{EditEvent, ParticipantInfo};

/// Kind of room event, named as it appears on the wire
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum EventKind {
    /// Buffer content changed; broadcast to the room minus the sender
    #[serde(rename = "codeUpdate")]
    CodeUpdate,
    /// Membership or presence changed; broadcast to all connections
    #[serde(rename = "participants-update")]
    ParticipantsUpdate,
    /// First event of a subscription: connection id + current snapshot
    #[serde(rename = "room-joined")]
    RoomJoined,
    /// Outcome of a debounced flush, delivered to the originator only
    #[serde(rename = "persist-status")]
    PersistStatus,
}

impl EventKind {
    /// Wire name, used as the SSE event name
    pub fn wire_name(&self) -> &'static str {
        match self {
            EventKind::CodeUpdate => "codeUpdate",
            EventKind::ParticipantsUpdate => "participants-update",
            EventKind::RoomJoined => "room-joined",
            EventKind::PersistStatus => "persist-status",
        }
    }
}

/// A single event on a room's live channel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomEvent {
    /// Type of event
    pub kind: EventKind,
    /// Event payload (JSON-serializable data)
    pub payload: serde_json::Value,
    /// Timestamp when the event was emitted, RFC3339
    pub timestamp: String,
    /// Connection that caused the event; suppressed on that connection's
    /// stream for `CodeUpdate` (no echo-back)
    #[serde(skip)]
    pub origin: Option<Uuid>,
    /// When set, only this connection receives the event
    #[serde(skip)]
    pub target: Option<Uuid>,
}

impl RoomEvent {
    /// Create a new event with no routing metadata
    pub fn new(kind: EventKind, payload: serde_json::Value) -> Self {
        Self {
            kind,
            payload,
            timestamp: now_rfc3339(),
            origin: None,
            target: None,
        }
    }

    /// Create a code update event originating from `origin`
    pub fn code_update(edit: &EditEvent, origin: Uuid) -> Self {
        let payload = serde_json::to_value(edit).unwrap_or_else(|_| json!({}));
        Self {
            origin: Some(origin),
            ..Self::new(EventKind::CodeUpdate, payload)
        }
    }

    /// Create a participants update carrying the full annotated list
    pub fn participants_update(participants: &[ParticipantInfo]) -> Self {
        let payload = json!({
            "participants": participants,
        });
        Self::new(EventKind::ParticipantsUpdate, payload)
    }

    /// Create the join acknowledgement for a new subscription
    pub fn room_joined(connection_id: Uuid, participants: &[ParticipantInfo]) -> Self {
        let payload = json!({
            "connectionId": connection_id,
            "participants": participants,
        });
        Self {
            target: Some(connection_id),
            ..Self::new(EventKind::RoomJoined, payload)
        }
    }

    /// Create a flush outcome event targeted at the originating connection
    pub fn persist_status(target: Uuid, result: Result<(), String>) -> Self {
        let payload = match result {
            Ok(()) => json!({ "ok": true }),
            Err(message) => json!({ "ok": false, "error": message }),
        };
        Self {
            target: Some(target),
            ..Self::new(EventKind::PersistStatus, payload)
        }
    }
}

/// Current timestamp as an RFC3339 string
fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
