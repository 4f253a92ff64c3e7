/**
 * Room and Participant Types
 *
 * Wire-facing data structures for coding rooms: room metadata, participant
 * role grants, and the edit event broadcast on every local change.
 *
 * All field names serialize in camelCase to match the frontend contract
 * (`roomId`, `roomName`, `authorDisplayName`, ...).
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A named, admin-owned collaborative coding session with one shared buffer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Globally unique room identifier
    pub room_id: Uuid,
    /// Human-readable room name
    pub room_name: String,
    /// Identity of the owning admin (verbatim from the identity provider)
    pub admin_id: String,
    /// Declared execution language for the sandbox
    pub language: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Compact room listing entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub room_id: Uuid,
    pub room_name: String,
    pub language: String,
    pub created_at: DateTime<Utc>,
}

/// Participant role within a room
///
/// `Edit` permits publishing edit events and triggering persistence flushes;
/// `View` permits receiving broadcasts and presence updates only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Edit,
    View,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Edit => "edit",
            Role::View => "view",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role string is neither `edit` nor `view`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRole(pub String);

impl fmt::Display for InvalidRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid role: {}", self.0)
    }
}

impl FromStr for Role {
    type Err = InvalidRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "edit" => Ok(Role::Edit),
            "view" => Ok(Role::View),
            other => Err(InvalidRole(other.to_string())),
        }
    }
}

/// A durable (room, user, role) grant, independent of current connectivity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub user_id: String,
    pub role: Role,
}

/// Participant entry enriched for display: resolved name plus live presence
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantInfo {
    pub user_id: String,
    /// Display name resolved through the user directory; `None` when the
    /// lookup degraded to a placeholder
    pub display_name: Option<String>,
    pub role: Role,
    /// Whether at least one connection for this user is currently joined
    pub online: bool,
}

/// Verified identity consumed from the auth collaborator
///
/// Used verbatim for author attribution in edit events and flushes; never
/// re-derived inside this subsystem.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub user_id: String,
    pub display_name: String,
}

/// An edit event broadcast on every accepted local change
///
/// Never persisted itself; only its effect on the buffer is persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EditEvent {
    pub room_id: Uuid,
    pub code: String,
    pub author_display_name: String,
    /// Local wall-clock time at the author, RFC3339
    pub emitted_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!("edit".parse::<Role>().unwrap(), Role::Edit);
        assert_eq!("view".parse::<Role>().unwrap(), Role::View);
        assert_eq!(Role::Edit.as_str(), "edit");
    }

    #[test]
    fn test_role_rejects_unknown() {
        let err = "owner".parse::<Role>().unwrap_err();
        assert_eq!(err, InvalidRole("owner".to_string()));
        assert!(err.to_string().contains("owner"));
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::View).unwrap(), "\"view\"");
        let role: Role = serde_json::from_str("\"edit\"").unwrap();
        assert_eq!(role, Role::Edit);
    }

    #[test]
    fn test_edit_event_wire_names() {
        let event = EditEvent {
            room_id: Uuid::new_v4(),
            code: "x = 1".to_string(),
            author_display_name: "Alice".to_string(),
            emitted_at: "2026-01-01T00:00:00Z".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("roomId").is_some());
        assert!(json.get("authorDisplayName").is_some());
        assert_eq!(json["code"], "x = 1");
    }
}
