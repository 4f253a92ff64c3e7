/**
 * Presence Set
 *
 * Connection-level presence bookkeeping for one room: a map of live
 * connection ids to the identity behind them. Entries exist only for the
 * lifetime of a connection; several entries may map to the same user
 * (multiple tabs or devices). Owned by the room actor, which broadcasts a
 * participants update on every change.
 */
use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::shared::UserIdentity;

/// Live connections of one room
#[derive(Debug, Default)]
pub struct PresenceSet {
    entries: HashMap<Uuid, UserIdentity>,
}

impl PresenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection; idempotent per connection id
    pub fn join(&mut self, connection_id: Uuid, user: UserIdentity) {
        self.entries.insert(connection_id, user);
    }

    /// Remove a connection
    ///
    /// Returns true when the connection was present. Explicit leave and
    /// abrupt transport disconnect both land here.
    pub fn leave(&mut self, connection_id: Uuid) -> bool {
        self.entries.remove(&connection_id).is_some()
    }

    /// Whether any connection for `user_id` is currently joined
    pub fn is_online(&self, user_id: &str) -> bool {
        self.entries.values().any(|u| u.user_id == user_id)
    }

    /// Display name of a joined user, if online
    pub fn display_name(&self, user_id: &str) -> Option<&str> {
        self.entries
            .values()
            .find(|u| u.user_id == user_id)
            .map(|u| u.display_name.as_str())
    }

    /// Distinct user ids currently joined
    pub fn online_user_ids(&self) -> HashSet<&str> {
        self.entries.values().map(|u| u.user_id.as_str()).collect()
    }

    /// Number of live connections
    pub fn connection_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(user_id: &str) -> UserIdentity {
        UserIdentity {
            user_id: user_id.to_string(),
            display_name: user_id.to_uppercase(),
        }
    }

    #[test]
    fn test_join_and_leave() {
        let mut presence = PresenceSet::new();
        let conn = Uuid::new_v4();

        presence.join(conn, identity("alice"));
        assert!(presence.is_online("alice"));
        assert_eq!(presence.connection_count(), 1);

        assert!(presence.leave(conn));
        assert!(!presence.is_online("alice"));
        assert!(presence.is_empty());
        // Leaving twice is a no-op, like a disconnect racing an explicit leave.
        assert!(!presence.leave(conn));
    }

    #[test]
    fn test_multiple_connections_per_user() {
        let mut presence = PresenceSet::new();
        let tab1 = Uuid::new_v4();
        let tab2 = Uuid::new_v4();

        presence.join(tab1, identity("alice"));
        presence.join(tab2, identity("alice"));
        assert_eq!(presence.connection_count(), 2);
        assert_eq!(presence.online_user_ids().len(), 1);

        presence.leave(tab1);
        // Still online through the second tab.
        assert!(presence.is_online("alice"));
    }

    #[test]
    fn test_distinct_users() {
        let mut presence = PresenceSet::new();
        presence.join(Uuid::new_v4(), identity("alice"));
        presence.join(Uuid::new_v4(), identity("bob"));

        let online = presence.online_user_ids();
        assert!(online.contains("alice"));
        assert!(online.contains("bob"));
    }
}
