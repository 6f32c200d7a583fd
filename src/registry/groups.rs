use crate::models::ConnectionId;
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;

/// Named-group membership
///
/// Maps a group name to the set of connections currently in it. User-id
/// groups (managed by the connection registry on connect/disconnect) and
/// explicit groups (managed by join/leave) share this one mechanism; the
/// only difference is lifecycle.
///
/// The map is sharded per key, so joins and sends against different
/// groups never contend.
#[derive(Default, Clone)]
pub struct GroupRegistry {
    groups: Arc<DashMap<String, HashSet<ConnectionId>>>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection to a group. Joining twice is a no-op.
    pub fn join(&self, connection: &ConnectionId, group: &str) {
        let mut members = self.groups.entry(group.to_string()).or_default();
        if members.insert(connection.clone()) {
            tracing::debug!(
                connection = %connection,
                group,
                members = members.len(),
                "connection joined group"
            );
        }
    }

    /// Remove a connection from a group. Leaving a group the connection
    /// is not in is a no-op, not an error.
    pub fn leave(&self, connection: &ConnectionId, group: &str) {
        let Some(mut members) = self.groups.get_mut(group) else {
            return;
        };
        if members.remove(connection) {
            tracing::debug!(
                connection = %connection,
                group,
                members = members.len(),
                "connection left group"
            );
        }
        let empty = members.is_empty();
        drop(members);

        // Drop empty group entries so ad-hoc group names don't accumulate.
        if empty {
            self.groups.remove_if(group, |_, members| members.is_empty());
        }
    }

    /// Snapshot of the group's members; empty for an unknown group.
    pub fn members_of(&self, group: &str) -> Vec<ConnectionId> {
        self.groups
            .get(group)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of members in a group (for telemetry)
    pub fn member_count(&self, group: &str) -> usize {
        self.groups.get(group).map(|m| m.len()).unwrap_or(0)
    }
}
