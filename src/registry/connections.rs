use super::GroupRegistry;
use crate::models::ConnectionId;
use dashmap::{DashMap, DashSet};
use std::sync::Arc;

/// Connection registry
///
/// Tracks every live connection (for broadcasts), which user each
/// connection belongs to, and keeps the user's own notification group
/// populated: connecting with a user id auto-joins the group named after
/// it, disconnecting auto-leaves it. A connection maps to at most one
/// user for its lifetime.
///
/// Connect/disconnect for a given connection arrive serialized from its
/// lifecycle context; operations on different connections touch disjoint
/// keys and run without shared locking.
#[derive(Default, Clone)]
pub struct ConnectionRegistry {
    groups: GroupRegistry,
    /// Every currently live connection, with or without a user
    live: Arc<DashSet<ConnectionId>>,
    /// Reverse map: connection -> owning user id
    owners: Arc<DashMap<ConnectionId, String>>,
}

impl ConnectionRegistry {
    /// Create a registry that manages user-id groups in `groups`
    pub fn new(groups: GroupRegistry) -> Self {
        Self {
            groups,
            live: Arc::new(DashSet::new()),
            owners: Arc::new(DashMap::new()),
        }
    }

    /// Register a connection, optionally owned by a user.
    ///
    /// A second connect for the same id is a transport contract
    /// violation; it is treated as an overwrite so state stays
    /// consistent either way.
    pub fn connect(&self, connection: ConnectionId, user_id: Option<String>) {
        self.live.insert(connection.clone());

        let Some(user_id) = user_id else {
            tracing::debug!(connection = %connection, "anonymous connection registered");
            return;
        };

        if let Some(previous) = self.owners.insert(connection.clone(), user_id.clone()) {
            if previous != user_id {
                self.groups.leave(&connection, &previous);
            }
        }
        self.groups.join(&connection, &user_id);

        tracing::debug!(
            connection = %connection,
            user_id,
            "connection registered"
        );
    }

    /// Remove a connection and its user mapping.
    ///
    /// No-op if the connection is unknown or carries no user.
    pub fn disconnect(&self, connection: &ConnectionId) {
        self.live.remove(connection);

        if let Some((_, user_id)) = self.owners.remove(connection) {
            self.groups.leave(connection, &user_id);
            tracing::debug!(connection = %connection, user_id, "connection unregistered");
        } else {
            tracing::debug!(connection = %connection, "anonymous connection unregistered");
        }
    }

    /// All live connections for a user; empty for an unknown user.
    pub fn connections_for(&self, user_id: &str) -> Vec<ConnectionId> {
        self.groups.members_of(user_id)
    }

    /// The user owning a connection, if it declared one at connect time.
    pub fn user_of(&self, connection: &ConnectionId) -> Option<String> {
        self.owners.get(connection).map(|entry| entry.value().clone())
    }

    /// Snapshot of every live connection, regardless of user or group.
    pub fn all_connections(&self) -> Vec<ConnectionId> {
        self.live.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Number of live connections for a user
    pub fn connection_count(&self, user_id: &str) -> usize {
        self.groups.member_count(user_id)
    }

    /// Total number of live connections
    pub fn total_connections(&self) -> usize {
        self.live.len()
    }
}
