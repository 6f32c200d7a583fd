use crate::config::Config;
use crate::models::{ConnectionId, Notification};
use crate::registry::{ConnectionRegistry, GroupRegistry};
use crate::store::NotificationStore;
use crate::transport::{NotificationTransport, RECEIVE_NOTIFICATION};
use futures::future::join_all;
use std::sync::Arc;

/// Notification dispatch engine
///
/// Resolves a target (everyone, one user, a named group) to the current
/// connection set, pushes the notification to each connection through
/// the transport, and records user-targeted sends in the bounded
/// history. Owns no sockets: connect/disconnect events and the outbound
/// push both go through the injected transport boundary.
///
/// Delivery is best-effort fan-out. A connection that fails to accept a
/// push is logged and skipped; it never fails the send for the rest of
/// the target set, and no method here reports per-recipient outcomes.
#[derive(Clone)]
pub struct NotificationDispatcher {
    transport: Arc<dyn NotificationTransport>,
    registry: ConnectionRegistry,
    groups: GroupRegistry,
    store: NotificationStore,
}

impl NotificationDispatcher {
    /// Create a dispatcher with fresh state and the default history cap
    pub fn new(transport: Arc<dyn NotificationTransport>) -> Self {
        Self::with_store(transport, NotificationStore::new())
    }

    /// Create a dispatcher configured from the environment
    pub fn from_config(config: &Config, transport: Arc<dyn NotificationTransport>) -> Self {
        Self::with_store(transport, NotificationStore::with_limit(config.history_limit))
    }

    /// Create a dispatcher around an injected store (shared state setups,
    /// tests)
    pub fn with_store(transport: Arc<dyn NotificationTransport>, store: NotificationStore) -> Self {
        let groups = GroupRegistry::new();
        Self {
            transport,
            registry: ConnectionRegistry::new(groups.clone()),
            groups,
            store,
        }
    }

    /// Transport reported a new connection.
    ///
    /// Connections that declare a user id are auto-joined to that user's
    /// group; anonymous connections receive broadcasts and any explicit
    /// groups they join.
    pub fn handle_connect(&self, connection: ConnectionId, user_id: Option<String>) {
        self.registry.connect(connection, user_id);
    }

    /// Transport reported a closed connection.
    pub fn handle_disconnect(&self, connection: &ConnectionId) {
        self.registry.disconnect(connection);
    }

    /// Add a connection to an explicit group
    pub fn join_group(&self, connection: &ConnectionId, group: &str) {
        self.groups.join(connection, group);
    }

    /// Remove a connection from an explicit group
    pub fn leave_group(&self, connection: &ConnectionId, group: &str) {
        self.groups.leave(connection, group);
    }

    /// Push a notification to every live connection.
    ///
    /// Not persisted: broadcasts are live-only by design.
    pub async fn broadcast(&self, notification: Notification) {
        let targets = self.registry.all_connections();
        tracing::info!(targets = targets.len(), "broadcasting notification");
        self.deliver(&targets, &notification).await;
    }

    /// Record a notification for a user and push it to every one of the
    /// user's live connections.
    ///
    /// The store write completes before delivery starts, so a client
    /// that fetches history right after the live push sees the entry.
    /// Zero live connections is fine; the notification still lands in
    /// the history.
    pub async fn send_to_user(&self, user_id: &str, mut notification: Notification) {
        notification.user_id = Some(user_id.to_string());
        self.store.append(user_id, notification.clone());

        let targets = self.registry.connections_for(user_id);
        tracing::info!(
            user_id,
            kind = notification.kind.as_str(),
            targets = targets.len(),
            "sending notification to user"
        );
        self.deliver(&targets, &notification).await;
    }

    /// Push a notification to every member of a named group.
    ///
    /// Never persisted, even when the group name coincides with a user
    /// id: history is for direct personal notifications only.
    pub async fn send_to_group(&self, group: &str, notification: Notification) {
        let targets = self.groups.members_of(group);
        tracing::info!(group, targets = targets.len(), "sending notification to group");
        self.deliver(&targets, &notification).await;
    }

    /// A user's stored notifications, newest first
    pub fn user_notifications(&self, user_id: &str) -> Vec<Notification> {
        self.store.list(user_id)
    }

    /// Mark one stored notification as read; unknown id is a no-op
    pub fn mark_as_read(&self, notification_id: &str) {
        self.store.mark_read(notification_id);
    }

    /// Mark all of a user's stored notifications as read
    pub fn mark_all_as_read(&self, user_id: &str) {
        self.store.mark_all_read(user_id);
    }

    pub fn store(&self) -> &NotificationStore {
        &self.store
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    async fn deliver(&self, targets: &[ConnectionId], notification: &Notification) {
        let sends = targets
            .iter()
            .map(|connection| self.transport.send(connection, RECEIVE_NOTIFICATION, notification));

        for (connection, result) in targets.iter().zip(join_all(sends).await) {
            if let Err(e) = result {
                // Isolated per connection: one dead socket must not
                // stall or fail delivery to the rest.
                tracing::warn!(connection = %connection, error = %e, "notification delivery failed");
            }
        }
    }
}
