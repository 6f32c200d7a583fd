use crate::models::Notification;
use dashmap::DashMap;
use std::sync::Arc;

/// Default cap on retained notifications per user
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Bounded per-user notification history
///
/// Keeps each user's most recent notifications newest-first, evicting
/// the oldest synchronously inside the append that would exceed the cap.
/// Volatile and best-effort by design: the log exists for catch-up after
/// a live push, not as durable storage.
///
/// Each user's log lives under its own map entry, so appends and reads
/// for different users do not contend.
#[derive(Clone)]
pub struct NotificationStore {
    logs: Arc<DashMap<String, Vec<Notification>>>,
    limit: usize,
}

impl Default for NotificationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// Create a store with a non-default history cap
    pub fn with_limit(limit: usize) -> Self {
        Self {
            logs: Arc::new(DashMap::new()),
            limit,
        }
    }

    /// Insert a notification into a user's log, evicting beyond the cap.
    ///
    /// The log is kept ordered by `created_at` descending; entries with
    /// equal timestamps order by insertion (later insert first), so the
    /// cap always retains the most recent entries. Insert and eviction
    /// happen under the same entry lock.
    pub fn append(&self, user_id: &str, notification: Notification) {
        let mut log = self.logs.entry(user_id.to_string()).or_default();
        let at = log.partition_point(|n| n.created_at > notification.created_at);
        log.insert(at, notification);
        log.truncate(self.limit);
    }

    /// A user's notifications, newest first; empty for an unknown user.
    pub fn list(&self, user_id: &str) -> Vec<Notification> {
        self.logs
            .get(user_id)
            .map(|log| log.value().clone())
            .unwrap_or_default()
    }

    /// Mark a single notification as read by id.
    ///
    /// Scans the (bounded) logs and mutates the first match. An unknown
    /// id is deliberately a no-op: reads race against eviction and
    /// disconnects, and a stale mark must not fail the caller. The scan
    /// is acceptable because each log holds at most `limit` entries.
    pub fn mark_read(&self, notification_id: &str) {
        for mut log in self.logs.iter_mut() {
            if let Some(n) = log
                .value_mut()
                .iter_mut()
                .find(|n| n.id == notification_id)
            {
                n.is_read = true;
                return;
            }
        }
        tracing::debug!(notification_id, "mark_read: id not found, ignoring");
    }

    /// Mark every notification in a user's log as read.
    ///
    /// No-op for an unknown user.
    pub fn mark_all_read(&self, user_id: &str) {
        if let Some(mut log) = self.logs.get_mut(user_id) {
            for n in log.iter_mut() {
                n.is_read = true;
            }
        }
    }

    /// Number of unread notifications for a user (badge count)
    pub fn unread_count(&self, user_id: &str) -> usize {
        self.logs
            .get(user_id)
            .map(|log| log.iter().filter(|n| !n.is_read).count())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationType;
    use chrono::{Duration, Utc};

    fn notification(title: &str) -> Notification {
        Notification::new(title, "body", NotificationType::Info)
    }

    #[test]
    fn test_list_newest_first() {
        let store = NotificationStore::new();
        let base = Utc::now();

        for i in 0..3i64 {
            let mut n = notification(&format!("n{i}"));
            n.created_at = base + Duration::seconds(i);
            store.append("alice", n);
        }

        let log = store.list("alice");
        assert_eq!(log.len(), 3);
        assert_eq!(log[0].title, "n2");
        assert_eq!(log[2].title, "n0");
    }

    #[test]
    fn test_eviction_keeps_fifty_most_recent() {
        let store = NotificationStore::new();
        let base = Utc::now();

        for i in 0..51i64 {
            let mut n = notification(&format!("n{i}"));
            n.created_at = base + Duration::seconds(i);
            store.append("alice", n);
        }

        let log = store.list("alice");
        assert_eq!(log.len(), 50);
        assert_eq!(log[0].title, "n50");
        assert_eq!(log[49].title, "n1");
        assert!(!log.iter().any(|n| n.title == "n0"));
    }

    #[test]
    fn test_out_of_order_append_keeps_ordering() {
        let store = NotificationStore::new();
        let base = Utc::now();

        let mut newer = notification("newer");
        newer.created_at = base + Duration::seconds(10);
        let mut older = notification("older");
        older.created_at = base;

        store.append("alice", newer);
        store.append("alice", older);

        let log = store.list("alice");
        assert_eq!(log[0].title, "newer");
        assert_eq!(log[1].title, "older");
    }

    #[test]
    fn test_timestamp_ties_broken_by_insertion() {
        let store = NotificationStore::with_limit(2);
        let at = Utc::now();

        for title in ["first", "second", "third"] {
            let mut n = notification(title);
            n.created_at = at;
            store.append("alice", n);
        }

        let log = store.list("alice");
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].title, "third");
        assert_eq!(log[1].title, "second");
    }

    #[test]
    fn test_list_unknown_user_is_empty() {
        let store = NotificationStore::new();
        assert!(store.list("nobody").is_empty());
    }

    #[test]
    fn test_mark_read_first_match_only() {
        let store = NotificationStore::new();
        let n = notification("hello");
        let id = n.id.clone();
        store.append("alice", n);
        store.append("alice", notification("other"));

        store.mark_read(&id);

        let log = store.list("alice");
        let target = log.iter().find(|n| n.id == id).unwrap();
        assert!(target.is_read);
        assert!(log.iter().filter(|n| n.is_read).count() == 1);
    }

    #[test]
    fn test_mark_read_is_idempotent() {
        let store = NotificationStore::new();
        let n = notification("hello");
        let id = n.id.clone();
        store.append("alice", n);

        store.mark_read(&id);
        let after_once = store.list("alice");
        store.mark_read(&id);
        let after_twice = store.list("alice");

        assert_eq!(after_once, after_twice);
    }

    #[test]
    fn test_mark_read_unknown_id_is_noop() {
        let store = NotificationStore::new();
        store.append("alice", notification("hello"));

        store.mark_read("no-such-id");

        assert!(store.list("alice").iter().all(|n| !n.is_read));
    }

    #[test]
    fn test_mark_all_read() {
        let store = NotificationStore::new();
        for i in 0..5 {
            store.append("alice", notification(&format!("n{i}")));
        }

        store.mark_all_read("alice");
        assert!(store.list("alice").iter().all(|n| n.is_read));
        assert_eq!(store.unread_count("alice"), 0);

        // Unknown user is a no-op
        store.mark_all_read("nobody");
    }

    #[test]
    fn test_unread_count() {
        let store = NotificationStore::new();
        let n = notification("a");
        let id = n.id.clone();
        store.append("alice", n);
        store.append("alice", notification("b"));

        assert_eq!(store.unread_count("alice"), 2);
        store.mark_read(&id);
        assert_eq!(store.unread_count("alice"), 1);
        assert_eq!(store.unread_count("nobody"), 0);
    }

    #[tokio::test]
    async fn test_concurrent_append_and_mark_all_read() {
        let store = NotificationStore::new();
        let mut handles = Vec::new();

        for i in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.append("alice", notification(&format!("n{i}")));
            }));
        }
        for _ in 0..5 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.mark_all_read("alice");
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // No lost appends, no mid-truncation reads
        assert_eq!(store.list("alice").len(), 20);
    }
}
