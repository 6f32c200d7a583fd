use crate::error::{AppError, Result};
use crate::models::{ConnectionId, Notification};
use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Event name clients subscribe to for pushed notifications
pub const RECEIVE_NOTIFICATION: &str = "ReceiveNotification";

/// Envelope pushed to a single connection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PushFrame {
    pub event: String,
    pub payload: Notification,
}

/// Capability to push a notification to one live connection
///
/// The dispatcher depends only on this interface; any wire-level push
/// mechanism (WebSocket, server-push stream, long-poll) can sit behind
/// it. Delivery is fire-and-forget: an `Err` means this one connection
/// was unreachable, carries no acknowledgment semantics, and is never
/// escalated past logging by callers.
#[async_trait]
pub trait NotificationTransport: Send + Sync {
    async fn send(
        &self,
        connection: &ConnectionId,
        event: &str,
        payload: &Notification,
    ) -> Result<()>;
}

/// In-process transport backed by per-connection channels
///
/// Each registered connection gets an unbounded sender; the receiving
/// half belongs to whatever owns the wire (a WebSocket session task, a
/// test). Sends never block, so one slow consumer cannot stall fan-out
/// to the rest. A sender whose receiver is gone is dropped on first
/// failed send.
#[derive(Default, Clone)]
pub struct ChannelTransport {
    senders: Arc<DashMap<ConnectionId, UnboundedSender<String>>>,
}

impl ChannelTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection and return the receiving half of its queue
    pub fn register(&self, connection: ConnectionId) -> UnboundedReceiver<String> {
        let (tx, rx) = unbounded_channel();
        self.senders.insert(connection, tx);
        rx
    }

    /// Drop a connection's outbound queue
    pub fn unregister(&self, connection: &ConnectionId) {
        self.senders.remove(connection);
    }
}

#[async_trait]
impl NotificationTransport for ChannelTransport {
    async fn send(
        &self,
        connection: &ConnectionId,
        event: &str,
        payload: &Notification,
    ) -> Result<()> {
        let frame = serde_json::to_string(&PushFrame {
            event: event.to_string(),
            payload: payload.clone(),
        })?;

        let sender = match self.senders.get(connection) {
            Some(entry) => entry.value().clone(),
            None => {
                return Err(AppError::Transport(format!(
                    "unknown connection {connection}"
                )))
            }
        };

        if sender.send(frame).is_err() {
            // Receiver hung up; clean up the dead sender.
            self.senders.remove(connection);
            return Err(AppError::Transport(format!(
                "connection {connection} closed"
            )));
        }
        Ok(())
    }
}
