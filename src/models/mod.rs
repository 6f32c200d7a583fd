use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Severity/kind of a notification
///
/// Closed enumeration, encoded as an integer on the wire so the payload
/// round-trips unchanged between server and client.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(into = "u8", try_from = "u8")]
pub enum NotificationType {
    Info = 0,
    Success = 1,
    Warning = 2,
    Error = 3,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Info => "info",
            NotificationType::Success => "success",
            NotificationType::Warning => "warning",
            NotificationType::Error => "error",
        }
    }
}

impl From<NotificationType> for u8 {
    fn from(kind: NotificationType) -> Self {
        kind as u8
    }
}

impl TryFrom<u8> for NotificationType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, String> {
        match value {
            0 => Ok(NotificationType::Info),
            1 => Ok(NotificationType::Success),
            2 => Ok(NotificationType::Warning),
            3 => Ok(NotificationType::Error),
            other => Err(format!("invalid notification type: {other}")),
        }
    }
}

/// Core notification model
///
/// Field names and order follow the wire contract shared with clients:
/// `{id, title, message, type, targetUrl?, isRead, createdAt, userId?}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique ID, generated at creation
    pub id: String,

    /// Notification title
    pub title: String,

    /// Notification body/message
    pub message: String,

    /// Notification kind
    #[serde(rename = "type")]
    pub kind: NotificationType,

    /// Optional deep-link target
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,

    /// Read status; only ever transitions false -> true
    pub is_read: bool,

    /// Creation timestamp, used for history ordering
    pub created_at: DateTime<Utc>,

    /// Recipient user ID; set only when the notification is stored
    /// against a specific user (direct sends), absent for broadcasts
    /// and group sends
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Notification {
    /// Create a new unread notification with a generated ID
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        kind: NotificationType,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            message: message.into(),
            kind,
            target_url: None,
            is_read: false,
            created_at: Utc::now(),
            user_id: None,
        }
    }

    /// Attach a deep-link target URL
    pub fn with_target_url(mut self, url: impl Into<String>) -> Self {
        self.target_url = Some(url.into());
        self
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Opaque identifier for one live client connection
///
/// Assigned by the transport when the connection is established and
/// never reused for its lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConnectionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ConnectionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
