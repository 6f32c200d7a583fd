pub mod config;
pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod models;
pub mod registry;
pub mod store;
pub mod transport;

pub use config::Config;
pub use dispatcher::NotificationDispatcher;
pub use error::{AppError, Result};
pub use models::{ConnectionId, Notification, NotificationType};
pub use registry::{ConnectionRegistry, GroupRegistry};
pub use store::{NotificationStore, DEFAULT_HISTORY_LIMIT};
pub use transport::{ChannelTransport, NotificationTransport, PushFrame, RECEIVE_NOTIFICATION};
