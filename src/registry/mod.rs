/// Recipient membership tracking
///
/// Two layers share one mechanism:
/// 1. GroupRegistry: named group -> set of connections
/// 2. ConnectionRegistry: live-connection set plus the
///    connection -> user reverse map, with the user's own group kept in
///    sync on connect/disconnect
pub mod connections;
pub mod groups;

pub use connections::ConnectionRegistry;
pub use groups::GroupRegistry;
