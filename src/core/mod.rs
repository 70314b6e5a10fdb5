//! Core functionality for the chat relay

pub mod connection;
pub mod events;
pub mod message;
pub mod registry;

// Re-export main components for convenience
pub use connection::Connection;
pub use events::{create_relay, Relay, SharedRelay, SocketEvents};
pub use message::{ChatMessage, ClientEvent, ServerEvent};
pub use registry::RoomRegistry;
