//! Transport event seam
//!
//! The transport layer (WebSocket handler in production, bare channels in
//! tests) drives the relay through this four-method trait, so the core
//! can be exercised without a live network stack.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::connection::Connection;
use crate::core::message::{ChatMessage, ServerEvent};
use crate::core::registry::RoomRegistry;

/// Query parameter carrying the room to auto-join at connect time
pub const QUERY_ROOM: &str = "room";
/// Query parameter carrying the client display name
pub const QUERY_USER: &str = "user";

/// Callbacks the transport layer invokes on the core
#[async_trait]
pub trait SocketEvents: Send + Sync {
    /// A client connected; `query` holds the connect-time parameters
    async fn on_connect(&self, connection: Connection, query: &HashMap<String, String>);

    /// A client asked to join a room
    async fn on_join_request(&self, client_id: &str, room: &str);

    /// A client sent a chat message
    async fn on_message(&self, client_id: &str, message: ChatMessage);

    /// The transport reports the connection closed, for any reason
    async fn on_disconnect(&self, client_id: &str);
}

/// The relay core: owns the room registry and implements the transport
/// event contract over it
pub struct Relay {
    registry: RoomRegistry,
}

impl Relay {
    pub fn new() -> Self {
        Self {
            registry: RoomRegistry::new(),
        }
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }
}

impl Default for Relay {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SocketEvents for Relay {
    async fn on_connect(&self, connection: Connection, query: &HashMap<String, String>) {
        let client_id = connection.id.clone();
        let greeting = ServerEvent::Connected {
            client_id: client_id.clone(),
        };

        match serde_json::to_string(&greeting) {
            Ok(payload) => {
                if let Err(e) = connection.send_text(&payload) {
                    log::warn!("Failed to send greeting: {}", e);
                }
            }
            Err(e) => {
                log::error!("Failed to serialize greeting for {}: {}", client_id, e);
            }
        }

        self.registry.register(connection).await;

        // Auto-join the room named in the connect query, if any
        if let Some(room) = query.get(QUERY_ROOM) {
            if !room.is_empty() {
                self.registry.join(&client_id, room).await;
            }
        }
    }

    async fn on_join_request(&self, client_id: &str, room: &str) {
        self.registry.join(client_id, room).await;
    }

    async fn on_message(&self, client_id: &str, message: ChatMessage) {
        let delivered = self.registry.broadcast(&message).await;
        log::info!(
            "Broadcast message from {} to {} members of room {}",
            client_id,
            delivered,
            message.room
        );
    }

    async fn on_disconnect(&self, client_id: &str) {
        self.registry.leave_all(client_id).await;
    }
}

// Shared reference to the relay core
pub type SharedRelay = Arc<Relay>;

// Create a new shared relay
pub fn create_relay() -> SharedRelay {
    Arc::new(Relay::new())
}
