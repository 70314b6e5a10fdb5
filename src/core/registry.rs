//! Room registry and broadcaster
//!
//! Tracks which connections have joined which rooms and fans incoming
//! messages out to every current member of the destination room. Rooms
//! are implicit: a room exists exactly while its member set is non-empty,
//! and the registry drops the entry once the last member leaves.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::core::connection::Connection;
use crate::core::message::{ChatMessage, ServerEvent};

/// Mutable registry state, guarded by a single lock so that a broadcast
/// never observes a half-updated member set for any room.
#[derive(Default)]
struct RegistryState {
    /// Connected clients by ID
    connections: HashMap<String, Connection>,
    /// Room key -> set of member connection IDs
    rooms: HashMap<String, HashSet<String>>,
    /// Connection ID -> set of room keys the client has joined
    client_rooms: HashMap<String, HashSet<String>>,
}

/// Manages room membership and message fan-out for the relay
pub struct RoomRegistry {
    state: Arc<RwLock<RegistryState>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(RegistryState::default())),
        }
    }

    /// Register a new client connection
    pub async fn register(&self, connection: Connection) {
        let mut state = self.state.write().await;
        match &connection.user {
            Some(user) => log::info!("Client connected: {} ({})", connection.id, user),
            None => log::info!("Client connected: {}", connection.id),
        }
        state.connections.insert(connection.id.clone(), connection);
        log::info!("Current connections: {}", state.connections.len());
    }

    /// Add a client to a room
    ///
    /// An empty room key is a no-op so that no room ever exists under the
    /// empty string. Joining a room twice is also a no-op. Unknown client
    /// IDs are ignored; there is no room to put a dead connection in.
    pub async fn join(&self, client_id: &str, room: &str) {
        if room.is_empty() {
            log::debug!("Ignoring join with empty room key from {}", client_id);
            return;
        }

        let mut state = self.state.write().await;
        if !state.connections.contains_key(client_id) {
            log::debug!("Ignoring join from unknown client {}", client_id);
            return;
        }

        state
            .rooms
            .entry(room.to_string())
            .or_insert_with(HashSet::new)
            .insert(client_id.to_string());
        state
            .client_rooms
            .entry(client_id.to_string())
            .or_insert_with(HashSet::new)
            .insert(room.to_string());

        log::info!("Client {} joined room {}", client_id, room);
    }

    /// Remove a client from every room it belongs to and forget its
    /// connection. Invoked once when the transport reports a disconnect,
    /// whatever the reason. Safe to call for IDs that were never
    /// registered or were already removed.
    pub async fn leave_all(&self, client_id: &str) {
        let mut state = self.state.write().await;

        if let Some(joined) = state.client_rooms.remove(client_id) {
            for room in joined {
                if let Some(members) = state.rooms.get_mut(&room) {
                    members.remove(client_id);
                    if members.is_empty() {
                        state.rooms.remove(&room);
                    }
                }
            }
        }

        if state.connections.remove(client_id).is_some() {
            log::info!("Client disconnected: {}", client_id);
            log::info!("Current connections: {}", state.connections.len());
        }
    }

    /// Deliver a message to every current member of its destination room,
    /// the sender included. Returns the number of successful deliveries.
    ///
    /// A room with no members is a silent no-op. A failed send to one
    /// member (socket already gone) is logged and skipped without
    /// affecting delivery to the rest.
    pub async fn broadcast(&self, message: &ChatMessage) -> usize {
        let event = ServerEvent::ReceiveMessage(message.clone());
        let payload = match serde_json::to_string(&event) {
            Ok(payload) => payload,
            Err(e) => {
                log::error!("Failed to serialize message for room {}: {}", message.room, e);
                return 0;
            }
        };

        // Hold the write lock across the whole fan-out: overlapping
        // broadcasts are serialized, so pushes into each member's
        // channel happen in a single broadcast order and per-room FIFO
        // holds even on a multithreaded runtime.
        let state = self.state.write().await;
        let members = match state.rooms.get(&message.room) {
            Some(members) => members,
            None => {
                log::trace!("Broadcast to empty room {}, nothing to do", message.room);
                return 0;
            }
        };

        let mut sent = 0;
        for member_id in members {
            if let Some(connection) = state.connections.get(member_id) {
                match connection.send_text(&payload) {
                    Ok(_) => sent += 1,
                    Err(e) => log::warn!("Skipping member of room {}: {}", message.room, e),
                }
            }
        }

        log::debug!("Broadcast message to {} members of room {}", sent, message.room);
        sent
    }

    /// Current members of a room (empty if the room does not exist)
    pub async fn room_members(&self, room: &str) -> Vec<String> {
        self.state
            .read()
            .await
            .rooms
            .get(room)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Rooms a client has joined
    pub async fn client_rooms(&self, client_id: &str) -> Vec<String> {
        self.state
            .read()
            .await
            .client_rooms
            .get(client_id)
            .map(|rooms| rooms.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of rooms with at least one member
    pub async fn room_count(&self) -> usize {
        self.state.read().await.rooms.len()
    }

    /// Number of connected clients
    pub async fn connection_count(&self) -> usize {
        self.state.read().await.connections.len()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}
