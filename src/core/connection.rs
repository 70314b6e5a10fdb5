//! WebSocket connection management
//! Handles the lifecycle of client connections

use tokio::sync::mpsc;
use warp::ws::Message;

use crate::error::{RelayError, Result};

/// Represents the state of a single WebSocket connection
#[derive(Debug, Clone)]
pub struct Connection {
    pub id: String,
    /// Client-supplied display name, if any
    pub user: Option<String>,
    pub sender: mpsc::UnboundedSender<Message>,
}

impl Connection {
    /// Create a connection with a known ID and optional display name
    pub fn with_id(id: String, user: Option<String>, sender: mpsc::UnboundedSender<Message>) -> Self {
        Self { id, user, sender }
    }

    /// Send a text message through this connection
    ///
    /// Fails if the socket side of the channel is already gone; the
    /// caller logs and moves on.
    pub fn send_text(&self, text: &str) -> Result<()> {
        self.sender
            .send(Message::text(text))
            .map_err(|_| RelayError::ConnectionClosed(self.id.clone()))
    }
}
