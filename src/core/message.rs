use serde::{Deserialize, Serialize};

use crate::error::{RelayError, Result};

/// A chat message as it travels through the relay.
///
/// Every field is an opaque, client-supplied string. The relay never
/// generates, validates, or reformats any of them; empty text, a missing
/// user, or a malformed timestamp are all forwarded as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub room: String,
    #[serde(default)]
    pub time: String,
}

/// Events a client may send over the socket
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientEvent {
    JoinRoom { room: String },
    SendMessage(ChatMessage),
}

impl ClientEvent {
    /// Parse an inbound text frame into a client event
    pub fn parse(input: &str) -> Result<Self> {
        serde_json::from_str(input).map_err(|e| RelayError::MessageParseError(e.to_string()))
    }
}

/// Events the relay pushes to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerEvent {
    #[serde(rename_all = "camelCase")]
    Connected { client_id: String },
    ReceiveMessage(ChatMessage),
}
