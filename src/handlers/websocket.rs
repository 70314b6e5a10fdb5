use std::collections::HashMap;

use futures_util::sink::SinkExt;
use futures_util::stream::StreamExt;
use log::{debug, error, warn};
use tokio::sync::mpsc;
use uuid::Uuid;
use warp::ws::{Message, WebSocket};

use crate::core::connection::Connection;
use crate::core::events::{SharedRelay, SocketEvents, QUERY_USER};
use crate::core::message::ClientEvent;

// Handle a WebSocket connection
pub async fn handle_ws_client(ws: WebSocket, relay: SharedRelay, query: HashMap<String, String>) {
    let (mut ws_tx, mut ws_rx) = ws.split();
    let (tx, rx) = mpsc::unbounded_channel();

    // Spawn a task to forward messages from our channel to the WebSocket
    tokio::task::spawn(async move {
        let mut rx = rx;
        while let Some(message) = rx.recv().await {
            if let Err(e) = ws_tx.send(message).await {
                error!("Failed to send WebSocket message: {}", e);
                break;
            }
        }
    });

    // Generate a unique client ID
    let client_id = Uuid::new_v4().to_string();
    let user = query.get(QUERY_USER).cloned();
    let connection = Connection::with_id(client_id.clone(), user, tx);

    relay.on_connect(connection, &query).await;

    // Handle incoming messages
    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(msg) => {
                // Only process text frames
                if msg.is_text() {
                    process_message(msg, &client_id, &relay).await;
                }
            }
            Err(e) => {
                error!("WebSocket error for client {}: {}", client_id, e);
                break;
            }
        }
    }

    // Client disconnected (voluntary close, network drop, or error):
    // the relay removes it from every room it joined
    relay.on_disconnect(&client_id).await;
}

// Process an incoming WebSocket message
async fn process_message(msg: Message, client_id: &str, relay: &SharedRelay) {
    let msg_str = match msg.to_str() {
        Ok(s) => s,
        Err(_) => {
            warn!("Received non-text frame from client {}", client_id);
            return;
        }
    };

    match ClientEvent::parse(msg_str) {
        Ok(ClientEvent::JoinRoom { room }) => {
            relay.on_join_request(client_id, &room).await;
        }
        Ok(ClientEvent::SendMessage(message)) => {
            debug!("Message from client {} for room {}", client_id, message.room);
            relay.on_message(client_id, message).await;
        }
        Err(e) => {
            warn!("Failed to parse message from client {}: {}", client_id, e);
        }
    }
}
