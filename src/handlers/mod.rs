//! Request handlers for the server endpoints

pub mod health;
pub mod websocket;

use std::collections::HashMap;
use std::convert::Infallible;

use log::info;
use warp::Filter;

use crate::constants::{HEALTH_PATH, WS_PATH};
use crate::core::events::SharedRelay;

// Re-export the handlers
pub use health::health_status;
pub use websocket::handle_ws_client;

/// All relay routes: the WebSocket endpoint and the health check
pub fn routes(
    relay: SharedRelay,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    // WebSocket route; connect query may carry `room` and `user`
    let ws_route = warp::path(WS_PATH)
        .and(warp::ws())
        .and(with_relay(relay.clone()))
        .and(warp::query::<HashMap<String, String>>())
        .map(
            |ws: warp::ws::Ws, relay: SharedRelay, query: HashMap<String, String>| {
                info!("New websocket connection");
                ws.on_upgrade(move |socket| handle_ws_client(socket, relay, query))
            },
        );

    // Health check route
    let health_route = warp::path(HEALTH_PATH)
        .and(with_relay(relay))
        .and_then(health_status);

    ws_route.or(health_route)
}

// Helper function to include the relay state in requests
fn with_relay(relay: SharedRelay) -> impl Filter<Extract = (SharedRelay,), Error = Infallible> + Clone {
    warp::any().map(move || relay.clone())
}
