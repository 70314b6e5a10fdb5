//! Liveness endpoint
//! Pure plumbing: reports process health and the current connection count

use serde::Serialize;

use crate::core::events::SharedRelay;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub connections: usize,
}

/// Build the JSON liveness payload
pub async fn health_status(relay: SharedRelay) -> Result<impl warp::Reply, warp::Rejection> {
    let status = HealthStatus {
        status: "ok",
        connections: relay.registry().connection_count().await,
    };
    Ok(warp::reply::json(&status))
}
