use std::net::SocketAddr;

use log::{error, info, warn};
use warp::Filter;

use chat_relay::config::ServerConfig;
use chat_relay::core::events::create_relay;
use chat_relay::handlers;

#[tokio::main]
async fn main() {
    // Initialize env
    match dotenvy::dotenv() {
        Ok(_) => info!("Environment variables loaded from .env file"),
        Err(e) => warn!("Failed to load .env file: {}", e),
    };

    // Initialize logging
    env_logger::init();

    // Load config from the environment
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Configuration: host={}, port={}, allowed origins={:?}",
        config.host, config.port, config.allowed_origins
    );

    // Create the relay core
    let relay = create_relay();

    // CORS for the handshake, restricted to configured origins
    let cors = warp::cors()
        .allow_origins(config.allowed_origins.iter().map(String::as_str))
        .allow_methods(vec!["GET"]);

    let routes = handlers::routes(relay).with(cors);

    // Build the server address
    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Failed to parse server address: {}", e);
            std::process::exit(1);
        }
    };

    // Start the server
    info!("Starting chat relay server on {}", addr);

    warp::serve(routes).run(addr).await;
}
