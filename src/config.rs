//! Server configuration module
//! Handles dynamic configuration parameters for the relay server

use crate::constants::{DEFAULT_ALLOWED_ORIGIN, DEFAULT_HOST, DEFAULT_PORT};
use crate::error::{RelayError, Result};
use std::env;

/// Server configuration parameters
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed to complete the WebSocket handshake (CORS)
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables if available
    ///
    /// Recognized variables:
    /// - `CHAT_RELAY_HOST` (default `0.0.0.0`)
    /// - `CHAT_RELAY_PORT` (default `3030`)
    /// - `CHAT_RELAY_ALLOWED_ORIGINS` — comma-separated origin list
    ///   (default `http://localhost:3000`)
    pub fn from_env() -> Result<Self> {
        let host = env::var("CHAT_RELAY_HOST").unwrap_or(DEFAULT_HOST.to_string());
        let port = match env::var("CHAT_RELAY_PORT") {
            Ok(p) => p.parse().map_err(|_| {
                RelayError::ConfigError(format!("CHAT_RELAY_PORT is not a valid port: {}", p))
            })?,
            Err(_) => DEFAULT_PORT,
        };

        let allowed_origins = env::var("CHAT_RELAY_ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_else(|_| vec![DEFAULT_ALLOWED_ORIGIN.to_string()]);

        if allowed_origins.is_empty() {
            return Err(RelayError::ConfigError(
                "CHAT_RELAY_ALLOWED_ORIGINS is set but contains no origins".to_string(),
            ));
        }

        Ok(Self {
            host,
            port,
            allowed_origins,
        })
    }
}
