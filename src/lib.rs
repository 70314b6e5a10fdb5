//! Chat Relay - A minimal realtime chat relay implemented in Rust
//!
//! Clients connect over WebSockets, join named rooms, and broadcast
//! text messages to every current member of a room.

pub mod config;
pub mod constants;
pub mod core;
pub mod error;
pub mod handlers;

// Re-export main components
pub use config::*;
pub use constants::*;
