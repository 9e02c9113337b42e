pub mod cli;
pub mod config;
pub mod network;
pub mod protocol;
pub mod rcon;

// Re-export key types for easy testing
pub use config::Config;
pub use network::{Connection, ConnectionError, Transport};
pub use rcon::{ArkRcon, ChatMessage, Player, RconError, Reply};
