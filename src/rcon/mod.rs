pub mod client;
pub mod command;
pub mod error;
pub mod parser;
pub mod reply;

pub use client::ArkRcon;
pub use command::Command;
pub use error::RconError;
pub use parser::{parse_chat, parse_players, ChatMessage, Player};
pub use reply::{Expectation, Reply, NO_RESPONSE_SENTINEL};
