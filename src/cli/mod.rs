pub mod app;
pub mod commands;
pub mod display;

pub use app::{handle_config, App};
pub use commands::{Cli, Commands, ConfigCommand, WhitelistCommand};
pub use display::{format_chat_line, format_players_table, print_chat, print_players};
