use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "arkrcon")]
#[command(about = "Remote console client for ARK: Survival Evolved servers")]
pub struct Cli {
    /// Configuration file (defaults to the per-user config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Server address as host:port, overrides config and ARKRCON_ADDRESS
    #[arg(short, long, global = true)]
    pub address: Option<String>,

    /// Admin password, overrides config and ARKRCON_PASSWORD
    #[arg(short, long, global = true)]
    pub password: Option<String>,

    /// Print lists as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List connected players
    Players,

    /// Show chat received since the last query
    ///
    /// The server forgets chat lines once they have been fetched, so
    /// running this twice shows each line only once.
    ///
    /// Examples:
    ///   arkrcon chat
    ///   arkrcon chat --follow --interval 2
    Chat {
        /// Keep polling until interrupted
        #[arg(short, long)]
        follow: bool,
        /// Seconds between polls when following
        #[arg(short, long, default_value_t = 5)]
        interval: u64,
    },

    /// Save the world
    Save,

    /// Shut the server down
    Shutdown,

    /// Send a private server message to a player by name
    SayToPlayer {
        player: String,
        message: String,
    },

    /// Send a private server message to a player by Steam64 id
    SayToId {
        steam64: String,
        message: String,
    },

    /// Set the time of day
    ///
    /// Example: arkrcon time 06:30
    Time {
        /// Time as hh:mm
        time: String,
    },

    /// Manage the join whitelist
    Whitelist {
        #[command(subcommand)]
        command: WhitelistCommand,
    },

    /// Set the message of the day
    Motd {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// Broadcast a message to every player
    Broadcast {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// Kick a player by Steam64 id
    Kick { steam64: String },

    /// Ban a player by Steam64 id
    Ban { steam64: String },

    /// Lift a ban by Steam64 id
    Unban { steam64: String },

    /// Set the game speed multiplier (1 is normal speed)
    Slomo {
        #[arg(allow_negative_numbers = true)]
        multiplier: i32,
    },

    /// Destroy all wild creatures (they respawn over time)
    DestroyWildDinos,

    /// Destroy all creatures, tamed ones included
    DestroyAllEnemies,

    /// Send a raw console command and print the reply
    Exec {
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// Configuration file management
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand)]
pub enum WhitelistCommand {
    /// Allow a Steam64 id to join without checks
    Add { steam64: String },
    /// Remove a Steam64 id from the whitelist
    Remove { steam64: String },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the configuration file path
    Path,
    /// Show the effective configuration (password masked)
    Show,
    /// Write a default configuration file
    Init,
}
