use crate::cli::commands::{Commands, ConfigCommand, WhitelistCommand};
use crate::cli::display::{print_chat, print_players};
use crate::config::Config;
use crate::network::{Connection, Transport};
use crate::rcon::{ArkRcon, Reply};
use anyhow::{bail, Context, Result};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Runs console subcommands against one connected server
pub struct App<T = Connection> {
    client: ArkRcon<T>,
    json: bool,
}

impl App<Connection> {
    /// Connect and authenticate using the resolved configuration
    pub async fn connect(config: &Config, json: bool) -> Result<Self> {
        if config.password.is_empty() {
            debug!("No password configured for {}", config.address);
        }
        let client = ArkRcon::connect(config)
            .await
            .with_context(|| format!("Failed to connect to {}", config.address))?;
        Ok(Self::with_client(client, json))
    }
}

impl<T: Transport> App<T> {
    pub fn with_client(client: ArkRcon<T>, json: bool) -> Self {
        Self { client, json }
    }

    pub fn client(&self) -> &ArkRcon<T> {
        &self.client
    }

    /// Execute one subcommand. `Config` subcommands are handled by `handle_config`.
    pub async fn run(&self, command: Commands) -> Result<()> {
        let client = &self.client;
        match command {
            Commands::Players => {
                let players = client.list_players().await?;
                print_players(&players, self.json)?;
            }
            Commands::Chat { follow: false, .. } => {
                let messages = client.get_chat().await?;
                print_chat(&messages, self.json)?;
            }
            Commands::Chat {
                follow: true,
                interval,
            } => {
                self.follow_chat(Duration::from_secs(interval.max(1))).await?;
            }
            Commands::Save => {
                client.save_world().await?;
                println!("World saved.");
            }
            Commands::Shutdown => {
                client.request_shutdown().await?;
                println!("Server is exiting.");
            }
            Commands::SayToPlayer { player, message } => {
                client.send_chat_to_player(&player, &message).await?;
                println!("Message sent to {}.", player);
            }
            Commands::SayToId { steam64, message } => {
                client.send_chat_to_id(&steam64, &message).await?;
                println!("Message sent to {}.", steam64);
            }
            Commands::Time { time } => {
                client.set_time_of_day(&time).await?;
                println!("Time of day set to {}.", time);
            }
            Commands::Whitelist {
                command: WhitelistCommand::Add { steam64 },
            } => {
                client.whitelist_player(&steam64).await?;
                println!("{} added to the whitelist.", steam64);
            }
            Commands::Whitelist {
                command: WhitelistCommand::Remove { steam64 },
            } => {
                client.remove_whitelist(&steam64).await?;
                println!("{} removed from the whitelist.", steam64);
            }
            Commands::Motd { message } => {
                client.set_message_of_the_day(&message.join(" ")).await?;
                println!("Message of the day set.");
            }
            Commands::Broadcast { message } => {
                client.broadcast(&message.join(" ")).await?;
                println!("Broadcast sent.");
            }
            Commands::Kick { steam64 } => {
                client.kick_player(&steam64).await?;
                println!("{} kicked.", steam64);
            }
            Commands::Ban { steam64 } => {
                client.ban_player(&steam64).await?;
                println!("{} banned.", steam64);
            }
            Commands::Unban { steam64 } => {
                client.unban_player(&steam64).await?;
                println!("{} unbanned.", steam64);
            }
            Commands::Slomo { multiplier } => {
                client.slomo(multiplier).await?;
                println!("Speed multiplier set to {}.", multiplier);
            }
            Commands::DestroyWildDinos => {
                client.destroy_wild_dinos().await?;
                println!("Wild creatures destroyed.");
            }
            Commands::DestroyAllEnemies => {
                client.destroy_all_enemies().await?;
                println!("All creatures destroyed.");
            }
            Commands::Exec { command } => match client.query(&command.join(" ")).await? {
                Reply::NoOutput => println!("(no output)"),
                Reply::Text(text) => println!("{}", text.trim_end()),
            },
            Commands::Config { .. } => bail!("config commands do not need a server connection"),
        }
        Ok(())
    }

    /// Poll `getchat` until Ctrl-C, printing each new line once.
    async fn follow_chat(&self, interval: Duration) -> Result<()> {
        info!("Following chat on {} every {:?}", self.client.address(), interval);
        let mut ticker = tokio::time::interval(interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let messages = self.client.get_chat().await?;
                    print_chat(&messages, self.json)?;
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted, stopping chat follow");
                    return Ok(());
                }
            }
        }
    }

    pub async fn close(&self) -> Result<()> {
        self.client.close().await.context("Failed to close connection")
    }
}

/// Handle `config` subcommands; `path` is the `--config` override, if any.
pub fn handle_config(command: ConfigCommand, path: Option<&Path>, config: &Config) -> Result<()> {
    let config_file = match path {
        Some(path) => path.to_path_buf(),
        None => Config::default_config_file()?,
    };

    match command {
        ConfigCommand::Path => {
            println!("{}", config_file.display());
            if !config_file.exists() {
                println!("(file does not exist, defaults are in use)");
            }
        }
        ConfigCommand::Show => {
            println!("address              = {}", config.address);
            println!("password             = {}", config.masked_password());
            println!("connect_timeout_secs = {}", config.connect_timeout_secs);
            println!("read_timeout_secs    = {}", config.read_timeout_secs);
            println!("write_timeout_secs   = {}", config.write_timeout_secs);
        }
        ConfigCommand::Init => {
            if config_file.exists() {
                bail!(
                    "Configuration file already exists at {}",
                    config_file.display()
                );
            }
            Config::default().save_to(&config_file)?;
            println!("Wrote default configuration to {}", config_file.display());
        }
    }
    Ok(())
}
