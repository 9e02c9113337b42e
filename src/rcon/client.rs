use crate::config::Config;
use crate::network::{Connection, Transport};
use crate::protocol::WireConfig;
use crate::rcon::command::Command;
use crate::rcon::error::{RconError, Result};
use crate::rcon::parser::{parse_chat, parse_players, ChatMessage, Player};
use crate::rcon::reply::{Expectation, Reply};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, trace};

/// Administrative console client for one server.
///
/// Every operation is a single request/reply round trip. Operations are
/// serialized on one session, so the client may be shared between tasks.
pub struct ArkRcon<T = Connection> {
    session: Mutex<Option<T>>,
    address: String,
}

impl ArkRcon<Connection> {
    /// Connect and authenticate using explicit parameters.
    pub async fn open(address: &str, password: &str, wire_config: WireConfig) -> Result<Self> {
        let connection = Connection::open(address, password, wire_config).await?;
        Ok(Self::new(address, connection))
    }

    /// Connect and authenticate using a loaded configuration.
    pub async fn connect(config: &Config) -> Result<Self> {
        Self::open(&config.address, &config.password, config.wire_config()).await
    }
}

impl<T: Transport> ArkRcon<T> {
    pub fn new(address: impl Into<String>, transport: T) -> Self {
        Self {
            session: Mutex::new(Some(transport)),
            address: address.into(),
        }
    }

    /// A client without a session; every operation yields `NoConnection`.
    pub fn disconnected(address: impl Into<String>) -> Self {
        Self {
            session: Mutex::new(None),
            address: address.into(),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub async fn is_connected(&self) -> bool {
        self.session
            .lock()
            .await
            .as_ref()
            .is_some_and(|transport| transport.is_open())
    }

    /// Tear down the session. Later operations yield `NoConnection`.
    pub async fn close(&self) -> Result<()> {
        let transport = self.session.lock().await.take();
        if let Some(mut transport) = transport {
            transport.close().await?;
            info!("Disconnected from {}", self.address);
        }
        Ok(())
    }

    /// Send an arbitrary command and return its reply unclassified.
    pub async fn query(&self, command: &str) -> Result<Reply> {
        self.send(&Command::raw(command)).await
    }

    #[instrument(level = "debug", skip(self), fields(address = %self.address))]
    async fn send(&self, command: &Command) -> Result<Reply> {
        let mut session = self.session.lock().await;
        let transport = match session.as_mut() {
            Some(transport) if transport.is_open() => transport,
            _ => {
                debug!("No open session, not sending");
                return Err(RconError::NoConnection);
            }
        };

        debug!("Sending command");
        let reply = Reply::from_raw(transport.exchange(command.as_str()).await?);
        trace!(reply = ?reply, "Classified reply");
        Ok(reply)
    }

    async fn send_expecting(&self, command: Command, expectation: Expectation) -> Result<()> {
        let reply = self.send(&command).await?;
        expectation.check(command.as_str(), &reply)
    }

    /// Players currently connected, in server order. An empty server yields
    /// an empty list.
    pub async fn list_players(&self) -> Result<Vec<Player>> {
        let reply = self.send(&Command::list_players()).await?;
        Ok(parse_players(reply.text()))
    }

    pub async fn save_world(&self) -> Result<()> {
        self.send_expecting(Command::save_world(), Expectation::contains("World Saved"))
            .await
    }

    /// Ask the server process to save and exit.
    pub async fn request_shutdown(&self) -> Result<()> {
        self.send_expecting(Command::do_exit(), Expectation::contains("Exiting"))
            .await
    }

    pub async fn send_chat_to_player(&self, player: &str, message: &str) -> Result<()> {
        self.send_expecting(
            Command::chat_to_player(player, message),
            Expectation::NoOutput,
        )
        .await
    }

    pub async fn send_chat_to_id(&self, steam64: &str, message: &str) -> Result<()> {
        self.send_expecting(Command::chat_to_id(steam64, message), Expectation::NoOutput)
            .await
    }

    /// Chat lines received since the previous call.
    ///
    /// The server drains its buffer on every call, so this is not idempotent.
    pub async fn get_chat(&self) -> Result<Vec<ChatMessage>> {
        let reply = self.send(&Command::get_chat()).await?;
        Ok(parse_chat(reply.text()))
    }

    /// `time` is passed through unchecked and should be `hh:mm`.
    pub async fn set_time_of_day(&self, time: &str) -> Result<()> {
        self.send_expecting(Command::set_time_of_day(time), Expectation::NoOutput)
            .await
    }

    pub async fn whitelist_player(&self, steam64: &str) -> Result<()> {
        self.send_expecting(
            Command::allow_player(steam64),
            Expectation::contains(format!("{} Allow", steam64)),
        )
        .await
    }

    pub async fn remove_whitelist(&self, steam64: &str) -> Result<()> {
        self.send_expecting(
            Command::disallow_player(steam64),
            Expectation::contains(format!("{} Disallowed", steam64)),
        )
        .await
    }

    pub async fn set_message_of_the_day(&self, motd: &str) -> Result<()> {
        self.send_expecting(
            Command::set_message_of_the_day(motd),
            Expectation::contains("Message of set to"),
        )
        .await
    }

    pub async fn broadcast(&self, message: &str) -> Result<()> {
        self.send_expecting(Command::broadcast(message), Expectation::NoOutput)
            .await
    }

    pub async fn kick_player(&self, steam64: &str) -> Result<()> {
        self.send_expecting(
            Command::kick_player(steam64),
            Expectation::contains(format!("{} Kicked", steam64)),
        )
        .await
    }

    pub async fn ban_player(&self, steam64: &str) -> Result<()> {
        self.send_expecting(
            Command::ban_player(steam64),
            Expectation::contains(format!("{} Banned", steam64)),
        )
        .await
    }

    pub async fn unban_player(&self, steam64: &str) -> Result<()> {
        self.send_expecting(
            Command::unban_player(steam64),
            Expectation::contains(format!("{} Unbanned", steam64)),
        )
        .await
    }

    /// Game speed multiplier; 1 restores normal speed.
    pub async fn slomo(&self, multiplier: i32) -> Result<()> {
        self.send_expecting(Command::slomo(multiplier), Expectation::NoOutput)
            .await
    }

    /// Wild creatures respawn over time.
    pub async fn destroy_wild_dinos(&self) -> Result<()> {
        self.send_expecting(Command::destroy_wild_dinos(), Expectation::NoOutput)
            .await
    }

    /// Like `destroy_wild_dinos`, but tamed creatures die too.
    pub async fn destroy_all_enemies(&self) -> Result<()> {
        self.send_expecting(Command::destroy_all_enemies(), Expectation::NoOutput)
            .await
    }
}
