use crate::network::ConnectionError;
use async_trait::async_trait;

/// An authenticated request/reply channel to the server console.
///
/// Implementations are not expected to tolerate interleaved use: a reply
/// belongs to the command written immediately before it.
#[async_trait]
pub trait Transport: Send {
    /// Send one command and return the single reply it produced.
    async fn exchange(&mut self, command: &str) -> Result<String, ConnectionError>;

    /// Whether the channel can still carry commands.
    fn is_open(&self) -> bool;

    /// Tear the channel down. Closing twice is not an error.
    async fn close(&mut self) -> Result<(), ConnectionError>;
}
