use crate::network::ConnectionError;
use thiserror::Error;

/// Outcome of a console operation that did not succeed.
#[derive(Debug, Error)]
pub enum RconError {
    /// No session was ever opened, or it has been torn down. Raised before any I/O.
    #[error("Not connected to a server")]
    NoConnection,

    #[error("Transport error: {0}")]
    Transport(#[from] ConnectionError),

    /// The reply arrived but did not confirm the command.
    #[error("Server failed at executing request '{command}' (expected reply containing '{expected}')")]
    Failure { command: String, expected: String },

    /// A command that produces no output was answered with content.
    #[error("Unexpected reply to '{command}': {reply}")]
    UnexpectedReply { command: String, reply: String },
}

impl RconError {
    /// Whether the failure happened below the protocol layer.
    pub fn is_transport(&self) -> bool {
        matches!(self, RconError::Transport(_) | RconError::UnexpectedReply { .. })
    }
}

pub type Result<T> = std::result::Result<T, RconError>;
