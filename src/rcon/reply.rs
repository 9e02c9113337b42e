use crate::rcon::error::{RconError, Result};

/// Text the server sends in place of a reply when a command printed nothing.
pub const NO_RESPONSE_SENTINEL: &str = "no response!!";

/// A reply received for exactly one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The server signalled that the command produced no output.
    NoOutput,
    Text(String),
}

impl Reply {
    pub fn from_raw(raw: String) -> Self {
        if raw.contains(NO_RESPONSE_SENTINEL) {
            Reply::NoOutput
        } else {
            Reply::Text(raw)
        }
    }

    pub fn is_no_output(&self) -> bool {
        matches!(self, Reply::NoOutput)
    }

    /// Reply text; empty for `NoOutput`.
    pub fn text(&self) -> &str {
        match self {
            Reply::NoOutput => "",
            Reply::Text(text) => text,
        }
    }
}

/// How a command's reply confirms that the command took effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    /// Only the no-output sentinel is acceptable.
    NoOutput,
    /// The reply must contain this text.
    Contains(String),
}

impl Expectation {
    pub fn contains(expected: impl Into<String>) -> Self {
        Expectation::Contains(expected.into())
    }

    /// Classify `reply` as the answer to `command`.
    pub fn check(&self, command: &str, reply: &Reply) -> Result<()> {
        match (self, reply) {
            (Expectation::NoOutput, Reply::NoOutput) => Ok(()),
            (Expectation::NoOutput, Reply::Text(text)) => Err(RconError::UnexpectedReply {
                command: command.to_string(),
                reply: text.trim_end().to_string(),
            }),
            (Expectation::Contains(expected), reply) => {
                if reply.text().contains(expected.as_str()) {
                    Ok(())
                } else {
                    Err(RconError::Failure {
                        command: command.to_string(),
                        expected: expected.clone(),
                    })
                }
            }
        }
    }
}
