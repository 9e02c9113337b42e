use crate::network::Transport;
use crate::protocol::{FramedPacket, Packet, PacketKind, WireConfig, WireProtocolError};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info, instrument, trace, warn};

/// Request id the server answers with when the password is wrong.
const AUTH_REJECTED_ID: i32 = -1;

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Failed to connect to {address}: {source}")]
    Connect {
        address: String,
        source: std::io::Error,
    },

    #[error("Connecting to {address} timed out after {timeout:?}")]
    ConnectTimeout { address: String, timeout: Duration },

    #[error("Authentication rejected by {address}")]
    AuthenticationFailed { address: String },

    #[error("Response id {actual} does not match request id {expected}")]
    UnexpectedResponseId { expected: i32, actual: i32 },

    #[error("Unexpected packet type {kind} while {stage}")]
    UnexpectedPacketType {
        kind: PacketKind,
        stage: &'static str,
    },

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Wire protocol error: {0}")]
    WireProtocol(#[from] WireProtocolError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// An authenticated remote console session over a byte stream.
///
/// Any failure while a command is in flight drops the stream: a late reply
/// would otherwise be read as the answer to the next command.
pub struct Connection<S = TcpStream> {
    stream: Option<S>,
    framed: FramedPacket,
    address: String,
    next_id: i32,
}

impl Connection<TcpStream> {
    /// Connect over TCP and authenticate with `password`.
    #[instrument(skip(password, config), fields(connect_timeout = ?config.connect_timeout))]
    pub async fn open(
        address: &str,
        password: &str,
        config: WireConfig,
    ) -> Result<Self, ConnectionError> {
        let stream = match tokio::time::timeout(config.connect_timeout, TcpStream::connect(address))
            .await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => {
                warn!(error = %source, "Failed to connect to {}", address);
                return Err(ConnectionError::Connect {
                    address: address.to_string(),
                    source,
                });
            }
            Err(_elapsed) => {
                warn!("Connecting to {} timed out", address);
                return Err(ConnectionError::ConnectTimeout {
                    address: address.to_string(),
                    timeout: config.connect_timeout,
                });
            }
        };
        stream.set_nodelay(true)?;
        debug!("TCP connection established to {}", address);

        Self::authenticate(stream, address, password, config).await
    }
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Run the password handshake on an already connected stream.
    pub async fn authenticate(
        stream: S,
        address: impl Into<String>,
        password: &str,
        config: WireConfig,
    ) -> Result<Self, ConnectionError> {
        let mut connection = Self {
            stream: Some(stream),
            framed: FramedPacket::new(config),
            address: address.into(),
            next_id: 1,
        };

        let id = connection.next_request_id();
        connection.send(&Packet::auth(id, password)).await?;

        loop {
            let reply = connection.receive().await?;

            // Some servers echo an empty RESPONSE_VALUE before the auth result
            if reply.kind == PacketKind::RESPONSE_VALUE {
                trace!(id = reply.id, "Skipping response value during authentication");
                continue;
            }
            if reply.kind != PacketKind::AUTH_RESPONSE {
                connection.stream = None;
                return Err(ConnectionError::UnexpectedPacketType {
                    kind: reply.kind,
                    stage: "authenticating",
                });
            }
            if reply.id == AUTH_REJECTED_ID {
                warn!("Server {} rejected the password", connection.address);
                connection.stream = None;
                return Err(ConnectionError::AuthenticationFailed {
                    address: connection.address.clone(),
                });
            }
            if reply.id != id {
                connection.stream = None;
                return Err(ConnectionError::UnexpectedResponseId {
                    expected: id,
                    actual: reply.id,
                });
            }
            break;
        }

        info!("Authenticated with {}", connection.address);
        Ok(connection)
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    fn next_request_id(&mut self) -> i32 {
        let id = self.next_id;
        self.next_id = self.next_id.checked_add(1).unwrap_or(1);
        id
    }

    async fn send(&mut self, packet: &Packet) -> Result<(), ConnectionError> {
        let stream = self
            .stream
            .as_mut()
            .ok_or(ConnectionError::ConnectionClosed)?;
        let result = self.framed.write_packet_with_timeout(stream, packet).await;
        if let Err(e) = result {
            warn!(id = packet.id, error = %e, "Failed to write request");
            self.stream = None;
            return Err(e.into());
        }
        Ok(())
    }

    async fn receive(&mut self) -> Result<Packet, ConnectionError> {
        let stream = self
            .stream
            .as_mut()
            .ok_or(ConnectionError::ConnectionClosed)?;
        let result = self.framed.read_packet_with_timeout(stream).await;
        match result {
            Ok(packet) => Ok(packet),
            Err(e) => {
                warn!(error = %e, "Failed to read reply");
                self.stream = None;
                Err(e.into())
            }
        }
    }
}

#[async_trait]
impl<S> Transport for Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    #[instrument(level = "debug", skip(self), fields(address = %self.address))]
    async fn exchange(&mut self, command: &str) -> Result<String, ConnectionError> {
        let id = self.next_request_id();
        self.send(&Packet::exec(id, command)).await?;

        let reply = self.receive().await?;
        if reply.id != id {
            warn!(expected = id, actual = reply.id, "Reply does not answer the request");
            self.stream = None;
            return Err(ConnectionError::UnexpectedResponseId {
                expected: id,
                actual: reply.id,
            });
        }

        trace!(reply = %reply.body, "Received reply");
        Ok(reply.body)
    }

    fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    async fn close(&mut self) -> Result<(), ConnectionError> {
        if let Some(mut stream) = self.stream.take() {
            stream.shutdown().await?;
            info!("Closed connection to {}", self.address);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::io::Builder;

    fn auth_ok(id: i32) -> Vec<u8> {
        Packet::new(id, PacketKind::AUTH_RESPONSE, "").encode()
    }

    #[tokio::test]
    async fn test_authenticate_then_exchange() {
        let stream = Builder::new()
            .write(&Packet::auth(1, "secret").encode())
            .read(&Packet::new(1, PacketKind::RESPONSE_VALUE, "").encode())
            .read(&auth_ok(1))
            .write(&Packet::exec(2, "saveworld").encode())
            .read(&Packet::new(2, PacketKind::RESPONSE_VALUE, "World Saved \n").encode())
            .build();

        let mut connection = Connection::authenticate(stream, "mock", "secret", WireConfig::default())
            .await
            .unwrap();
        assert!(connection.is_open());

        let reply = connection.exchange("saveworld").await.unwrap();
        assert_eq!(reply, "World Saved \n");
    }

    #[tokio::test]
    async fn test_wrong_password_is_rejected() {
        let stream = Builder::new()
            .write(&Packet::auth(1, "wrong").encode())
            .read(&auth_ok(-1))
            .build();

        let result = Connection::authenticate(stream, "mock", "wrong", WireConfig::default()).await;
        assert!(matches!(
            result,
            Err(ConnectionError::AuthenticationFailed { ref address }) if address == "mock"
        ));
    }

    #[tokio::test]
    async fn test_mismatched_reply_id_closes_session() {
        let stream = Builder::new()
            .write(&Packet::auth(1, "secret").encode())
            .read(&auth_ok(1))
            .write(&Packet::exec(2, "listplayers").encode())
            .read(&Packet::new(7, PacketKind::RESPONSE_VALUE, "stale").encode())
            .build();

        let mut connection = Connection::authenticate(stream, "mock", "secret", WireConfig::default())
            .await
            .unwrap();

        let err = connection.exchange("listplayers").await.unwrap_err();
        assert!(matches!(
            err,
            ConnectionError::UnexpectedResponseId { expected: 2, actual: 7 }
        ));
        assert!(!connection.is_open());

        let err = connection.exchange("listplayers").await.unwrap_err();
        assert!(matches!(err, ConnectionError::ConnectionClosed));
    }

    #[tokio::test]
    async fn test_eof_during_exchange_closes_session() {
        let stream = Builder::new()
            .write(&Packet::auth(1, "secret").encode())
            .read(&auth_ok(1))
            .write(&Packet::exec(2, "getchat").encode())
            .build();

        let mut connection = Connection::authenticate(stream, "mock", "secret", WireConfig::default())
            .await
            .unwrap();

        let err = connection.exchange("getchat").await.unwrap_err();
        assert!(matches!(
            err,
            ConnectionError::WireProtocol(WireProtocolError::UnexpectedEof { .. })
        ));
        assert!(!connection.is_open());
    }

    #[tokio::test]
    async fn test_open_unreachable_address() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        drop(listener);

        let result = Connection::open(&address, "secret", WireConfig::default()).await;
        assert!(matches!(result, Err(ConnectionError::Connect { .. })));
    }
}
