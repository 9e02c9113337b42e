use crate::protocol::packet::{Packet, LENGTH_PREFIX_SIZE, MIN_PACKET_SIZE};
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, instrument, trace, warn};

// Wire protocol constants
pub const DEFAULT_MAX_PACKET_SIZE: usize = 64 * 1024; // 64KB, well above the 4KB servers send
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for wire protocol operations including timeouts and packet size limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireConfig {
    pub max_packet_size: usize,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
}

impl Default for WireConfig {
    fn default() -> Self {
        Self {
            max_packet_size: DEFAULT_MAX_PACKET_SIZE,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
        }
    }
}

impl WireConfig {
    /// Create a WireConfig with a single timeout for connect, read and write
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            max_packet_size: DEFAULT_MAX_PACKET_SIZE,
            connect_timeout: timeout,
            read_timeout: timeout,
            write_timeout: timeout,
        }
    }

    /// Create a WireConfig with a custom packet size limit and default timeouts
    pub fn with_max_packet_size(max_packet_size: usize) -> Self {
        Self {
            max_packet_size,
            ..Self::default()
        }
    }
}

/// Errors raised while framing packets on the stream
#[derive(Error, Debug)]
pub enum WireProtocolError {
    #[error("Packet too large: {size} bytes exceeds maximum of {max_size} bytes")]
    PacketTooLarge { size: usize, max_size: usize },

    #[error("Packet too small: {size} bytes is below minimum of {min_size} bytes")]
    PacketTooSmall { size: i64, min_size: usize },

    #[error("Read operation timed out after {timeout:?}")]
    ReadTimeout { timeout: Duration },

    #[error("Write operation timed out after {timeout:?}")]
    WriteTimeout { timeout: Duration },

    #[error("Corrupted data: {reason}")]
    CorruptedData { reason: String },

    #[error("Unexpected end of file while reading {operation}")]
    UnexpectedEof { operation: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads and writes size-prefixed remote console packets
#[derive(Debug, Clone, Default)]
pub struct FramedPacket {
    wire_config: WireConfig,
}

impl FramedPacket {
    pub fn new(wire_config: WireConfig) -> Self {
        Self { wire_config }
    }

    pub fn wire_config(&self) -> &WireConfig {
        &self.wire_config
    }

    /// Validate the size field before any buffer is allocated for the payload
    fn validate_size(&self, size: i32) -> Result<usize, WireProtocolError> {
        if size < MIN_PACKET_SIZE as i32 {
            warn!(size = size, min_size = MIN_PACKET_SIZE, "Packet size is below minimum");
            return Err(WireProtocolError::PacketTooSmall {
                size: size as i64,
                min_size: MIN_PACKET_SIZE,
            });
        }

        let size = size as usize;
        if size > self.wire_config.max_packet_size {
            error!(
                size = size,
                max_size = self.wire_config.max_packet_size,
                "Packet size exceeds maximum allowed size"
            );
            return Err(WireProtocolError::PacketTooLarge {
                size,
                max_size: self.wire_config.max_packet_size,
            });
        }

        Ok(size)
    }

    /// Read until `buffer` is full, reporting EOF against `operation`
    async fn read_exact_or_eof(
        reader: &mut (impl AsyncRead + Unpin),
        buffer: &mut [u8],
        operation: &str,
    ) -> Result<(), WireProtocolError> {
        let mut total_read = 0;

        while total_read < buffer.len() {
            match reader.read(&mut buffer[total_read..]).await {
                Ok(0) => {
                    debug!(
                        total_read = total_read,
                        expected = buffer.len(),
                        "Stream closed while reading {}",
                        operation
                    );
                    return Err(WireProtocolError::UnexpectedEof {
                        operation: operation.to_string(),
                    });
                }
                Ok(read) => {
                    total_read += read;
                    trace!(read = read, total_read = total_read, "Partial read completed");
                }
                Err(e) => {
                    error!(error = %e, total_read = total_read, "Read operation failed");
                    return Err(WireProtocolError::Io(e));
                }
            }
        }

        Ok(())
    }

    #[instrument(level = "debug", skip(self, writer, packet), fields(id = packet.id, kind = %packet.kind))]
    pub async fn write_packet(
        &self,
        writer: &mut (impl AsyncWrite + Unpin),
        packet: &Packet,
    ) -> Result<(), WireProtocolError> {
        if packet.wire_size() > self.wire_config.max_packet_size {
            return Err(WireProtocolError::PacketTooLarge {
                size: packet.wire_size(),
                max_size: self.wire_config.max_packet_size,
            });
        }

        let bytes = packet.encode();
        trace!(bytes = %hex::encode(&bytes[..LENGTH_PREFIX_SIZE + 8]), "Packet header");

        writer.write_all(&bytes).await.map_err(|e| {
            error!(error = %e, size = bytes.len(), "Write operation failed");
            WireProtocolError::Io(e)
        })?;
        writer.flush().await?;

        debug!("Wrote {} byte packet", bytes.len());
        Ok(())
    }

    #[instrument(level = "debug", skip(self, reader))]
    pub async fn read_packet(
        &self,
        reader: &mut (impl AsyncRead + Unpin),
    ) -> Result<Packet, WireProtocolError> {
        let mut length_buffer = [0u8; LENGTH_PREFIX_SIZE];
        Self::read_exact_or_eof(reader, &mut length_buffer, "size field").await?;

        let size = self.validate_size(i32::from_le_bytes(length_buffer))?;

        let mut payload = vec![0u8; size];
        Self::read_exact_or_eof(reader, &mut payload, "packet payload").await?;
        trace!(bytes = %hex::encode(&payload[..8]), "Packet header");

        let packet = Packet::decode_payload(&payload).ok_or_else(|| {
            WireProtocolError::CorruptedData {
                reason: format!("payload of {} bytes could not be decoded", size),
            }
        })?;

        debug!(id = packet.id, kind = %packet.kind, "Read {} byte packet", size);
        Ok(packet)
    }

    /// Read a packet, failing with `ReadTimeout` once the configured read timeout expires
    pub async fn read_packet_with_timeout(
        &self,
        reader: &mut (impl AsyncRead + Unpin),
    ) -> Result<Packet, WireProtocolError> {
        let timeout = self.wire_config.read_timeout;
        match tokio::time::timeout(timeout, self.read_packet(reader)).await {
            Ok(result) => result,
            Err(_elapsed) => {
                error!(timeout = ?timeout, "Read operation timed out");
                Err(WireProtocolError::ReadTimeout { timeout })
            }
        }
    }

    /// Write a packet, failing with `WriteTimeout` once the configured write timeout expires
    pub async fn write_packet_with_timeout(
        &self,
        writer: &mut (impl AsyncWrite + Unpin),
        packet: &Packet,
    ) -> Result<(), WireProtocolError> {
        let timeout = self.wire_config.write_timeout;
        match tokio::time::timeout(timeout, self.write_packet(writer, packet)).await {
            Ok(result) => result,
            Err(_elapsed) => {
                error!(timeout = ?timeout, "Write operation timed out");
                Err(WireProtocolError::WriteTimeout { timeout })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::packet::PacketKind;

    #[tokio::test]
    async fn test_read_packet_from_mock_stream() {
        let reply = Packet::new(4, PacketKind::RESPONSE_VALUE, "World Saved");
        let mut stream = tokio_test::io::Builder::new().read(&reply.encode()).build();

        let packet = FramedPacket::default().read_packet(&mut stream).await.unwrap();
        assert_eq!(packet, reply);
    }

    #[tokio::test]
    async fn test_write_packet_to_mock_stream() {
        let request = Packet::exec(9, "saveworld");
        let mut stream = tokio_test::io::Builder::new().write(&request.encode()).build();

        FramedPacket::default()
            .write_packet(&mut stream, &request)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_oversized_size_field_rejected() {
        let framed = FramedPacket::new(WireConfig::with_max_packet_size(128));
        let mut stream = tokio_test::io::Builder::new()
            .read(&1024i32.to_le_bytes())
            .build();

        let err = framed.read_packet(&mut stream).await.unwrap_err();
        assert!(matches!(
            err,
            WireProtocolError::PacketTooLarge { size: 1024, max_size: 128 }
        ));
    }

    #[tokio::test]
    async fn test_negative_size_field_rejected() {
        let mut stream = tokio_test::io::Builder::new()
            .read(&(-5i32).to_le_bytes())
            .build();

        let err = FramedPacket::default().read_packet(&mut stream).await.unwrap_err();
        assert!(matches!(err, WireProtocolError::PacketTooSmall { size: -5, .. }));
    }

    #[tokio::test]
    async fn test_truncated_payload_reports_eof() {
        let bytes = Packet::exec(1, "listplayers").encode();
        let mut stream = tokio_test::io::Builder::new().read(&bytes[..10]).build();

        let err = FramedPacket::default().read_packet(&mut stream).await.unwrap_err();
        match err {
            WireProtocolError::UnexpectedEof { operation } => {
                assert_eq!(operation, "packet payload")
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_oversized_outgoing_packet_rejected() {
        let framed = FramedPacket::new(WireConfig::with_max_packet_size(16));
        let mut sink = Vec::new();

        let err = framed
            .write_packet(&mut sink, &Packet::exec(1, "broadcast a long message"))
            .await
            .unwrap_err();
        assert!(matches!(err, WireProtocolError::PacketTooLarge { .. }));
        assert!(sink.is_empty());
    }
}
