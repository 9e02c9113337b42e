use std::fmt;

/// Bytes taken by the id and type fields.
pub const HEADER_SIZE: usize = 8;
/// Body terminator plus the trailing empty string.
pub const TERMINATOR_SIZE: usize = 2;
/// Smallest legal value of the size field (empty body).
pub const MIN_PACKET_SIZE: usize = HEADER_SIZE + TERMINATOR_SIZE;
/// Width of the little-endian size field preceding every packet.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Packet type field of the remote console protocol.
///
/// `EXEC_COMMAND` and `AUTH_RESPONSE` share the value 2; which one is meant
/// depends on the direction of the packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PacketKind(pub i32);

impl PacketKind {
    pub const RESPONSE_VALUE: PacketKind = PacketKind(0);
    pub const EXEC_COMMAND: PacketKind = PacketKind(2);
    pub const AUTH_RESPONSE: PacketKind = PacketKind(2);
    pub const AUTH: PacketKind = PacketKind(3);
}

impl fmt::Display for PacketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => write!(f, "RESPONSE_VALUE"),
            2 => write!(f, "EXEC_COMMAND/AUTH_RESPONSE"),
            3 => write!(f, "AUTH"),
            other => write!(f, "UNKNOWN({})", other),
        }
    }
}

/// A single remote console packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub id: i32,
    pub kind: PacketKind,
    pub body: String,
}

impl Packet {
    pub fn new(id: i32, kind: PacketKind, body: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            body: body.into(),
        }
    }

    pub fn auth(id: i32, password: &str) -> Self {
        Self::new(id, PacketKind::AUTH, password)
    }

    pub fn exec(id: i32, command: &str) -> Self {
        Self::new(id, PacketKind::EXEC_COMMAND, command)
    }

    /// Value written into the size field: everything after the field itself.
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.body.len() + TERMINATOR_SIZE
    }

    /// Encode the packet without its size prefix.
    pub fn encode_payload(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.wire_size());
        out.extend_from_slice(&self.id.to_le_bytes());
        out.extend_from_slice(&self.kind.0.to_le_bytes());
        out.extend_from_slice(self.body.as_bytes());
        out.extend_from_slice(&[0, 0]);
        out
    }

    /// Encode the packet including the size prefix.
    pub fn encode(&self) -> Vec<u8> {
        let payload = self.encode_payload();
        let mut out = Vec::with_capacity(LENGTH_PREFIX_SIZE + payload.len());
        out.extend_from_slice(&(payload.len() as i32).to_le_bytes());
        out.extend_from_slice(&payload);
        out
    }

    /// Decode a payload (the bytes following the size field).
    ///
    /// Returns `None` when the payload is shorter than a packet with an
    /// empty body. Non UTF-8 bytes in the body are replaced, and the
    /// NUL terminators are stripped.
    pub fn decode_payload(payload: &[u8]) -> Option<Self> {
        if payload.len() < MIN_PACKET_SIZE {
            return None;
        }
        let id = i32::from_le_bytes(payload[0..4].try_into().ok()?);
        let kind = PacketKind(i32::from_le_bytes(payload[4..8].try_into().ok()?));
        let raw_body = &payload[HEADER_SIZE..];
        let end = raw_body
            .iter()
            .rposition(|b| *b != 0)
            .map(|pos| pos + 1)
            .unwrap_or(0);
        let body = String::from_utf8_lossy(&raw_body[..end]).into_owned();
        Some(Self { id, kind, body })
    }
}
