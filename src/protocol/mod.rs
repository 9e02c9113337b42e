pub mod packet;
pub mod wire;

pub use packet::{Packet, PacketKind, LENGTH_PREFIX_SIZE, MIN_PACKET_SIZE};
pub use wire::{
    FramedPacket, WireConfig, WireProtocolError, DEFAULT_CONNECT_TIMEOUT, DEFAULT_MAX_PACKET_SIZE,
    DEFAULT_READ_TIMEOUT, DEFAULT_WRITE_TIMEOUT,
};
