//! Server responses
//!
//! Messages and packet builders for everything the server sends.

use crate::error::PacketError;
use crate::protocol::commands::tags;
use crate::protocol::packet::Packet;

/// Sent when the command tag is neither `LIST` nor `GET`
pub const USAGE: &str = "command usage: -l || -g <FILENAME>";
pub const FILE_NOT_FOUND: &str = "File not found";
pub const FILE_WONT_OPEN: &str = "File wont open";

pub fn ack() -> Result<Packet, PacketError> {
    Packet::empty(tags::ACK)
}

pub fn error(message: &str) -> Result<Packet, PacketError> {
    Packet::new(tags::ERROR, message)
}

pub fn fname(name: &str) -> Result<Packet, PacketError> {
    Packet::new(tags::FNAME, name)
}

/// A `FILE` packet; the first one of a transfer carries the filename, the
/// rest carry content chunks.
pub fn file(payload: &[u8]) -> Result<Packet, PacketError> {
    Packet::new(tags::FILE, payload)
}

pub fn done() -> Result<Packet, PacketError> {
    Packet::empty(tags::DONE)
}

pub fn close() -> Result<Packet, PacketError> {
    Packet::empty(tags::CLOSE)
}
