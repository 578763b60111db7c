//! Module `commands`
//!
//! Packet tags and the client commands they carry.

use crate::protocol::packet::Packet;

/// Packet tags understood on the control and data connections.
pub mod tags {
    /// client -> server, payload is the data port as decimal text
    pub const DPORT: &str = "DPORT";
    /// client -> server, directory listing request
    pub const LIST: &str = "LIST";
    /// client -> server, payload is the requested filename
    pub const GET: &str = "GET";
    /// server -> client, command accepted
    pub const ACK: &str = "ACK";
    /// server -> client on control, human-readable message
    pub const ERROR: &str = "ERROR";
    /// server -> client on data, one filename per packet
    pub const FNAME: &str = "FNAME";
    /// server -> client on data, filename announcement then file chunks
    pub const FILE: &str = "FILE";
    /// server -> client on data, end of transfer
    pub const DONE: &str = "DONE";
    /// server -> client on control, end of session
    pub const CLOSE: &str = "CLOSE";
}

/// A validated client command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    LIST,
    GET(String), // Retrieve a file from the serving directory
}

impl Command {
    /// Interprets a command packet. Returns `None` for any tag other than
    /// `LIST` or `GET`.
    ///
    /// A `GET` filename ends at the first NUL in the payload.
    pub fn from_packet(packet: &Packet) -> Option<Self> {
        match packet.tag() {
            tags::LIST => Some(Command::LIST),
            tags::GET => {
                let payload = packet.payload();
                let end = payload.iter().position(|&b| b == 0).unwrap_or(payload.len());
                let name = String::from_utf8_lossy(&payload[..end]).into_owned();
                Some(Command::GET(name))
            }
            _ => None,
        }
    }

    /// Wire tag of the command.
    pub fn tag(&self) -> &'static str {
        match self {
            Command::LIST => tags::LIST,
            Command::GET(_) => tags::GET,
        }
    }

    /// Filename argument, present only for `GET`.
    pub fn filename(&self) -> Option<&str> {
        match self {
            Command::LIST => None,
            Command::GET(name) => Some(name.as_str()),
        }
    }
}

/// Parses a data-port announcement.
///
/// Anything other than a `DPORT` packet with a decimal port in its payload
/// yields `None`.
pub fn parse_data_port(packet: &Packet) -> Option<u16> {
    if packet.tag() != tags::DPORT {
        return None;
    }
    packet
        .payload_str()
        .trim_matches(|c: char| c == '\0' || c.is_whitespace())
        .parse::<u16>()
        .ok()
        .filter(|&port| port != 0)
}
