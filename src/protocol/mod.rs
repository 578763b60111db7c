//! Wire protocol implementation
//!
//! Handles packet framing, command parsing and response generation.

pub mod commands;
pub mod packet;
pub mod responses;

pub use commands::{Command, parse_data_port, tags};
pub use packet::{MAX_PAYLOAD_LEN, Packet, read_packet, write_packet};
