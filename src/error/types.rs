//! Error types
//!
//! Defines domain-specific error types for each layer of the server. Every
//! error in this module is a transport or environment failure; protocol-level
//! problems (bad command, missing file) never surface here, they are answered
//! with an `ERROR` packet instead.

use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Packet codec errors
#[derive(Debug)]
pub enum PacketError {
    TagTooLong(String),
    InvalidTag(String),
    PayloadTooLarge(usize),
    InvalidLength(u16),
    ConnectionClosed,
    Io(io::Error),
}

impl fmt::Display for PacketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacketError::TagTooLong(tag) => {
                write!(f, "Tag too long ({} bytes, max 8): {}", tag.len(), tag)
            }
            PacketError::InvalidTag(tag) => write!(f, "Tag must be ASCII without NUL bytes: {:?}", tag),
            PacketError::PayloadTooLarge(len) => {
                write!(f, "Payload too large ({} bytes, max 512)", len)
            }
            PacketError::InvalidLength(len) => write!(f, "Invalid packet length field: {}", len),
            PacketError::ConnectionClosed => write!(f, "Connection closed mid-packet"),
            PacketError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for PacketError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PacketError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for PacketError {
    fn from(error: io::Error) -> Self {
        if error.kind() == io::ErrorKind::UnexpectedEof {
            PacketError::ConnectionClosed
        } else {
            PacketError::Io(error)
        }
    }
}

/// Storage module errors
#[derive(Debug)]
pub enum StorageError {
    DirectoryUnreadable(PathBuf, io::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::DirectoryUnreadable(path, e) => {
                write!(f, "Unable to open {}: {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for StorageError {}

/// Transfer module errors
#[derive(Debug)]
pub enum TransferError {
    DataPortMissing,
    ConnectFailed(SocketAddr, io::Error),
    ReadFailed(String, io::Error),
    Packet(PacketError),
    Storage(StorageError),
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::DataPortMissing => {
                write!(f, "Client never announced a usable data port")
            }
            TransferError::ConnectFailed(addr, e) => {
                write!(f, "Failed to open data connection to {}: {}", addr, e)
            }
            TransferError::ReadFailed(name, e) => {
                write!(f, "Read error on {} mid-transfer: {}", name, e)
            }
            TransferError::Packet(e) => write!(f, "Packet error: {}", e),
            TransferError::Storage(e) => write!(f, "Storage error: {}", e),
        }
    }
}

impl std::error::Error for TransferError {}

impl From<PacketError> for TransferError {
    fn from(error: PacketError) -> Self {
        TransferError::Packet(error)
    }
}

impl From<StorageError> for TransferError {
    fn from(error: StorageError) -> Self {
        TransferError::Storage(error)
    }
}

/// Top-level server error; anything reaching the accept loop is fatal
#[derive(Debug)]
pub enum ServerError {
    Config(config::ConfigError),
    Bind(String, io::Error),
    Accept(io::Error),
    Packet(PacketError),
    Transfer(TransferError),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Config(e) => write!(f, "Configuration error: {}", e),
            ServerError::Bind(addr, e) => write!(f, "Failed to bind to {}: {}", addr, e),
            ServerError::Accept(e) => write!(f, "Error accepting connection: {}", e),
            ServerError::Packet(e) => write!(f, "Control connection error: {}", e),
            ServerError::Transfer(e) => write!(f, "Transfer error: {}", e),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<config::ConfigError> for ServerError {
    fn from(error: config::ConfigError) -> Self {
        ServerError::Config(error)
    }
}

impl From<PacketError> for ServerError {
    fn from(error: PacketError) -> Self {
        ServerError::Packet(error)
    }
}

impl From<TransferError> for ServerError {
    fn from(error: TransferError) -> Self {
        ServerError::Transfer(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unexpected_eof_maps_to_connection_closed() {
        let err = PacketError::from(io::Error::new(io::ErrorKind::UnexpectedEof, "eof"));
        assert!(matches!(err, PacketError::ConnectionClosed));

        let err = PacketError::from(io::Error::new(io::ErrorKind::BrokenPipe, "pipe"));
        assert!(matches!(err, PacketError::Io(_)));
    }

    #[test]
    fn server_error_wraps_transfer_error() {
        let err: ServerError = TransferError::DataPortMissing.into();
        assert_eq!(
            err.to_string(),
            "Transfer error: Client never announced a usable data port"
        );
    }
}
