//! Transfer result types
//!
//! Defines the outcome reported by a data-connection transfer.

use std::fmt;

/// How a transfer ended. Only protocol-level outcomes appear here;
/// transport failures are returned as `TransferError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    /// Listing or file content delivered in full
    Completed { packets: usize, bytes: u64 },
    /// Requested file is not in the serving directory
    NotFound,
    /// Requested file is listed but could not be opened
    ReadError,
}

impl TransferOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, TransferOutcome::Completed { .. })
    }
}

impl fmt::Display for TransferOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferOutcome::Completed { packets, bytes } => {
                write!(f, "completed ({} packets, {} bytes)", packets, bytes)
            }
            TransferOutcome::NotFound => write!(f, "file not found"),
            TransferOutcome::ReadError => write!(f, "file could not be opened"),
        }
    }
}
