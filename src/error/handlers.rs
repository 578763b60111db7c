//! Error handlers
//!
//! Reports fatal errors to the operator and picks the process exit status.

use crate::error::types::ServerError;
use log::error;

/// Exit status for configuration problems, mirroring clap's usage errors
pub const EXIT_CONFIG: u8 = 2;
/// Exit status for transport and I/O failures
pub const EXIT_FATAL: u8 = 1;

/// Handle a fatal server error
pub fn handle_error(err: &ServerError) {
    error!("ftserver: {}", err);
}

/// Convert error to process exit status
pub fn error_to_exit_code(err: &ServerError) -> u8 {
    match err {
        ServerError::Config(_) => EXIT_CONFIG,
        ServerError::Bind(..)
        | ServerError::Accept(_)
        | ServerError::Packet(_)
        | ServerError::Transfer(_) => EXIT_FATAL,
    }
}
