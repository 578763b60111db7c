//! Transfer module
//!
//! Handles the data connection: dialing the client's data port and moving
//! listings or file content across it.

pub mod data_channel;
pub mod file_ops;
pub mod results;

// Re-export key types and functions
pub use data_channel::open_data_connection;
pub use file_ops::run_transfer;
pub use results::TransferOutcome;
