//! Server core functionality
//!
//! This module contains the sequential accept loop and per-session driver.

pub mod core;

pub use core::Server;
