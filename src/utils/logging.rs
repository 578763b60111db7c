//! Logging utilities
//!
//! Provides logging setup and configuration.

use env_logger::{Builder, Env};

/// Setup logging for the server; `RUST_LOG` overrides the `info` default
pub fn setup_logging() {
    Builder::from_env(Env::default().default_filter_or("info")).init();
}
