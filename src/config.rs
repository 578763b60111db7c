//! Configuration management for ftserver
//!
//! Layers built-in defaults, an optional `ftserver.{toml,yaml,json,...}` file
//! in the working directory and `FTSERVER_*` environment variables. The
//! control port always comes from the command line.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

/// Base name of the optional configuration file
pub const CONFIG_FILE: &str = "ftserver";
/// Prefix for environment overrides, e.g. `FTSERVER_SERVE_DIR`
pub const ENV_PREFIX: &str = "FTSERVER";

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_SERVE_DIR: &str = ".";
pub const MIN_CONTROL_PORT: u16 = 1024;

/// Complete server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// IP address to bind the control listener
    pub bind_address: String,

    /// Port for the control connection (from the command line)
    pub control_port: u16,

    /// Directory whose files are listed and served
    pub serve_dir: String,

    /// Read the client's trailing acknowledgment after `CLOSE`
    pub await_client_ack: bool,
}

impl ServerConfig {
    /// Load configuration, using `control_port` from the command line
    pub fn load(control_port: u16) -> Result<Self, ConfigError> {
        Self::load_from(CONFIG_FILE, control_port)
    }

    /// Load configuration from a specific file (extension optional, file
    /// optional) with environment overrides
    pub fn load_from(config_file: &str, control_port: u16) -> Result<Self, ConfigError> {
        Self::build(
            config_file,
            Environment::with_prefix(ENV_PREFIX),
            control_port,
        )
    }

    fn build(
        config_file: &str,
        environment: Environment,
        control_port: u16,
    ) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("serve_dir", DEFAULT_SERVE_DIR)?
            .set_default("await_client_ack", true)?
            .add_source(File::with_name(config_file).required(false))
            .add_source(environment)
            .set_override("control_port", i64::from(control_port))?
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        if self.control_port < MIN_CONTROL_PORT {
            return Err(ConfigError::Message(format!(
                "control_port must be between {}-65535, got {}",
                MIN_CONTROL_PORT, self.control_port
            )));
        }

        if self.bind_address.trim().is_empty() {
            return Err(ConfigError::Message("bind_address cannot be empty".into()));
        }

        if self.serve_dir.is_empty() {
            return Err(ConfigError::Message("serve_dir cannot be empty".into()));
        }

        Ok(())
    }

    /// Get bind address and control port as socket address
    pub fn control_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.control_port)
    }

    /// Get serving directory as PathBuf
    pub fn serve_dir_path(&self) -> PathBuf {
        PathBuf::from(&self.serve_dir)
    }
}
