//! Command-line interface

use clap::Parser;

use crate::config::MIN_CONTROL_PORT;

/// Minimal two-connection file transfer server
#[derive(Clone, Debug, Parser)]
#[command(name = "ftserver", version)]
pub struct Cli {
    /// Port to listen on for control connections (1024-65535)
    #[arg(value_name = "SERVER_PORT", value_parser = parse_server_port)]
    pub port: u16,
}

fn parse_server_port(arg: &str) -> Result<u16, String> {
    let port: i64 = arg
        .trim()
        .parse()
        .map_err(|_| "ftserver port number must be an integer".to_string())?;

    u16::try_from(port)
        .ok()
        .filter(|&p| p >= MIN_CONTROL_PORT)
        .ok_or_else(|| format!("ftserver port number must be between {MIN_CONTROL_PORT}-65535"))
}
