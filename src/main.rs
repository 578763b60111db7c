//! ftserver - Entry Point
//!
//! Serves directory listings and files to one client at a time over a
//! control connection plus a per-request data connection.

use clap::Parser;
use log::{error, info};
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;

use ftserver::Server;
use ftserver::cli::Cli;
use ftserver::config::ServerConfig;
use ftserver::error::ServerError;
use ftserver::error::handlers::{error_to_exit_code, handle_error};
use ftserver::utils::logging::setup_logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            handle_error(&e);
            ExitCode::from(error_to_exit_code(&e))
        }
    }
}

async fn run(cli: Cli) -> Result<(), ServerError> {
    let config = ServerConfig::load(cli.port)?;
    let server = Server::bind(config).await?;

    let shutdown = CancellationToken::new();
    spawn_interrupt_handler(shutdown.clone());

    server.run(shutdown).await
}

/// Cancels `shutdown` on the first interrupt signal.
fn spawn_interrupt_handler(shutdown: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("ftserver closed due to interrupt signal");
                shutdown.cancel();
            }
            Err(e) => error!("Unable to listen for interrupt signal: {}", e),
        }
    });
}
