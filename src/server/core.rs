use log::{debug, error, info, warn};
use std::io;
use std::net::SocketAddr;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;

use crate::client::{ControlSession, Handshake};
use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::transfer::{open_data_connection, run_transfer};

/// Sequential file-transfer server: one client session at a time.
pub struct Server {
    listener: TcpListener,
    config: ServerConfig,
}

impl Server {
    /// Binds the control listener described by `config`.
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let control_socket = config.control_socket();

        let listener = match TcpListener::bind(&control_socket).await {
            Ok(listener) => listener,
            Err(e) => {
                error!("Failed to bind to {}: {}", control_socket, e);
                return Err(ServerError::Bind(control_socket, e));
            }
        };

        Ok(Self { listener, config })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves clients until `shutdown` is cancelled.
    ///
    /// A session in flight when the token fires is abandoned and its
    /// connections dropped. Any transport error ends the loop with `Err`.
    pub async fn run(&self, shutdown: CancellationToken) -> Result<(), ServerError> {
        let serve_dir = self.config.serve_dir_path();
        match self.local_addr() {
            Ok(addr) => info!("Server open on {}", addr),
            Err(_) => info!("Server open on {}", self.config.control_socket()),
        }
        info!("Serving files from {}", serve_dir.display());

        loop {
            let (stream, client_addr) = tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Shutdown requested, no longer accepting clients");
                    return Ok(());
                }
                accepted = self.listener.accept() => accepted.map_err(|e| {
                    error!("Error accepting connection: {}", e);
                    ServerError::Accept(e)
                })?,
            };

            info!("control connection established with {}", client_addr);

            tokio::select! {
                _ = shutdown.cancelled() => {
                    warn!("Shutdown requested, abandoning session with {}", client_addr);
                    return Ok(());
                }
                result = serve_session(stream, client_addr, &serve_dir, self.config.await_client_ack) => {
                    result?;
                }
            }

            info!("Session with {} closed", client_addr);
        }
    }
}

/// Runs one complete session: handshake, transfer, close.
async fn serve_session(
    stream: TcpStream,
    client_addr: SocketAddr,
    serve_dir: &Path,
    await_client_ack: bool,
) -> Result<(), ServerError> {
    let mut session = ControlSession::new(stream, Some(client_addr));

    let command = match session.handshake().await? {
        Handshake::Dispatched(command) => command,
        Handshake::Rejected => {
            session.close().await?;
            return Ok(());
        }
    };

    let mut data_stream =
        open_data_connection(client_addr.ip(), session.session().data_port()).await?;

    let outcome = run_transfer(&mut data_stream, session.control_mut(), &command, serve_dir).await?;
    info!("{} for {}: {}", command.tag(), client_addr, outcome);

    session.close().await?;
    if await_client_ack {
        session.await_client_ack().await?;
    }

    if let Err(e) = data_stream.shutdown().await {
        debug!("Data connection shutdown failed: {}", e);
    }
    info!("data connection with {} closed", client_addr);
    Ok(())
}
