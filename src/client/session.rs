//! Control session
//!
//! Drives the control-connection handshake:
//! `AwaitDport -> AwaitCommand -> {Dispatched | Rejected} -> Closed`.
//!
//! The session only reads and writes packets on the stream it is given; it
//! never opens sockets. Opening the data connection and running the transfer
//! is the caller's job once `handshake` returns `Handshake::Dispatched`.

use log::{debug, info, warn};
use std::io;
use std::net::SocketAddr;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::client::state::{Session, SessionState};
use crate::error::PacketError;
use crate::protocol::responses::{self, USAGE};
use crate::protocol::{Command, parse_data_port, read_packet, write_packet};

/// Result of the handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handshake {
    /// Command accepted and acknowledged
    Dispatched(Command),
    /// Unknown command; an `ERROR` with usage text was sent
    Rejected,
}

/// One client session over a control connection.
pub struct ControlSession<S> {
    stream: S,
    session: Session,
}

impl<S> ControlSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, client_addr: Option<SocketAddr>) -> Self {
        Self {
            stream,
            session: Session::new(client_addr),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The control stream, for transfers that report errors on it.
    pub fn control_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    /// Reads the data-port announcement and the command, answering the
    /// command with `ACK` or `ERROR`.
    pub async fn handshake(&mut self) -> Result<Handshake, PacketError> {
        debug_assert_eq!(self.session.state(), SessionState::AwaitDport);
        self.receive_data_port().await?;
        self.receive_command().await
    }

    /// A malformed announcement is tolerated and leaves the port unset.
    async fn receive_data_port(&mut self) -> Result<(), PacketError> {
        let packet = read_packet(&mut self.stream).await?;
        match parse_data_port(&packet) {
            Some(port) => {
                debug!("Client announced data port {}", port);
                self.session.set_data_port(port);
            }
            None => warn!(
                "Ignoring malformed data port announcement: tag {:?}, payload {:?}",
                packet.tag(),
                packet.payload_str()
            ),
        }
        self.session.set_state(SessionState::AwaitCommand);
        Ok(())
    }

    async fn receive_command(&mut self) -> Result<Handshake, PacketError> {
        let packet = read_packet(&mut self.stream).await?;

        match Command::from_packet(&packet) {
            Some(command) => {
                info!(
                    "Received {} {} from {}",
                    command.tag(),
                    command.filename().unwrap_or_default(),
                    self.peer()
                );
                write_packet(&mut self.stream, &responses::ack()?).await?;
                self.session.set_command(command.clone());
                self.session.set_state(SessionState::Dispatched);
                Ok(Handshake::Dispatched(command))
            }
            None => {
                warn!(
                    "Rejected invalid command tag {:?} from {}",
                    packet.tag(),
                    self.peer()
                );
                write_packet(&mut self.stream, &responses::error(USAGE)?).await?;
                self.session.set_state(SessionState::Rejected);
                Ok(Handshake::Rejected)
            }
        }
    }

    /// Control peer for log lines.
    fn peer(&self) -> String {
        match self.session.client_addr() {
            Some(addr) => addr.to_string(),
            None => "unknown peer".to_string(),
        }
    }

    /// Tells the client it may end the session.
    pub async fn close(&mut self) -> Result<(), PacketError> {
        write_packet(&mut self.stream, &responses::close()?).await?;
        self.session.set_state(SessionState::Closed);
        Ok(())
    }

    /// Waits for the client's final acknowledgment on the control connection.
    ///
    /// A client that hangs up instead is fine; the session is already over.
    pub async fn await_client_ack(&mut self) -> Result<(), PacketError> {
        match read_packet(&mut self.stream).await {
            Ok(packet) => {
                debug!("Client acknowledged close with {:?}", packet.tag());
                Ok(())
            }
            Err(PacketError::ConnectionClosed) => {
                debug!("Client closed control connection without acknowledgment");
                Ok(())
            }
            Err(PacketError::Io(e)) if e.kind() == io::ErrorKind::ConnectionReset => {
                debug!("Client reset control connection after close");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
