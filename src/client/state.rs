//! Module `state`
//!
//! Defines the `Session` struct tracking one client interaction, from
//! control-connection accept to close. Nothing here outlives the session.

use log::warn;
use std::net::SocketAddr;

use crate::protocol::Command;

/// Position of a session in the control-connection handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitDport,
    AwaitCommand,
    Dispatched,
    Rejected,
    Closed,
}

/// State gathered during the handshake.
///
/// `data_port` and `command` are write-once; later attempts to set them are
/// ignored.
#[derive(Debug)]
pub struct Session {
    state: SessionState,
    client_addr: Option<SocketAddr>,
    data_port: Option<u16>,
    command: Option<Command>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            state: SessionState::AwaitDport,
            client_addr: None,
            data_port: None,
            command: None,
        }
    }
}

impl Session {
    pub fn new(client_addr: Option<SocketAddr>) -> Self {
        Self {
            client_addr,
            ..Self::default()
        }
    }

    // --------------------
    // Getter methods
    // --------------------

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns the peer address of the control connection if known.
    pub fn client_addr(&self) -> Option<&SocketAddr> {
        self.client_addr.as_ref()
    }

    /// Returns the announced data port, if the announcement was well formed.
    pub fn data_port(&self) -> Option<u16> {
        self.data_port
    }

    pub fn command(&self) -> Option<&Command> {
        self.command.as_ref()
    }

    /// Returns the requested filename; only `GET` carries one.
    pub fn filename(&self) -> Option<&str> {
        self.command.as_ref().and_then(Command::filename)
    }

    // --------------------
    // Setter methods
    // --------------------

    pub fn set_state(&mut self, state: SessionState) {
        self.state = state;
    }

    pub fn set_data_port(&mut self, port: u16) {
        if let Some(existing) = self.data_port {
            warn!("Data port already set to {}, ignoring {}", existing, port);
            return;
        }
        self.data_port = Some(port);
    }

    pub fn set_command(&mut self, command: Command) {
        if let Some(existing) = &self.command {
            warn!("Command already set to {:?}, ignoring {:?}", existing, command);
            return;
        }
        self.command = Some(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_awaiting_data_port() {
        let session = Session::default();
        assert_eq!(session.state(), SessionState::AwaitDport);
        assert_eq!(session.data_port(), None);
        assert_eq!(session.command(), None);
    }

    #[test]
    fn remembers_control_peer() {
        let addr: SocketAddr = "192.0.2.7:40000".parse().unwrap();
        let session = Session::new(Some(addr));
        assert_eq!(session.client_addr(), Some(&addr));
        assert_eq!(Session::default().client_addr(), None);
    }

    #[test]
    fn fields_are_write_once() {
        let mut session = Session::new(None);
        session.set_data_port(9000);
        session.set_data_port(9001);
        assert_eq!(session.data_port(), Some(9000));

        session.set_command(Command::GET("a.txt".into()));
        session.set_command(Command::LIST);
        assert_eq!(session.filename(), Some("a.txt"));
    }

    #[test]
    fn list_has_no_filename() {
        let mut session = Session::new(None);
        session.set_command(Command::LIST);
        assert_eq!(session.filename(), None);
    }
}
