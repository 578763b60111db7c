//! Client session management
//!
//! Handles the control-connection handshake and per-session state.

pub mod session;
pub mod state;

pub use session::{ControlSession, Handshake};
pub use state::{Session, SessionState};
