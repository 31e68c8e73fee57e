//! Session roles and the per-role connection state machine.
//!
//! # Connection lifecycle (for beginners)
//!
//! Each role (receiver, transmitter) owns at most one serial connection and
//! progresses through these states:
//!
//! ```text
//! Disconnected ──connect(path)──► Connecting ──open ok──► Connected
//!       ▲                              │                      │
//!       │                         open error             read/write error
//!       │                              ▼                      ▼
//!       └────────disconnect───── Failed(reason) ◄─────────────┘
//! ```
//!
//! - `Disconnected`: no connection; the initial state and the result of every
//!   explicit disconnect, regardless of what came before.
//! - `Connecting`: an open request is in flight.
//! - `Connected`: the port is open; the receiver's read loop is running.
//! - `Failed`: the open was refused or the transport died mid-session. The
//!   reason string is surfaced by the status API.
//!
//! A new `connect` while `Connected` first tears down the existing
//! connection — a role never has two underlying connections at once.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The functional identity of one of the two serial device slots.
///
/// Independent of which physical port is plugged into which role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionRole {
    /// The decoding side: firmware prints one line per captured IR signal.
    Receiver,
    /// The replay side: accepts one command line per transmitted signal.
    Transmitter,
}

impl fmt::Display for SessionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionRole::Receiver => write!(f, "receiver"),
            SessionRole::Transmitter => write!(f, "transmitter"),
        }
    }
}

/// Current state of one role's serial connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason", rename_all = "lowercase")]
pub enum SessionState {
    /// No connection. Initial state and the result of explicit disconnects.
    Disconnected,
    /// An open request is in flight.
    Connecting,
    /// The serial port is open.
    Connected,
    /// The open failed or the transport died mid-session.
    Failed(String),
}

impl SessionState {
    /// Whether the role currently has an open connection.
    pub fn is_connected(&self) -> bool {
        matches!(self, SessionState::Connected)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Disconnected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_disconnected() {
        assert_eq!(SessionState::default(), SessionState::Disconnected);
    }

    #[test]
    fn test_only_connected_reports_is_connected() {
        assert!(SessionState::Connected.is_connected());
        assert!(!SessionState::Disconnected.is_connected());
        assert!(!SessionState::Connecting.is_connected());
        assert!(!SessionState::Failed("busy".into()).is_connected());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&SessionRole::Receiver).unwrap(),
            "\"receiver\""
        );
        assert_eq!(
            serde_json::to_string(&SessionRole::Transmitter).unwrap(),
            "\"transmitter\""
        );
    }

    #[test]
    fn test_role_display_matches_serde_form() {
        assert_eq!(SessionRole::Receiver.to_string(), "receiver");
        assert_eq!(SessionRole::Transmitter.to_string(), "transmitter");
    }

    #[test]
    fn test_failed_state_serializes_with_reason() {
        let json = serde_json::to_string(&SessionState::Failed("device busy".into())).unwrap();
        assert_eq!(json, r#"{"state":"failed","reason":"device busy"}"#);
    }

    #[test]
    fn test_connected_state_serializes_without_reason() {
        let json = serde_json::to_string(&SessionState::Connected).unwrap();
        assert_eq!(json, r#"{"state":"connected"}"#);
    }
}
