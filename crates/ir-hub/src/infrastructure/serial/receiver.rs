//! ReceiverSession: the decoding side's serial connection and read loop.
//!
//! # How inbound data flows
//!
//! ```text
//! firmware ──CR+LF lines──► read task ──filter──► mpsc channel ──► broadcaster
//! ```
//!
//! The read task runs for as long as the connection lives. Each line is
//! checked against the recognized markers ([`ir_core::decoded_payload`]);
//! matches become [`DecodedEvent`]s on the channel, everything else is
//! firmware chatter and dropped.
//!
//! The session owns at most one connection: `connect` always tears down the
//! previous read task before opening the new port, and an empty/absent path
//! is a disconnect request rather than an error. Aborting the read task
//! discards any read in flight — a line from a since-closed connection is
//! never delivered.

use std::sync::{Arc, Mutex};

use ir_core::{decoded_payload, DecodedEvent, SessionState};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_serial::SerialStream;
use tracing::{debug, info, warn};

use super::ConnectError;

/// The receiver role's serial session.
pub struct ReceiverSession {
    baud_rate: u32,
    events: mpsc::Sender<DecodedEvent>,
    /// Shared with the read task, which moves the state to `Failed` or
    /// `Disconnected` when the transport dies on its own.
    state: Arc<Mutex<SessionState>>,
    read_task: Option<JoinHandle<()>>,
}

impl ReceiverSession {
    /// Creates a disconnected session that will emit decoded events into
    /// `events`.
    pub fn new(baud_rate: u32, events: mpsc::Sender<DecodedEvent>) -> Self {
        Self {
            baud_rate,
            events,
            state: Arc::new(Mutex::new(SessionState::Disconnected)),
            read_task: None,
        }
    }

    /// Current connection state.
    pub fn state(&self) -> SessionState {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Connects to `path`, or disconnects when `path` is empty/absent.
    ///
    /// Any existing connection is force-closed first — the role never has
    /// two underlying connections at once. Returns `Ok(true)` when a
    /// connection is now open, `Ok(false)` for a disconnect request.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectError::OpenFailed`] when the port cannot be opened
    /// (busy, permission denied, not found); the state is left at
    /// `Failed(reason)`.
    pub async fn connect(&mut self, path: Option<&str>) -> Result<bool, ConnectError> {
        self.close();

        let Some(path) = path.filter(|p| !p.is_empty()) else {
            return Ok(false);
        };

        self.set_state(SessionState::Connecting);
        // Builder defaults are 8N1, which is what the firmware speaks.
        let stream = SerialStream::open(&tokio_serial::new(path, self.baud_rate)).map_err(
            |source| {
                self.set_state(SessionState::Failed(source.to_string()));
                ConnectError::OpenFailed {
                    path: path.to_string(),
                    source,
                }
            },
        )?;
        self.set_state(SessionState::Connected);
        info!("receiver connected to {path}");

        let state = Arc::clone(&self.state);
        let events = self.events.clone();
        let path = path.to_string();
        self.read_task = Some(tokio::spawn(async move {
            match pump_decoded_lines(stream, events).await {
                Ok(()) => {
                    info!("receiver {path}: stream ended");
                    set_shared_state(&state, SessionState::Disconnected);
                }
                Err(e) => {
                    warn!("receiver {path}: read failed: {e}");
                    set_shared_state(&state, SessionState::Failed(e.to_string()));
                }
            }
        }));
        Ok(true)
    }

    /// Tears down the connection, if any, and resets the state to
    /// `Disconnected`.
    pub fn close(&mut self) {
        if let Some(task) = self.read_task.take() {
            task.abort();
        }
        self.set_state(SessionState::Disconnected);
    }

    fn set_state(&self, state: SessionState) {
        set_shared_state(&self.state, state);
    }
}

impl Drop for ReceiverSession {
    fn drop(&mut self) {
        self.close();
    }
}

fn set_shared_state(state: &Mutex<SessionState>, next: SessionState) {
    *state.lock().unwrap_or_else(|e| e.into_inner()) = next;
}

/// Reads CR+LF-delimited lines from `reader` until EOF or error, forwarding
/// recognized lines as [`DecodedEvent`]s.
///
/// Generic over the reader so tests can drive it with an in-memory duplex
/// instead of a serial port. Ends cleanly when the event channel's receiver
/// is gone (daemon shutting down).
pub(crate) async fn pump_decoded_lines<R>(
    reader: R,
    events: mpsc::Sender<DecodedEvent>,
) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    while let Some(line) = lines.next_line().await? {
        match decoded_payload(&line) {
            Some(payload) => {
                let event = DecodedEvent::new(payload);
                if events.send(event).await.is_err() {
                    break;
                }
            }
            None => debug!("receiver noise: {line:?}"),
        }
    }
    Ok(())
}
