//! TransmitterSession: the replay side's serial connection.
//!
//! Same open/close/empty-path semantics as the receiver, but no read loop —
//! the transmitter firmware only consumes command lines. A send is
//! acknowledged only after the transport confirms the bytes are flushed;
//! a write failure surfaces verbatim to the caller with no retry.

use ir_core::{SessionState, TransmitCommand};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_serial::SerialStream;
use tracing::{info, warn};

use super::{ConnectError, SendError};

/// The transmitter role's serial session.
///
/// Callers hold the session behind an async mutex; a `send` borrows the
/// session mutably for the whole write+flush, so concurrent sends are
/// serialized and partial writes never interleave.
pub struct TransmitterSession {
    baud_rate: u32,
    state: SessionState,
    stream: Option<SerialStream>,
}

impl TransmitterSession {
    /// Creates a disconnected session.
    pub fn new(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            state: SessionState::Disconnected,
            stream: None,
        }
    }

    /// Current connection state.
    pub fn state(&self) -> SessionState {
        self.state.clone()
    }

    /// Connects to `path`, or disconnects when `path` is empty/absent.
    ///
    /// Identical contract to the receiver's `connect`: the existing
    /// connection is always closed first, `Ok(false)` means disconnect.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectError::OpenFailed`] when the port cannot be opened;
    /// the state is left at `Failed(reason)`.
    pub async fn connect(&mut self, path: Option<&str>) -> Result<bool, ConnectError> {
        self.close();

        let Some(path) = path.filter(|p| !p.is_empty()) else {
            return Ok(false);
        };

        self.state = SessionState::Connecting;
        match SerialStream::open(&tokio_serial::new(path, self.baud_rate)) {
            Ok(stream) => {
                self.stream = Some(stream);
                self.state = SessionState::Connected;
                info!("transmitter connected to {path}");
                Ok(true)
            }
            Err(source) => {
                self.state = SessionState::Failed(source.to_string());
                Err(ConnectError::OpenFailed {
                    path: path.to_string(),
                    source,
                })
            }
        }
    }

    /// Serializes `cmd` to its wire line and writes it to the connection,
    /// acknowledging only after flush.
    ///
    /// # Errors
    ///
    /// - [`SendError::NotConnected`] when no connection is open; no I/O is
    ///   performed.
    /// - [`SendError::WriteFailed`] when the transport errors; the session
    ///   drops the dead stream and moves to `Failed` — recovery is an
    ///   explicit reconnect.
    pub async fn send(&mut self, cmd: &TransmitCommand) -> Result<(), SendError> {
        let Some(stream) = self.stream.as_mut() else {
            return Err(SendError::NotConnected);
        };
        match write_command(stream, cmd).await {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!("transmitter write failed: {e}");
                self.stream = None;
                self.state = SessionState::Failed(e.to_string());
                Err(SendError::WriteFailed(e))
            }
        }
    }

    /// Tears down the connection, if any, and resets the state to
    /// `Disconnected`.
    pub fn close(&mut self) {
        self.stream = None;
        self.state = SessionState::Disconnected;
    }
}

/// Writes one command line and flushes.
///
/// Generic over the writer so tests can assert the exact bytes with an
/// in-memory buffer instead of a serial port.
pub(crate) async fn write_command<W>(writer: &mut W, cmd: &TransmitCommand) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(cmd.to_wire_line().as_bytes()).await?;
    writer.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nec_one() -> TransmitCommand {
        TransmitCommand {
            protocol: "NEC".into(),
            bit_length: 32,
            code: "0x1".into(),
        }
    }

    /// The command writes exactly `"NEC,32,0x1\n"`, nothing more.
    #[tokio::test]
    async fn test_write_command_exact_bytes() {
        let mut sink: Vec<u8> = Vec::new();
        write_command(&mut sink, &nec_one()).await.unwrap();
        assert_eq!(sink, b"NEC,32,0x1\n");
    }

    #[tokio::test]
    async fn test_send_without_connection_fails_and_performs_no_io() {
        let mut session = TransmitterSession::new(9600);
        let err = session.send(&nec_one()).await.unwrap_err();
        assert!(matches!(err, SendError::NotConnected));
        assert_eq!(session.state(), SessionState::Disconnected);
    }

    #[tokio::test]
    async fn test_connect_with_no_path_is_a_disconnect_request() {
        let mut session = TransmitterSession::new(9600);
        assert!(!session.connect(None).await.unwrap());
        assert_eq!(session.state(), SessionState::Disconnected);
    }

    #[tokio::test]
    async fn test_connect_to_missing_device_fails_and_marks_failed() {
        let mut session = TransmitterSession::new(9600);
        let err = session
            .connect(Some("/dev/ttyUSB-ir-hub-test-missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectError::OpenFailed { .. }));
        assert!(matches!(session.state(), SessionState::Failed(_)));

        // A send after a failed connect is still NotConnected — the failed
        // open never left a handle behind.
        assert!(matches!(
            session.send(&nec_one()).await.unwrap_err(),
            SendError::NotConnected
        ));
    }

    #[tokio::test]
    async fn test_close_resets_failed_state() {
        let mut session = TransmitterSession::new(9600);
        let _ = session.connect(Some("/dev/ttyUSB-ir-hub-test-missing")).await;
        session.close();
        assert_eq!(session.state(), SessionState::Disconnected);
    }
}
