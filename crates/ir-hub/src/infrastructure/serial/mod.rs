//! Serial device sessions and port enumeration.
//!
//! Both device links are fixed at 9600 baud, 8N1 framing, CR+LF line
//! delimiting — set by the firmware, not configurable.

pub mod receiver;
pub mod registry;
pub mod transmitter;

pub use receiver::ReceiverSession;
pub use registry::list_ports;
pub use transmitter::TransmitterSession;

use thiserror::Error;

/// Error type for serial port enumeration.
#[derive(Debug, Error)]
#[error("serial port enumeration failed: {0}")]
pub struct EnumerationError(#[from] tokio_serial::Error);

/// Error type for opening a serial connection.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("failed to open {path}: {source}")]
    OpenFailed {
        path: String,
        #[source]
        source: tokio_serial::Error,
    },
}

/// Error type for transmit requests.
#[derive(Debug, Error)]
pub enum SendError {
    /// No transmitter connection is open; no I/O was attempted.
    #[error("transmitter is not connected")]
    NotConnected,
    /// The underlying write or flush failed; surfaced verbatim, no retry.
    #[error("write to transmitter failed: {0}")]
    WriteFailed(#[source] std::io::Error),
}
