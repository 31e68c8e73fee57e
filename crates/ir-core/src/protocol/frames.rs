//! Inbound line filtering, decoded events, and the SSE frame encoding.
//!
//! # The receiver line protocol (for beginners)
//!
//! The receiver firmware prints human-readable text over the serial link.
//! Most of it is boot chatter and debug logging; only two kinds of lines are
//! meaningful to subscribers:
//!
//! - decode reports, e.g. `Decoded NEC 32 0x20DF10EF`
//! - readiness notices, e.g. `Ready to receive`
//!
//! Everything else is noise and is dropped (the firmware draws no distinction
//! between chatter and an unrecognized-but-valid decode, so neither do we).
//!
//! # The SSE wire format
//!
//! Subscribers receive Server-Sent Events frames. The byte layout is part of
//! the public contract with the web client and must not change:
//!
//! ```text
//! data: {"timestamp":1717171717000,"data":"Decoded NEC 32 0x1"}\n\n
//! : keepalive\n\n
//! ```
//!
//! Frames are encoded here, in one place, so the HTTP layer streams opaque
//! strings and every byte of the format is covered by unit tests.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

/// Marker substring identifying a decode report line.
pub const DECODED_MARKER: &str = "Decoded";

/// Marker substring identifying a receiver-ready line.
pub const READY_MARKER: &str = "Ready";

/// Returns the event payload when `line` is one of the recognized firmware
/// lines, `None` when it is noise.
///
/// The whole line is the payload — parsing the protocol/bit-count out of a
/// decode report is the web client's concern.
pub fn decoded_payload(line: &str) -> Option<&str> {
    if line.contains(DECODED_MARKER) || line.contains(READY_MARKER) {
        Some(line)
    } else {
        None
    }
}

/// One decoded-IR (or receiver-ready) event.
///
/// Ephemeral: created per inbound line, pushed to subscribers, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedEvent {
    /// Milliseconds since the Unix epoch, captured when the line was read.
    pub timestamp: u64,
    /// The raw firmware line, markers included.
    pub data: String,
}

impl DecodedEvent {
    /// Creates an event timestamped with the current wall-clock time.
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            timestamp: unix_millis_now(),
            data: data.into(),
        }
    }

    /// Creates an event with an explicit timestamp (used by tests that need
    /// byte-exact frame assertions).
    pub fn with_timestamp(timestamp: u64, data: impl Into<String>) -> Self {
        Self {
            timestamp,
            data: data.into(),
        }
    }
}

/// One frame on a subscriber's event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseFrame {
    /// A decoded-IR event, carried as a `data:` frame.
    Event(DecodedEvent),
    /// A periodic comment frame keeping idle connections open through
    /// proxies and load balancers.
    KeepAlive,
}

impl SseFrame {
    /// Encodes the frame to its exact wire bytes, trailing blank line
    /// included.
    pub fn encode(&self) -> String {
        match self {
            SseFrame::Event(event) => {
                // DecodedEvent contains no types that can fail to serialize,
                // so to_string cannot error here.
                let json = serde_json::to_string(event).unwrap_or_default();
                format!("data: {json}\n\n")
            }
            SseFrame::KeepAlive => ": keepalive\n\n".to_string(),
        }
    }
}

fn unix_millis_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
