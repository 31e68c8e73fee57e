//! # ir-core
//!
//! Shared library for IR-Hub containing the domain entities and the
//! line-protocol spoken with the IR receiver/transmitter firmware.
//!
//! This crate is used by the `ir-hub` daemon and by its tests. It has zero
//! dependencies on OS APIs, serial ports, or network sockets.
//!
//! # Architecture overview (for beginners)
//!
//! IR-Hub bridges a physical infrared receiver/transmitter pair (two
//! microcontrollers attached over USB-serial) to web clients. The receiver
//! firmware decodes raw IR waveforms on-device and prints one text line per
//! decoded signal; the transmitter firmware accepts one text line per replay
//! request. This crate defines:
//!
//! - **`domain`** – Pure types with no I/O: the two session [roles]
//!   (receiver/transmitter), the per-role connection state machine, and the
//!   serial port descriptor returned by enumeration.
//!
//! - **`protocol`** – The text wire formats. Inbound: which firmware lines
//!   count as decode events and how they become JSON-carrying SSE frames.
//!   Outbound: how a replay request serializes to the transmitter line.
//!
//! [roles]: domain::session::SessionRole

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `ir_core::SessionRole` instead of `ir_core::domain::session::SessionRole`.
pub use domain::ports::{is_usb_serial_path, PortDescriptor};
pub use domain::session::{SessionRole, SessionState};
pub use protocol::command::TransmitCommand;
pub use protocol::frames::{decoded_payload, DecodedEvent, SseFrame};
