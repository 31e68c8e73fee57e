//! Daemon configuration types.
//!
//! [`HubConfig`] is the single source of truth for all runtime settings. It
//! is built from CLI arguments in `main.rs` or from defaults (useful for
//! local development and tests).
//!
//! # Design rationale
//!
//! Keeping configuration as a plain struct (no global state, no environment
//! variable reads inside the domain) makes the daemon easy to embed in tests.
//! The infrastructure layer is responsible for populating the struct from CLI
//! args or environment variables.

use std::net::SocketAddr;
use std::time::Duration;

/// All runtime configuration for the daemon.
///
/// Build this once at startup and share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// The address and port the HTTP server binds to.
    ///
    /// `0.0.0.0` accepts connections from any interface; use `127.0.0.1` to
    /// accept only local connections.
    pub http_bind_addr: SocketAddr,

    /// Baud rate for both serial links.
    ///
    /// Fixed by the firmware at 9600 (8N1 framing); not configurable at
    /// runtime, but kept here so tests and the session code share one value.
    pub baud_rate: u32,

    /// Interval between `: keepalive` comment frames on each subscriber's
    /// event stream. Keeps idle SSE connections from being closed by
    /// intermediaries.
    pub keepalive_interval: Duration,

    /// Capacity of the receiver→broadcaster event channel.
    pub event_channel_capacity: usize,
}

impl Default for HubConfig {
    /// Returns a `HubConfig` suitable for local development.
    ///
    /// | Field                  | Default        |
    /// |------------------------|----------------|
    /// | http_bind_addr         | `0.0.0.0:8765` |
    /// | baud_rate              | 9600           |
    /// | keepalive_interval     | 30 seconds     |
    /// | event_channel_capacity | 64             |
    fn default() -> Self {
        Self {
            // Safe: compile-time-known valid socket address string.
            http_bind_addr: "0.0.0.0:8765".parse().unwrap(),
            baud_rate: 9600,
            keepalive_interval: Duration::from_secs(30),
            event_channel_capacity: 64,
        }
    }
}
