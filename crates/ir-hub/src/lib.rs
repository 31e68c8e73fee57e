//! ir-hub library crate.
//!
//! This crate is the daemon that owns the two IR serial device sessions and
//! streams decoded events to web subscribers.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Browser (JSON + SSE over HTTP)
//!         ↕
//! [ir-hub]
//!   ├── domain/           Pure types: HubConfig
//!   ├── application/      EventBroadcaster, SessionSupervisor
//!   └── infrastructure/
//!         ├── serial/     Port enumeration, receiver/transmitter sessions
//!         ├── storage/    Persisted port configuration (TOML)
//!         └── http/       axum routes + SSE stream
//!         ↕
//! IR receiver / transmitter firmware (text lines over USB-serial, 9600 baud)
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no async.
//! - `application` depends on `domain`, `ir-core`, and tokio channels/tasks —
//!   but never on serial ports or HTTP directly.
//! - `infrastructure` depends on everything plus `tokio-serial` and `axum`.

/// Domain layer: runtime configuration.
pub mod domain;

/// Application layer: event fan-out and session supervision.
pub mod application;

/// Infrastructure layer: serial I/O, config persistence, HTTP surface.
pub mod infrastructure;
