//! Domain layer: pure business-logic types (no I/O).

pub mod ports;
pub mod session;
