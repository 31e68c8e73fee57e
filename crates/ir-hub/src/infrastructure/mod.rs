//! Infrastructure layer: everything that touches the OS or the network.

pub mod http;
pub mod serial;
pub mod storage;
