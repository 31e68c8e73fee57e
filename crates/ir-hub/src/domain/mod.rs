//! Pure configuration types for the daemon.

pub mod config;

pub use config::HubConfig;
