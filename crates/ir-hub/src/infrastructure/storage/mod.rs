//! Persistence of the port configuration.

pub mod config;

pub use config::{
    ConfigStoreError, MemoryPortConfigStore, PersistedPortConfig, PortConfigStore,
    TomlPortConfigStore,
};
