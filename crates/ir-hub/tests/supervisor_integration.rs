//! Integration tests for the session supervisor lifecycle.
//!
//! # Purpose
//!
//! These tests exercise the `SessionSupervisor` through its *public* API the
//! same way the HTTP layer uses it. They verify:
//!
//! - The startup auto-reconnect path: a persisted path pointing at a missing
//!   device leaves that role failed, leaves the other role untouched, and
//!   never aborts startup.
//! - The disconnect contract: an empty/absent path always yields
//!   `Ok(false)` and a `Disconnected` role, regardless of prior state.
//! - Best-effort persistence: successful disconnects clear the saved path;
//!   failed connects leave it alone.
//!
//! No real serial hardware is involved: connect attempts target a device
//! path that cannot exist, and persistence goes through the in-memory store.

use std::sync::Arc;

use ir_core::{SessionRole, SessionState, TransmitCommand};
use ir_hub::application::SessionSupervisor;
use ir_hub::domain::HubConfig;
use ir_hub::infrastructure::storage::{MemoryPortConfigStore, PersistedPortConfig, PortConfigStore};

/// A path no platform enumerates; open attempts on it must fail.
const MISSING_DEVICE: &str = "/dev/ttyUSB-ir-hub-integration-missing";

fn supervisor_with_config(config: PersistedPortConfig) -> (Arc<SessionSupervisor>, Arc<MemoryPortConfigStore>) {
    let store = Arc::new(MemoryPortConfigStore::new(config));
    let sup = SessionSupervisor::new(&HubConfig::default(), Box::new(SharedStore(Arc::clone(&store))));
    (sup, store)
}

/// Adapter so the test can keep a handle on the store the supervisor owns.
struct SharedStore(Arc<MemoryPortConfigStore>);

impl PortConfigStore for SharedStore {
    fn load(
        &self,
    ) -> Result<PersistedPortConfig, ir_hub::infrastructure::storage::ConfigStoreError> {
        self.0.load()
    }
    fn save(
        &self,
        config: &PersistedPortConfig,
    ) -> Result<(), ir_hub::infrastructure::storage::ConfigStoreError> {
        self.0.save(config)
    }
}

/// Startup with a saved receiver path whose device does not
/// exist. The receiver ends failed, the transmitter stays disconnected, and
/// the supervisor keeps serving requests.
#[tokio::test]
async fn test_bootstrap_with_missing_device_is_non_fatal_and_per_role() {
    let (sup, store) = supervisor_with_config(PersistedPortConfig {
        receiver_path: Some(MISSING_DEVICE.to_string()),
        transmitter_path: None,
    });

    sup.bootstrap().await;

    let status = sup.status().await;
    assert!(
        matches!(status.receiver, SessionState::Failed(_)),
        "receiver must record the failed reconnect, got {:?}",
        status.receiver
    );
    assert_eq!(status.transmitter, SessionState::Disconnected);

    // The failed reconnect must not have clobbered the saved path — the user
    // may plug the device back in and restart.
    assert_eq!(
        store.load().unwrap().receiver_path.as_deref(),
        Some(MISSING_DEVICE)
    );

    // Still serving requests.
    assert!(sup.list_ports().is_ok());
}

#[tokio::test]
async fn test_disconnect_request_always_yields_disconnected() {
    let (sup, _store) = supervisor_with_config(PersistedPortConfig::default());

    // From the initial state.
    assert!(!sup.connect(SessionRole::Receiver, None).await.unwrap());
    assert_eq!(sup.status().await.receiver, SessionState::Disconnected);

    // From a failed state.
    let _ = sup.connect(SessionRole::Receiver, Some(MISSING_DEVICE)).await;
    assert!(matches!(sup.status().await.receiver, SessionState::Failed(_)));

    assert!(!sup.connect(SessionRole::Receiver, Some("")).await.unwrap());
    assert_eq!(sup.status().await.receiver, SessionState::Disconnected);
}

#[tokio::test]
async fn test_successful_disconnect_clears_persisted_path() {
    let (sup, store) = supervisor_with_config(PersistedPortConfig {
        receiver_path: Some("/dev/ttyACM0".to_string()),
        transmitter_path: Some("/dev/ttyACM1".to_string()),
    });

    assert!(!sup.connect(SessionRole::Transmitter, None).await.unwrap());

    let persisted = store.load().unwrap();
    assert_eq!(persisted.transmitter_path, None, "disconnect must clear the role's path");
    assert_eq!(
        persisted.receiver_path.as_deref(),
        Some("/dev/ttyACM0"),
        "the other role's path must be untouched"
    );
}

#[tokio::test]
async fn test_failed_connect_does_not_persist() {
    let (sup, store) = supervisor_with_config(PersistedPortConfig::default());

    let result = sup
        .connect(SessionRole::Transmitter, Some(MISSING_DEVICE))
        .await;
    assert!(result.is_err());

    assert_eq!(store.load().unwrap(), PersistedPortConfig::default());
}

#[tokio::test]
async fn test_send_without_transmitter_fails_before_any_io() {
    let (sup, _store) = supervisor_with_config(PersistedPortConfig::default());

    let err = sup
        .send(&TransmitCommand {
            protocol: "NEC".into(),
            bit_length: 32,
            code: "0x1".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ir_hub::infrastructure::serial::SendError::NotConnected
    ));
}

#[tokio::test]
async fn test_shutdown_clears_subscribers_and_disconnects() {
    let (sup, _store) = supervisor_with_config(PersistedPortConfig::default());
    let (_id, mut rx) = sup.broadcaster().subscribe();

    sup.shutdown().await;

    assert_eq!(sup.broadcaster().subscriber_count(), 0);
    assert!(rx.recv().await.is_none(), "subscriber channels close on shutdown");
    let status = sup.status().await;
    assert_eq!(status.receiver, SessionState::Disconnected);
    assert_eq!(status.transmitter, SessionState::Disconnected);
}
