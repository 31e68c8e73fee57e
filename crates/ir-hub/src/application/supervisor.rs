//! SessionSupervisor: top-level owner of the two serial sessions and the
//! event broadcaster.
//!
//! Constructed once at process start, torn down at shutdown. All externally
//! triggered operations (HTTP handlers, startup reconnect) go through this
//! type; nothing else touches the sessions.
//!
//! # Wiring
//!
//! ```text
//!              ┌──────────────── SessionSupervisor ────────────────┐
//! connect ───► │ ReceiverSession ──events──► pump ──► Broadcaster  │ ──► subscribers
//!    send ───► │ TransmitterSession                                │
//!              │        └──────── PortConfigStore (best-effort) ───┘
//! ```
//!
//! Each session lives behind its own `tokio::sync::Mutex`: a connect or send
//! for one role never blocks the other role, and holding the transmitter
//! lock across the whole write+flush is what serializes concurrent sends.
//!
//! Decoded events travel over an mpsc channel from the receiver's read task
//! to the pump task, which hands them to the broadcaster. The channel
//! decouples line parsing from fan-out and keeps both independently
//! testable.

use std::sync::Arc;

use ir_core::{DecodedEvent, PortDescriptor, SessionRole, SessionState, TransmitCommand};
use serde::Serialize;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::application::broadcaster::EventBroadcaster;
use crate::domain::HubConfig;
use crate::infrastructure::serial::{
    self, ConnectError, EnumerationError, ReceiverSession, SendError, TransmitterSession,
};
use crate::infrastructure::storage::PortConfigStore;

/// Snapshot of both roles' connection states, served by the status API.
#[derive(Debug, Clone, Serialize)]
pub struct SupervisorStatus {
    pub receiver: SessionState,
    pub transmitter: SessionState,
}

/// Owner of both sessions, the broadcaster, and the persisted port config.
pub struct SessionSupervisor {
    broadcaster: Arc<EventBroadcaster>,
    receiver: Mutex<ReceiverSession>,
    transmitter: Mutex<TransmitterSession>,
    store: Box<dyn PortConfigStore>,
    pump: JoinHandle<()>,
}

impl SessionSupervisor {
    /// Creates the supervisor with both roles disconnected and spawns the
    /// receiver→broadcaster event pump.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: &HubConfig, store: Box<dyn PortConfigStore>) -> Arc<Self> {
        let broadcaster = Arc::new(EventBroadcaster::new(config.keepalive_interval));
        let (events_tx, mut events_rx) = mpsc::channel::<DecodedEvent>(config.event_channel_capacity);

        let pump_broadcaster = Arc::clone(&broadcaster);
        let pump = tokio::spawn(async move {
            while let Some(event) = events_rx.recv().await {
                pump_broadcaster.publish(event);
            }
        });

        Arc::new(Self {
            broadcaster,
            receiver: Mutex::new(ReceiverSession::new(config.baud_rate, events_tx)),
            transmitter: Mutex::new(TransmitterSession::new(config.baud_rate)),
            store,
            pump,
        })
    }

    /// The broadcaster, for the event-stream HTTP handler to subscribe on.
    pub fn broadcaster(&self) -> &Arc<EventBroadcaster> {
        &self.broadcaster
    }

    /// Enumerates candidate USB-serial device ports.
    ///
    /// # Errors
    ///
    /// Returns [`EnumerationError`] when the OS enumeration fails.
    pub fn list_ports(&self) -> Result<Vec<PortDescriptor>, EnumerationError> {
        serial::list_ports()
    }

    /// Connects (or, for an empty/absent path, disconnects) the given role,
    /// then persists the new path best-effort.
    ///
    /// Returns `Ok(true)` when a connection is now open, `Ok(false)` for a
    /// disconnect request. A config-store failure is logged and never
    /// propagated — the live connection state is authoritative.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectError`] when the open fails; nothing is persisted in
    /// that case.
    pub async fn connect(
        &self,
        role: SessionRole,
        path: Option<&str>,
    ) -> Result<bool, ConnectError> {
        let connected = match role {
            SessionRole::Receiver => self.receiver.lock().await.connect(path).await?,
            SessionRole::Transmitter => self.transmitter.lock().await.connect(path).await?,
        };

        let persisted_path = if connected {
            path.map(str::to_string)
        } else {
            None
        };
        self.persist_path(role, persisted_path);
        Ok(connected)
    }

    /// Sends one transmit command through the transmitter session.
    ///
    /// # Errors
    ///
    /// [`SendError::NotConnected`] when no transmitter is connected,
    /// [`SendError::WriteFailed`] when the transport errors.
    pub async fn send(&self, cmd: &TransmitCommand) -> Result<(), SendError> {
        self.transmitter.lock().await.send(cmd).await
    }

    /// Snapshot of both roles' connection states.
    pub async fn status(&self) -> SupervisorStatus {
        SupervisorStatus {
            receiver: self.receiver.lock().await.state(),
            transmitter: self.transmitter.lock().await.state(),
        }
    }

    /// Startup auto-reconnect from the persisted config.
    ///
    /// Run once at startup. Each role with a saved path gets one connect
    /// attempt; failures are logged and leave that role Disconnected/Failed
    /// without aborting startup or the other role's attempt.
    pub async fn bootstrap(&self) {
        let config = match self.store.load() {
            Ok(config) => config,
            Err(e) => {
                warn!("could not load persisted port config: {e}");
                return;
            }
        };

        for (role, path) in [
            (SessionRole::Receiver, config.receiver_path),
            (SessionRole::Transmitter, config.transmitter_path),
        ] {
            let Some(path) = path else { continue };
            match self.connect(role, Some(&path)).await {
                Ok(_) => info!("{role} reconnected to {path}"),
                Err(e) => warn!("{role} reconnect to {path} failed: {e}"),
            }
        }
    }

    /// Closes both sessions and drops every subscriber.
    pub async fn shutdown(&self) {
        self.receiver.lock().await.close();
        self.transmitter.lock().await.close();
        self.broadcaster.clear();
        self.pump.abort();
        info!("session supervisor shut down");
    }

    /// Rewrites the persisted path for `role`. Best-effort: failures are
    /// logged at warn and swallowed.
    fn persist_path(&self, role: SessionRole, path: Option<String>) {
        let mut config = match self.store.load() {
            Ok(config) => config,
            Err(e) => {
                warn!("skipping port config update, load failed: {e}");
                return;
            }
        };

        match role {
            SessionRole::Receiver => config.receiver_path = path,
            SessionRole::Transmitter => config.transmitter_path = path,
        }

        if let Err(e) = self.store.save(&config) {
            warn!("persisting port config failed: {e}");
        }
    }
}
