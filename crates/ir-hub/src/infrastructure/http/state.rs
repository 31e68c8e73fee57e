//! Shared state for the API handlers.

use std::sync::Arc;

use crate::application::SessionSupervisor;

/// Application state cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    /// The device session manager; the only route to the serial sessions.
    pub supervisor: Arc<SessionSupervisor>,
}

impl AppState {
    pub fn new(supervisor: Arc<SessionSupervisor>) -> Self {
        Self { supervisor }
    }
}
