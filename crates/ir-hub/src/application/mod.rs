//! Application layer: event fan-out and session supervision.
//!
//! - [`broadcaster`] — delivers every decoded event to every live subscriber
//!   and keeps idle streams alive.
//! - [`supervisor`] — owns the two serial sessions plus the broadcaster and
//!   wires them together.

pub mod broadcaster;
pub mod supervisor;

pub use broadcaster::{EventBroadcaster, SubscriberId};
pub use supervisor::{SessionSupervisor, SupervisorStatus};
