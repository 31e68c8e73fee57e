//! EventBroadcaster: fan-out of decoded events to live subscribers.
//!
//! The broadcaster is the daemon's in-memory registry of every open event
//! stream. Each entry tracks:
//!
//! - An unbounded frame channel to the subscriber's HTTP response body.
//! - The subscriber's private keepalive task, ticking every 30 seconds.
//!
//! # Ordering and failure isolation
//!
//! For a single subscriber, frames arrive in publish order (one mpsc channel
//! per subscriber). Across subscribers no order is guaranteed. A subscriber
//! whose channel has closed (browser tab gone) is pruned during the next
//! `publish`; its failure never affects delivery to the others.
//!
//! # Locking
//!
//! The subscriber map sits behind a `std::sync::Mutex`: every operation on it
//! is a short, non-blocking critical section (unbounded sends never block),
//! and the lock is never held across an `.await`.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use ir_core::{DecodedEvent, SseFrame};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace};
use uuid::Uuid;

/// Opaque handle identifying one subscriber.
pub type SubscriberId = Uuid;

/// One live subscriber: its frame channel and keepalive timer task.
struct SubscriberEntry {
    tx: mpsc::UnboundedSender<SseFrame>,
    keepalive: JoinHandle<()>,
}

/// Registry of live event-stream subscribers.
pub struct EventBroadcaster {
    keepalive_interval: Duration,
    subscribers: Mutex<HashMap<SubscriberId, SubscriberEntry>>,
}

impl EventBroadcaster {
    pub fn new(keepalive_interval: Duration) -> Self {
        Self {
            keepalive_interval,
            subscribers: Mutex::new(HashMap::new()),
        }
    }

    /// Registers a new subscriber and returns its handle plus the receiving
    /// end of its frame channel.
    ///
    /// A keepalive task is spawned that pushes a `: keepalive` frame to this
    /// subscriber (and only this subscriber) every `keepalive_interval`,
    /// independent of real events. The task ends on its own once the
    /// subscriber's channel closes.
    pub fn subscribe(&self) -> (SubscriberId, mpsc::UnboundedReceiver<SseFrame>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();

        // The keepalive task holds only a weak sender: the channel closes the
        // moment the registry entry is dropped, not when the timer task is
        // eventually reaped.
        let keepalive_tx = tx.downgrade();
        let interval = self.keepalive_interval;
        let keepalive = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick of a tokio interval fires immediately; consume
            // it so the first keepalive goes out one full interval after
            // subscription.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(tx) = keepalive_tx.upgrade() else {
                    break;
                };
                if tx.send(SseFrame::KeepAlive).is_err() {
                    break;
                }
            }
        });

        let mut subs = self.subscribers.lock().unwrap_or_else(|e| e.into_inner());
        subs.insert(id, SubscriberEntry { tx, keepalive });
        debug!("subscriber {id} registered ({} total)", subs.len());
        (id, rx)
    }

    /// Removes a subscriber and stops its keepalive timer.
    ///
    /// Idempotent: unsubscribing an already-removed handle is a no-op.
    pub fn unsubscribe(&self, id: SubscriberId) {
        let removed = {
            let mut subs = self.subscribers.lock().unwrap_or_else(|e| e.into_inner());
            subs.remove(&id)
        };
        if let Some(entry) = removed {
            entry.keepalive.abort();
            debug!("subscriber {id} removed");
        }
    }

    /// Delivers `event` to every currently-registered subscriber.
    ///
    /// Subscribers whose channel has closed are pruned; delivery to the rest
    /// is unaffected. No history is buffered — a subscriber only sees events
    /// published while it is registered.
    pub fn publish(&self, event: DecodedEvent) {
        let frame = SseFrame::Event(event);
        let mut subs = self.subscribers.lock().unwrap_or_else(|e| e.into_inner());

        let mut dead: Vec<SubscriberId> = Vec::new();
        for (id, entry) in subs.iter() {
            if entry.tx.send(frame.clone()).is_err() {
                dead.push(*id);
            }
        }
        for id in dead {
            if let Some(entry) = subs.remove(&id) {
                entry.keepalive.abort();
                debug!("subscriber {id} channel closed; pruned");
            }
        }
        trace!("event delivered to {} subscriber(s)", subs.len());
    }

    /// Number of currently-registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    /// Drops every subscriber and stops all keepalive timers.
    ///
    /// Called once at shutdown; closing the frame channels ends the
    /// subscribers' HTTP response bodies.
    pub fn clear(&self) {
        let mut subs = self.subscribers.lock().unwrap_or_else(|e| e.into_inner());
        for (_, entry) in subs.drain() {
            entry.keepalive.abort();
        }
    }
}

impl Drop for EventBroadcaster {
    fn drop(&mut self) {
        self.clear();
    }
}
