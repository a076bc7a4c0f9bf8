//! Transport event fan-out with scoped subscriptions.
//!
//! Transports publish [`TransportEvent`]s from their reader threads; each
//! consumer holds a [`Subscription`]. Dropping the subscription unregisters it,
//! so a session's listener lives exactly as long as the session.

use crate::source::TransportEvent;
use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tracing::trace;

#[derive(Debug, Default)]
struct HubInner {
    next_id: u64,
    listeners: HashMap<u64, Sender<TransportEvent>>,
}

/// Publish/subscribe point between transports and sessions.
///
/// Cheap to clone; clones share the same listener table.
#[derive(Debug, Clone, Default)]
pub struct EventHub {
    inner: Arc<Mutex<HubInner>>,
}

impl EventHub {
    /// Create a hub with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener.
    ///
    /// Events published after this call are queued on the returned
    /// subscription until it is drained or dropped.
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel();
        let mut inner = lock(&self.inner);
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.insert(id, tx);
        trace!(id, "Listener registered");

        Subscription {
            id,
            receiver: rx,
            hub: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver `event` to every registered listener.
    ///
    /// Returns the number of listeners that received it.
    pub fn publish(&self, event: TransportEvent) -> usize {
        let mut inner = lock(&self.inner);
        // Listeners whose receiver is gone are pruned here.
        inner
            .listeners
            .retain(|_, tx| tx.send(event.clone()).is_ok());
        inner.listeners.len()
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        lock(&self.inner).listeners.len()
    }
}

/// Registration handle returned by [`EventHub::subscribe`].
///
/// Unregisters itself on drop.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    receiver: Receiver<TransportEvent>,
    hub: Weak<Mutex<HubInner>>,
}

impl Subscription {
    /// Take every queued event without blocking.
    pub fn drain(&self) -> Vec<TransportEvent> {
        self.receiver.try_iter().collect()
    }

    /// Wait up to `timeout` for the next event.
    ///
    /// Returns `None` on timeout or when every publisher is gone.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<TransportEvent> {
        match self.receiver.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.hub.upgrade() {
            lock(&inner).listeners.remove(&self.id);
            trace!(id = self.id, "Listener released");
        }
    }
}

fn lock(inner: &Mutex<HubInner>) -> MutexGuard<'_, HubInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}
