//! Fan-out hub feeding live sessions.
//!
//! Each live session holds a [`Subscription`] with a bounded queue. Publishing
//! never blocks: a subscriber whose queue is full or whose receiver is gone is
//! dropped from the hub, and the remaining subscribers still get the event.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

use crate::domain::LedgerEvent;
use crate::domain::ports::ChangeBroadcaster;

/// Events a subscriber may have queued before it counts as lagging.
pub const DEFAULT_SUBSCRIBER_CAPACITY: usize = 64;

#[derive(Debug)]
struct HubState {
    next_id: u64,
    capacity: usize,
    subscribers: BTreeMap<u64, mpsc::Sender<Arc<LedgerEvent>>>,
}

/// [`ChangeBroadcaster`] that pushes events to every live session.
#[derive(Debug, Clone)]
pub struct SessionHub {
    inner: Arc<Mutex<HubState>>,
}

impl Default for SessionHub {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_SUBSCRIBER_CAPACITY)
    }
}

impl SessionHub {
    /// Hub whose subscribers may queue up to `capacity` events each.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HubState {
                next_id: 0,
                capacity: capacity.max(1),
                subscribers: BTreeMap::new(),
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, HubState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new live session.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        let mut state = self.state();
        let (sender, receiver) = mpsc::channel(state.capacity);
        let id = state.next_id;
        state.next_id = state.next_id.saturating_add(1);
        state.subscribers.insert(id, sender);
        debug!(subscriber = id, live = state.subscribers.len(), "session subscribed");
        Subscription {
            id,
            receiver,
            hub: Arc::downgrade(&self.inner),
        }
    }

    /// Number of sessions currently subscribed.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.state().subscribers.len()
    }
}

impl ChangeBroadcaster for SessionHub {
    fn publish(&self, event: &LedgerEvent) {
        let shared = Arc::new(event.clone());
        let mut state = self.state();
        let mut dropped = Vec::new();
        for (id, sender) in &state.subscribers {
            match sender.try_send(Arc::clone(&shared)) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    warn!(subscriber = id, kind = event.kind(), "session lagging; dropped");
                    dropped.push(*id);
                }
                Err(TrySendError::Closed(_)) => dropped.push(*id),
            }
        }
        for id in dropped {
            state.subscribers.remove(&id);
        }
    }
}

/// A live session's view of the hub. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    receiver: mpsc::Receiver<Arc<LedgerEvent>>,
    hub: Weak<Mutex<HubState>>,
}

impl Subscription {
    /// Hub-assigned identifier.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Next event; `None` once the hub has dropped this subscriber.
    pub async fn recv(&mut self) -> Option<Arc<LedgerEvent>> {
        self.receiver.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .subscribers
                .remove(&self.id);
        }
    }
}
