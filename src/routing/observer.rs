//! Ordered subscriber list.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

type Callback = Arc<dyn Fn() + Send + Sync>;

/// Handle returned by [`Observer::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Callbacks invoked with no arguments, in subscription order.
#[derive(Default)]
pub struct Observer {
    next_id: AtomicU64,
    subscribers: Mutex<Vec<(SubscriptionId, Callback)>>,
}

impl std::fmt::Debug for Observer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observer")
            .field("subscribers", &self.len())
            .finish()
    }
}

impl Observer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, f: impl Fn() + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.with_subscribers(|subs| subs.push((id, Arc::new(f))));
        id
    }

    /// Remove a subscriber. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.with_subscribers(|subs| {
            let before = subs.len();
            subs.retain(|(sid, _)| *sid != id);
            subs.len() != before
        })
    }

    /// Call every subscriber once.
    ///
    /// The list is snapshotted first, so callbacks may subscribe or
    /// unsubscribe without deadlocking; changes apply from the next notify.
    pub fn notify(&self) {
        let snapshot: Vec<Callback> =
            self.with_subscribers(|subs| subs.iter().map(|(_, f)| Arc::clone(f)).collect());
        for callback in snapshot {
            callback();
        }
    }

    pub fn len(&self) -> usize {
        self.with_subscribers(|subs| subs.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_subscribers<R>(&self, f: impl FnOnce(&mut Vec<(SubscriptionId, Callback)>) -> R) -> R {
        let mut guard = match self.subscribers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }
}
