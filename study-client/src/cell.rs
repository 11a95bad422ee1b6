//! Observable store cells.
//!
//! A [`StoreCell`] wraps one of the pure stores from `studyhall-core` in
//! shared, observable state: clones share the same store, every mutation
//! bumps a revision counter, and screens subscribe to the counter to know
//! when to re-read.
//!
//! This replaces the source app's module-level store singletons with an
//! injected, application-scoped object - resetting state between tests is a
//! constructor call, not a global reset API.

use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// Shared, observable wrapper around a pure store.
#[derive(Debug)]
pub struct StoreCell<S> {
    state: Arc<Mutex<S>>,
    revision: Arc<watch::Sender<u64>>,
}

impl<S> StoreCell<S> {
    /// Wrap an initial store value.
    pub fn new(initial: S) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            state: Arc::new(Mutex::new(initial)),
            revision: Arc::new(revision),
        }
    }

    /// Read the store through a closure.
    ///
    /// The lock is held only for the duration of the closure; never await
    /// inside it.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        let state = self.state.lock().unwrap();
        f(&state)
    }

    /// Mutate the store through a closure and notify subscribers.
    ///
    /// The mutation is applied atomically with respect to this cell - no
    /// partial-write visibility.
    pub fn mutate<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let result = {
            let mut state = self.state.lock().unwrap();
            f(&mut state)
        };
        self.revision.send_modify(|rev| *rev = rev.wrapping_add(1));
        result
    }

    /// Subscribe to mutation notifications.
    ///
    /// The received value is a revision counter; its only meaning is "the
    /// store changed, re-read it".
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Current revision counter.
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }
}

impl<S> Clone for StoreCell<S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            revision: Arc::clone(&self.revision),
        }
    }
}

impl<S: Default> Default for StoreCell<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}
