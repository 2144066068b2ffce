//! State Store
//!
//! A single-slot publish/subscribe store. Writers merge a patch into the
//! current state; every listener is then called synchronously with the new
//! state, in subscription order.
//!
//! # Re-entrancy
//!
//! The listener list is copied before a notification pass and no lock is held
//! while listeners run. A listener may therefore call `set_state`,
//! `subscribe` or unsubscribe itself without deadlocking. Removing a listener
//! mid-pass does not change who receives the pass in progress.
//!
//! ```text
//! set_state(patch)
//!   lock → clone state → merge → publish Arc → copy listeners → unlock
//!   for listener in copy: listener(&current state)
//! ```

mod state;

pub use state::{AppState, AppStore, StatePatch};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// State that can absorb a partial update
pub trait Merge {
    type Patch;

    /// Shallow merge: fields present in `patch` replace current values
    fn merge(&mut self, patch: Self::Patch);
}

type Listener<S> = Arc<dyn Fn(&S) + Send + Sync>;

struct Inner<S> {
    state: Arc<S>,
    listeners: Vec<(u64, Listener<S>)>,
    next_id: u64,
}

/// Instantiable store; clones share the same slot
pub struct Store<S> {
    inner: Arc<Mutex<Inner<S>>>,
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> Store<S>
where
    S: Merge + Clone + Send + Sync + 'static,
{
    /// Create a store holding `initial`
    pub fn new(initial: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: Arc::new(initial),
                listeners: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Current snapshot
    pub fn get_state(&self) -> Arc<S> {
        Arc::clone(&self.lock().state)
    }

    /// Merge `patch` and notify every listener
    ///
    /// Each listener receives the state current at the moment it is called,
    /// so after a nested `set_state` the remaining listeners see the newest
    /// state rather than the one this pass started with.
    pub fn set_state(&self, patch: S::Patch) {
        let listeners: Vec<Listener<S>> = {
            let mut inner = self.lock();
            let mut next = S::clone(&inner.state);
            next.merge(patch);
            inner.state = Arc::new(next);

            inner
                .listeners
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect()
        };

        tracing::trace!(listeners = listeners.len(), "Notifying store listeners");

        for listener in listeners {
            let state = self.get_state();
            listener(&state);
        }
    }

    /// Register a listener
    ///
    /// The listener stays registered until the returned handle's
    /// [`Subscription::unsubscribe`] is called. Dropping the handle does not
    /// unsubscribe.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        let listener: Listener<S> = Arc::new(listener);
        let id = {
            let mut inner = self.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.push((id, listener));
            id
        };

        tracing::trace!(listener_id = id, "Store listener subscribed");

        let weak: Weak<Mutex<Inner<S>>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
                inner.listeners.retain(|(listener_id, _)| *listener_id != id);
                tracing::trace!(listener_id = id, "Store listener removed");
            }
        })
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    fn lock(&self) -> MutexGuard<'_, Inner<S>> {
        // Listeners never run under this lock, so a poisoned mutex still holds
        // a consistent state.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("Store")
            .field("state", &inner.state)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

/// Handle returned by [`Store::subscribe`]
pub struct Subscription {
    cancel: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl Subscription {
    fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Mutex::new(Some(Box::new(cancel))),
        }
    }

    /// Remove the listener; calling this more than once is a no-op
    pub fn unsubscribe(&self) {
        let cancel = self
            .cancel
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(cancel) = cancel {
            cancel();
        }
    }

    /// Whether `unsubscribe` has already run
    pub fn is_active(&self) -> bool {
        self.cancel
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
