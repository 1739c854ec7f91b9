//! Reactive handle over a page controller
//!
//! Controllers keep their state behind a mutex; views read snapshots through
//! [`Controller::read`], which subscribes to a trigger fired after every
//! change.

use leptos::*;
use std::future::Future;
use std::sync::Arc;

pub struct Controller<C: 'static> {
    inner: StoredValue<Arc<C>>,
    changed: Trigger,
    pending: RwSignal<usize>,
}

impl<C: 'static> Clone for Controller<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: 'static> Copy for Controller<C> {}

impl<C: 'static> Controller<C> {
    pub fn new(controller: C) -> Self {
        Self {
            inner: store_value(Arc::new(controller)),
            changed: create_trigger(),
            pending: create_rw_signal(0),
        }
    }

    /// Read controller state, re-running on every change
    pub fn read<R>(&self, f: impl FnOnce(&C) -> R) -> R {
        self.changed.track();
        self.inner.with_value(|c| f(c))
    }

    /// Synchronous mutation (setters)
    pub fn update(&self, f: impl FnOnce(&C)) {
        self.inner.with_value(|c| f(c));
        self.changed.notify();
    }

    /// True while any spawned action is still running
    pub fn busy(&self) -> bool {
        self.pending.get() > 0
    }

    /// Run an async action and notify views when it settles
    pub fn spawn<F, Fut>(&self, action: F)
    where
        F: FnOnce(Arc<C>) -> Fut,
        Fut: Future<Output = ()> + 'static,
    {
        let controller = self.inner.get_value();
        let changed = self.changed;
        let pending = self.pending;

        pending.update(|n| *n += 1);
        let fut = action(controller);
        spawn_local(async move {
            fut.await;
            pending.update(|n| *n = n.saturating_sub(1));
            changed.notify();
        });
    }
}
