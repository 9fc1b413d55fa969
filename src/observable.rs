//! Change-notifying value container.
//!
//! An explicit event-emitting value type: handlers subscribe to one value
//! and are invoked only when `set` actually changes it (equality check).
//! One typed `Observable` per field replaces dynamic property interception;
//! the contract is the explicit `subscribe`/`set` interface.

use std::sync::{Arc, Mutex};

/// Handle returned by [`Observable::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Inner<T> {
    value: T,
    next_id: u64,
    handlers: Vec<(SubscriptionId, Handler<T>)>,
}

/// A value that notifies subscribers on change.
///
/// Thread-safe; handlers run on the thread that calls [`Observable::set`],
/// after the internal lock is released, so a handler may freely read the
/// observable again.
pub struct Observable<T: Clone + PartialEq> {
    inner: Mutex<Inner<T>>,
}

impl<T: Clone + PartialEq> Observable<T> {
    /// Create an observable holding `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            inner: Mutex::new(Inner {
                value: initial,
                next_id: 0,
                handlers: Vec::new(),
            }),
        }
    }

    /// Current value.
    pub fn get(&self) -> T {
        self.inner.lock().unwrap().value.clone()
    }

    /// Register a change handler; it fires on every effective change until
    /// unsubscribed. The handler is not called with the current value.
    pub fn subscribe(&self, handler: impl Fn(&T) + Send + Sync + 'static) -> SubscriptionId {
        let mut inner = self.inner.lock().unwrap();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.handlers.push((id, Arc::new(handler)));
        id
    }

    /// Remove a previously registered handler. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut inner = self.inner.lock().unwrap();
        inner.handlers.retain(|(sid, _)| *sid != id);
    }

    /// Store a new value, notifying subscribers only if it differs from the
    /// current one. Returns whether a change happened.
    pub fn set(&self, value: T) -> bool {
        // Swap under the lock, notify outside it.
        let handlers: Vec<Handler<T>> = {
            let mut inner = self.inner.lock().unwrap();
            if inner.value == value {
                return false;
            }
            inner.value = value.clone();
            inner.handlers.iter().map(|(_, h)| h.clone()).collect()
        };
        for handler in handlers {
            handler(&value);
        }
        true
    }

    /// Apply `f` to a copy of the current value and store the result,
    /// with the same change-only notification as [`Observable::set`].
    pub fn update(&self, f: impl FnOnce(&mut T)) -> bool {
        let mut value = self.get();
        f(&mut value);
        self.set(value)
    }
}
