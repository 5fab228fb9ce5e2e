//! In-process broadcast hubs.
//!
//! A hub is a multicast channel with synchronous fan-out: `publish` invokes
//! every listener registered at publish time, in subscription order, and
//! returns after the last one. There is no buffering and no replay for late
//! subscribers. Hubs never mutate subscriber state; they only notify.
//!
//! Hubs are explicitly constructed and passed down to the views that need
//! them; there is no process-wide singleton. Subscription lifetime is
//! scoped: the returned handle cancels on drop, so a view teardown releases
//! its listener entry deterministically instead of leaking it.

mod cart;
mod stock;

pub use cart::CartHub;
pub use stock::{StockHub, StockUpdate};

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type ListenerFn<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Listener<T> {
    id: u64,
    callback: ListenerFn<T>,
}

struct HubInner<T> {
    /// Listeners in subscription order; delivery follows this order.
    listeners: Mutex<Vec<Listener<T>>>,
    next_id: AtomicU64,
}

impl<T> HubInner<T> {
    fn remove(&self, id: u64) {
        lock(&self.listeners).retain(|l| l.id != id);
    }
}

/// Recover the guard even if a listener panicked while registered.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A multicast channel delivering events to subscribers synchronously.
pub struct Hub<T> {
    inner: Arc<HubInner<T>>,
}

impl<T> Clone for Hub<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for Hub<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Hub<T> {
    /// Create a hub with no listeners.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(HubInner {
                listeners: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Register a listener. Delivery happens in subscription order. The
    /// returned handle cancels the subscription when dropped or when
    /// [`Subscription::cancel`] is called.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
        T: 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.inner.listeners).push(Listener {
            id,
            callback: Arc::new(listener),
        });

        let weak: Weak<HubInner<T>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.remove(id);
            }
        })
    }

    /// Deliver `event` to every listener registered right now, in
    /// subscription order, then return.
    ///
    /// The listener list is snapshotted before delivery, so a listener may
    /// subscribe or cancel mid-delivery without deadlocking; one that
    /// cancels mid-delivery may still receive the in-flight event.
    pub fn publish(&self, event: &T) {
        let snapshot: Vec<ListenerFn<T>> = lock(&self.inner.listeners)
            .iter()
            .map(|l| Arc::clone(&l.callback))
            .collect();
        for callback in snapshot {
            callback(event);
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        lock(&self.inner.listeners).len()
    }
}

impl<T> fmt::Debug for Hub<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hub")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// RAII handle for one hub subscription.
///
/// Cancellation is idempotent and immediately stops further delivery.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    fn new<F>(cancel: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Cancel the subscription now. Calling this twice is harmless.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
