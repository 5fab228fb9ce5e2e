//! Cart contents broadcast hub.

use super::{Hub, Subscription};
use spindle_engine::CartSnapshot;

/// Multicast channel distributing the full cart contents whenever they
/// change. Stateless: no replay, no last-known snapshot.
#[derive(Debug, Clone, Default)]
pub struct CartHub {
    hub: Hub<CartSnapshot>,
}

impl CartHub {
    /// Create a hub with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for cart snapshots.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&CartSnapshot) + Send + Sync + 'static,
    {
        self.hub.subscribe(listener)
    }

    /// Deliver the current cart contents to every subscriber.
    pub fn publish(&self, snapshot: &CartSnapshot) {
        self.hub.publish(snapshot);
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.hub.listener_count()
    }
}
