//! Stock-level broadcast hub.

use super::{lock, Hub, Subscription};
use spindle_engine::RecordId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A stock-level change. `stock` is always the post-update absolute level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockUpdate {
    /// Record whose stock changed
    pub record_id: RecordId,
    /// New absolute stock level, non-negative
    pub stock: i64,
}

/// Multicast channel for stock-level changes.
///
/// Producers publish either an absolute level ([`StockHub::set`], used by
/// catalog loads) or a signed delta ([`StockHub::adjust`], used by cart
/// call sites); the hub owns the absolute running value per record, so
/// subscribers uniformly receive absolute post-update levels. Late
/// subscribers get no replay.
#[derive(Debug, Clone, Default)]
pub struct StockHub {
    hub: Hub<StockUpdate>,
    levels: Arc<Mutex<HashMap<RecordId, i64>>>,
}

impl StockHub {
    /// Create a hub with no listeners and no known levels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for stock updates.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&StockUpdate) + Send + Sync + 'static,
    {
        self.hub.subscribe(listener)
    }

    /// Publish an absolute stock level, seeding the running value.
    pub fn set(&self, record_id: RecordId, stock: i64) {
        let stock = stock.max(0);
        lock(&self.levels).insert(record_id, stock);
        self.hub.publish(&StockUpdate { record_id, stock });
    }

    /// Publish a signed delta against the running value, clamped at zero.
    ///
    /// A delta for a record no producer has ever `set` cannot be resolved
    /// to an absolute level; it is dropped with a diagnostic.
    pub fn adjust(&self, record_id: RecordId, delta: i64) {
        let stock = {
            let mut levels = lock(&self.levels);
            match levels.get_mut(&record_id) {
                Some(level) => {
                    *level = (*level + delta).max(0);
                    Some(*level)
                }
                None => None,
            }
        };

        match stock {
            Some(stock) => self.hub.publish(&StockUpdate { record_id, stock }),
            None => {
                tracing::debug!(record_id, delta, "stock adjust for unseen record dropped");
            }
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.hub.listener_count()
    }
}
