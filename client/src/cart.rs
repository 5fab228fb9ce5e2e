//! Optimistic cart mutations.
//!
//! Add/remove intents mutate the owning view immediately, then issue the
//! remote call and reconcile once the outcome is known. Every operation
//! carries a per-record sequence ticket; a completion whose ticket has been
//! superseded is discarded, so racing in-flight operations against the
//! same record can never clobber each other's state.

use crate::api::CartGateway;
use crate::catalog::CatalogViewHandle;
use crate::error::Result;
use crate::hub::{CartHub, StockHub};
use crate::identity::IdentityWatch;
use spindle_engine::{CartSequencer, OpTicket, RecordId};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Executes cart intents against one catalog view.
pub struct CartOptimisticUpdater<G> {
    gateway: Arc<G>,
    view: CatalogViewHandle,
    sequencer: Mutex<CartSequencer>,
    stock_hub: StockHub,
    cart_hub: CartHub,
    identity: IdentityWatch,
}

impl<G: CartGateway> CartOptimisticUpdater<G> {
    /// Create an updater bound to one view and the shared hubs.
    pub fn new(
        gateway: Arc<G>,
        view: CatalogViewHandle,
        stock_hub: StockHub,
        cart_hub: CartHub,
        identity: IdentityWatch,
    ) -> Self {
        Self {
            gateway,
            view,
            sequencer: Mutex::new(CartSequencer::new()),
            stock_hub,
            cart_hub,
            identity,
        }
    }

    fn sequencer(&self) -> MutexGuard<'_, CartSequencer> {
        self.sequencer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn signed_in(&self) -> bool {
        self.identity.borrow().is_some()
    }

    /// Add one unit of `record_id` to the cart.
    ///
    /// Without an identity this is a no-op: no state change, no network
    /// call. Otherwise the view is mutated optimistically before the
    /// remote call resolves; a failure rolls the record back to
    /// out-of-cart entirely (unconditional reset, not a decrement).
    pub async fn add_to_cart(&self, record_id: RecordId) -> Result<()> {
        if !self.signed_in() {
            tracing::debug!(record_id, "cart add ignored without identity");
            return Ok(());
        }
        if self
            .view
            .update_record(record_id, |r| r.add_to_cart())
            .is_none()
        {
            tracing::debug!(record_id, "cart add ignored; record not in view");
            return Ok(());
        }
        let ticket = self.sequencer().issue(record_id);

        match self.gateway.add_item(record_id).await {
            Ok(snapshot) => {
                if self.settle(&ticket) {
                    self.cart_hub.publish(&snapshot);
                    self.stock_hub.adjust(record_id, -1);
                }
                Ok(())
            }
            Err(err) => {
                if self.settle(&ticket) {
                    self.view.update_record(record_id, |r| r.reset_cart());
                    self.view.surface_error(err.surface_message());
                }
                tracing::warn!(error = %err, record_id, "cart add failed; rolled back");
                Err(err)
            }
        }
    }

    /// Remove one unit of `record_id` from the cart.
    ///
    /// A no-op without an identity or when the record is not currently
    /// marked in-cart. The optimistic decrement floors at zero; a failure
    /// puts the unit back and forces in-cart regardless of the floor.
    pub async fn remove_from_cart(&self, record_id: RecordId) -> Result<()> {
        if !self.signed_in() {
            tracing::debug!(record_id, "cart remove ignored without identity");
            return Ok(());
        }
        match self.view.record(record_id) {
            Some(record) if record.in_cart => {}
            _ => {
                tracing::debug!(record_id, "cart remove ignored; record not in cart");
                return Ok(());
            }
        }
        self.view.update_record(record_id, |r| r.remove_from_cart());
        let ticket = self.sequencer().issue(record_id);

        match self.gateway.remove_item(record_id).await {
            Ok(snapshot) => {
                if self.settle(&ticket) {
                    self.cart_hub.publish(&snapshot);
                    self.stock_hub.adjust(record_id, 1);
                }
                Ok(())
            }
            Err(err) => {
                if self.settle(&ticket) {
                    self.view.update_record(record_id, |r| r.restore_to_cart());
                    self.view.surface_error(err.surface_message());
                }
                tracing::warn!(error = %err, record_id, "cart remove failed; rolled back");
                Err(err)
            }
        }
    }

    /// Settle a completed operation; `false` means a newer operation
    /// superseded this one and its reconciliation must be discarded.
    fn settle(&self, ticket: &OpTicket) -> bool {
        let applied = self.sequencer().settle(ticket);
        if !applied {
            tracing::debug!(
                record_id = ticket.record_id,
                seq = ticket.seq,
                "stale cart reconciliation discarded"
            );
        }
        applied
    }
}
