//! Catalog view coordinator.
//!
//! One coordinator instance backs one open catalog view. It owns the
//! authoritative record lists, keeps them converged with global state
//! through its hub subscriptions, and publishes derived view state through
//! a watch channel the rendering layer observes.
//!
//! Locking discipline: the state mutex is never held across an `.await`
//! and never held while publishing to a hub, because hub callbacks
//! synchronously re-enter this same state.

use crate::api::{normalize_payload, CatalogApi};
use crate::error::{ClientError, Result};
use crate::hub::{CartHub, StockHub, Subscription};
use spindle_engine::{validate_draft, CartSnapshot, CatalogView, Group, GroupId, Record, RecordId};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

/// Derived view state consumed by the rendering layer.
#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    /// The filtered record list
    pub records: Vec<Arc<Record>>,
    /// Whether a load is in flight
    pub loading: bool,
    /// Message of the last surfaced error, if any
    pub error: Option<String>,
}

struct CatalogShared {
    view: CatalogView,
    /// Most recent cart snapshot seen; re-applied after every reload so
    /// cart membership never waits for the next broadcast
    last_cart: Option<CartSnapshot>,
    loading: bool,
    error: Option<String>,
    output: watch::Sender<CatalogState>,
}

impl CatalogShared {
    fn publish(&self) {
        self.output.send_replace(CatalogState {
            records: self.view.filtered_list(),
            loading: self.loading,
            error: self.error.clone(),
        });
    }
}

fn lock_shared(shared: &Mutex<CatalogShared>) -> MutexGuard<'_, CatalogShared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shared access to one catalog view's state, handed to collaborators that
/// mutate it on the coordinator's behalf (the cart updater).
#[derive(Clone)]
pub struct CatalogViewHandle {
    shared: Arc<Mutex<CatalogShared>>,
}

impl CatalogViewHandle {
    /// Current copy of one record from the base list.
    pub(crate) fn record(&self, id: RecordId) -> Option<Arc<Record>> {
        lock_shared(&self.shared).view.get(id).cloned()
    }

    /// Replace one record in both lists via `mutate` and republish the
    /// view state. Returns the new record, or `None` when no record
    /// matches.
    pub(crate) fn update_record<F>(&self, id: RecordId, mutate: F) -> Option<Arc<Record>>
    where
        F: FnOnce(&mut Record),
    {
        let state = &mut *lock_shared(&self.shared);
        let updated = state.view.update_record(id, mutate);
        if updated.is_some() {
            state.publish();
        }
        updated
    }

    /// Surface an error message on the view.
    pub(crate) fn surface_error(&self, message: String) {
        let mut state = lock_shared(&self.shared);
        state.error = Some(message);
        state.publish();
    }
}

/// Coordinator owning the record list for one catalog view.
pub struct CatalogSyncCoordinator<A> {
    api: Arc<A>,
    shared: Arc<Mutex<CatalogShared>>,
    stock_hub: StockHub,
    output: watch::Receiver<CatalogState>,
    /// Hub entries are released when the coordinator is dropped
    _subscriptions: [Subscription; 2],
}

impl<A: CatalogApi> CatalogSyncCoordinator<A> {
    /// Create a coordinator and subscribe it to both hubs. The
    /// subscriptions live exactly as long as the coordinator.
    pub fn new(api: Arc<A>, stock_hub: &StockHub, cart_hub: &CartHub) -> Self {
        let (tx, rx) = watch::channel(CatalogState::default());
        let shared = Arc::new(Mutex::new(CatalogShared {
            view: CatalogView::new(),
            last_cart: None,
            loading: false,
            error: None,
            output: tx,
        }));

        let stock_shared = Arc::clone(&shared);
        let stock_sub = stock_hub.subscribe(move |event| {
            let state = &mut *lock_shared(&stock_shared);
            if state.view.apply_stock(event.record_id, event.stock) {
                state.publish();
            }
        });

        let cart_shared = Arc::clone(&shared);
        let cart_sub = cart_hub.subscribe(move |snapshot| {
            let state = &mut *lock_shared(&cart_shared);
            state.last_cart = Some(snapshot.clone());
            state.view.apply_cart(snapshot);
            state.publish();
        });

        Self {
            api,
            shared,
            stock_hub: stock_hub.clone(),
            output: rx,
            _subscriptions: [stock_sub, cart_sub],
        }
    }

    /// Receiver for derived view state; the rendering layer awaits changes.
    pub fn output(&self) -> watch::Receiver<CatalogState> {
        self.output.clone()
    }

    /// The view state right now.
    pub fn current(&self) -> CatalogState {
        self.output.borrow().clone()
    }

    /// Handle for collaborators that mutate this view (the cart updater).
    pub fn handle(&self) -> CatalogViewHandle {
        CatalogViewHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    fn state(&self) -> MutexGuard<'_, CatalogShared> {
        lock_shared(&self.shared)
    }

    fn surface(&self, err: &ClientError) {
        let mut state = self.state();
        state.error = Some(err.surface_message());
        state.publish();
    }

    /// Fetch records and groups, join group names, install the result, and
    /// publish every record's absolute stock so already-open views
    /// converge.
    ///
    /// A group fetch failure degrades: the records are still shown,
    /// unjoined, and the error is surfaced. A record fetch failure leaves
    /// the list empty and surfaces the error.
    pub async fn load(&self) -> Result<()> {
        {
            let mut state = self.state();
            state.loading = true;
            state.error = None;
            state.publish();
        }

        let (records_payload, groups_payload) =
            tokio::join!(self.api.fetch_records(), self.api.fetch_groups());

        let records = match records_payload {
            Ok(payload) => normalize_payload::<Record>(payload, Record::looks_like, "records"),
            Err(err) => return Err(self.fail_load(err)),
        };

        let (groups, group_error) = match groups_payload {
            Ok(payload) => (
                normalize_payload::<Group>(payload, Group::looks_like, "groups"),
                None,
            ),
            Err(err) => {
                tracing::warn!(error = %err, "group fetch failed; records shown unjoined");
                (Vec::new(), Some(err))
            }
        };

        tracing::debug!(
            records = records.len(),
            groups = groups.len(),
            "catalog loaded"
        );
        self.install_and_publish(records, &groups, group_error)
    }

    /// Load the per-group record listing instead of the full catalog.
    /// Shares the record-fetch semantics of [`Self::load`], including the
    /// join, cart re-application, and stock publication.
    pub async fn load_group(&self, group_id: GroupId) -> Result<()> {
        {
            let mut state = self.state();
            state.loading = true;
            state.error = None;
            state.publish();
        }

        let (records_payload, group_payload) = tokio::join!(
            self.api.fetch_records_by_group(group_id),
            self.api.fetch_group(group_id)
        );

        let records = match records_payload {
            Ok(payload) => normalize_payload::<Record>(payload, Record::looks_like, "records"),
            Err(err) => return Err(self.fail_load(err)),
        };

        let (groups, group_error) = match group_payload {
            Ok(payload) => match serde_json::from_value::<Group>(payload) {
                Ok(group) => (vec![group], None),
                Err(_) => {
                    tracing::warn!(group_id, "group payload failed to decode; shown unjoined");
                    (Vec::new(), None)
                }
            },
            Err(err) => {
                tracing::warn!(error = %err, group_id, "group fetch failed; records shown unjoined");
                (Vec::new(), Some(err))
            }
        };

        self.install_and_publish(records, &groups, group_error)
    }

    /// Record-fetch failure path: empty list plus a surfaced error.
    fn fail_load(&self, err: ClientError) -> ClientError {
        tracing::warn!(error = %err, "record fetch failed");
        let mut state = self.state();
        state.view.clear();
        state.loading = false;
        state.error = Some(err.surface_message());
        state.publish();
        err
    }

    /// Common tail of the load paths: install the joined list, re-apply
    /// the last seen cart snapshot, and seed the stock hub.
    fn install_and_publish(
        &self,
        records: Vec<Record>,
        groups: &[Group],
        error: Option<ClientError>,
    ) -> Result<()> {
        let stock_levels;
        {
            let mut state = self.state();
            state.view.install(records, groups);
            if let Some(snapshot) = state.last_cart.clone() {
                state.view.apply_cart(&snapshot);
            }
            state.loading = false;
            state.error = error.as_ref().map(ClientError::surface_message);
            stock_levels = state.view.stock_levels();
            state.publish();
        }

        // Publishing re-enters this coordinator's own stock subscription;
        // the state lock is already released.
        for (record_id, stock) in stock_levels {
            self.stock_hub.set(record_id, stock);
        }

        match error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Apply a signed stock correction server-side; on success the hub
    /// resolves the delta and every open view converges.
    pub async fn adjust_stock(&self, id: RecordId, delta: i64) -> Result<()> {
        match self.api.update_stock(id, delta).await {
            Ok(()) => {
                self.stock_hub.adjust(id, delta);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, record_id = id, "stock adjustment failed");
                self.surface(&err);
                Err(err)
            }
        }
    }

    /// Synchronous substring filter over the installed list.
    pub fn search(&self, text: &str) {
        let state = &mut *self.state();
        state.view.search(text);
        state.publish();
    }

    /// Create or update a record from a draft. Success triggers a full
    /// reload, never a local merge; failure leaves the draft intact for
    /// correction. Validation failures never reach the network.
    pub async fn save(&self, draft: &Record) -> Result<()> {
        if let Err(err) = validate_draft(draft) {
            let err = ClientError::from(err);
            self.surface(&err);
            return Err(err);
        }

        let result = if draft.is_draft() {
            self.api.create_record(draft).await
        } else {
            self.api.update_record(draft).await
        };

        match result {
            Ok(()) => self.load().await,
            Err(err) => {
                tracing::warn!(error = %err, record_id = draft.id, "save failed; draft left intact");
                self.surface(&err);
                Err(err)
            }
        }
    }

    /// Delete a record; success triggers a full reload, failure leaves the
    /// list unchanged.
    pub async fn delete(&self, id: RecordId) -> Result<()> {
        match self.api.delete_record(id).await {
            Ok(()) => self.load().await,
            Err(err) => {
                tracing::warn!(error = %err, record_id = id, "delete failed; list unchanged");
                self.surface(&err);
                Err(err)
            }
        }
    }
}
