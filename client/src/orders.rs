//! Order history coordinator.
//!
//! Reloads the order list on every change of the current identity,
//! including the transition to signed-out, which yields an empty list with
//! no fetch. Shares the envelope normalization path with the catalog.

use crate::api::{normalize_payload, OrdersApi};
use crate::error::ClientError;
use crate::identity::{Identity, IdentityWatch};
use chrono::DateTime;
use spindle_engine::{Order, OrderView};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Derived order-view state consumed by the rendering layer.
#[derive(Debug, Clone, Default)]
pub struct OrderState {
    /// The filtered order list
    pub orders: Vec<Arc<Order>>,
    /// Whether a load is in flight
    pub loading: bool,
    /// Message of the last surfaced error, if any
    pub error: Option<String>,
}

struct OrderShared {
    view: OrderView,
    loading: bool,
    error: Option<String>,
    output: watch::Sender<OrderState>,
}

impl OrderShared {
    fn publish(&self) {
        self.output.send_replace(OrderState {
            orders: self.view.filtered_list(),
            loading: self.loading,
            error: self.error.clone(),
        });
    }
}

fn lock_shared(shared: &Mutex<OrderShared>) -> MutexGuard<'_, OrderShared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Coordinator owning the order list for one order-history view.
pub struct OrderSyncCoordinator<A> {
    api: Arc<A>,
    shared: Arc<Mutex<OrderShared>>,
    identity: IdentityWatch,
    output: watch::Receiver<OrderState>,
    /// Identity-watch task, aborted on drop
    watcher: JoinHandle<()>,
}

impl<A: OrdersApi + 'static> OrderSyncCoordinator<A> {
    /// Create a coordinator and start following the identity stream. The
    /// list for the identity present at activation loads immediately.
    pub fn new(api: Arc<A>, identity: IdentityWatch) -> Self {
        let (tx, rx) = watch::channel(OrderState::default());
        let shared = Arc::new(Mutex::new(OrderShared {
            view: OrderView::new(),
            loading: false,
            error: None,
            output: tx,
        }));

        let task_api = Arc::clone(&api);
        let task_shared = Arc::clone(&shared);
        let mut identity_rx = identity.clone();
        let watcher = tokio::spawn(async move {
            let current = identity_rx.borrow_and_update().clone();
            reload(task_api.as_ref(), &task_shared, current).await;
            while identity_rx.changed().await.is_ok() {
                let current = identity_rx.borrow_and_update().clone();
                reload(task_api.as_ref(), &task_shared, current).await;
            }
        });

        Self {
            api,
            shared,
            identity,
            output: rx,
            watcher,
        }
    }

    /// Receiver for derived view state; the rendering layer awaits changes.
    pub fn output(&self) -> watch::Receiver<OrderState> {
        self.output.clone()
    }

    /// The view state right now.
    pub fn current(&self) -> OrderState {
        self.output.borrow().clone()
    }

    /// Reload for the identity present right now.
    pub async fn refresh(&self) {
        let current = self.identity.borrow().clone();
        reload(self.api.as_ref(), &self.shared, current).await;
    }

    /// Synchronous substring filter over the installed list.
    pub fn search(&self, text: &str) {
        let state = &mut *lock_shared(&self.shared);
        state.view.search(text);
        state.publish();
    }
}

impl<A> Drop for OrderSyncCoordinator<A> {
    fn drop(&mut self) {
        self.watcher.abort();
    }
}

async fn reload<A: OrdersApi>(api: &A, shared: &Mutex<OrderShared>, identity: Option<Identity>) {
    let Some(identity) = identity else {
        let state = &mut *lock_shared(shared);
        state.view.clear();
        state.loading = false;
        state.error = None;
        state.publish();
        return;
    };

    {
        let mut state = lock_shared(shared);
        state.loading = true;
        state.error = None;
        state.publish();
    }

    match api.fetch_orders(&identity.email).await {
        Ok(payload) => {
            let mut orders = normalize_payload::<Order>(payload, Order::looks_like, "orders");
            orders.retain(|order| order.user_email == identity.email);
            for order in &mut orders {
                order.date_display = format_order_date(&order.order_date);
            }
            tracing::debug!(orders = orders.len(), email = %identity.email, "orders loaded");

            let state = &mut *lock_shared(shared);
            state.view.install(orders);
            state.loading = false;
            state.publish();
        }
        Err(err) => {
            tracing::warn!(error = %err, "order fetch failed");
            let state = &mut *lock_shared(shared);
            state.view.clear();
            state.loading = false;
            state.error = Some(ClientError::surface_message(&err));
            state.publish();
        }
    }
}

/// Display form of the server's ISO date; an unparsable date falls back to
/// the raw string so filtering still has something to match.
fn format_order_date(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(date) => date.format("%d/%m/%Y").to_string(),
        Err(_) => raw.to_string(),
    }
}
