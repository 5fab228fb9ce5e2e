//! Integration tests for the identity-driven order coordinator.

use serde_json::{json, Value};
use spindle_client::{
    ClientError, Identity, IdentityProvider, OrderState, OrderSyncCoordinator, OrdersApi,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Orders API serving a canned payload, optionally failing.
struct StaticOrders {
    payload: Mutex<Value>,
    fail: Mutex<bool>,
    calls: AtomicUsize,
}

impl StaticOrders {
    fn new(payload: Value) -> Arc<Self> {
        Arc::new(Self {
            payload: Mutex::new(payload),
            fail: Mutex::new(false),
            calls: AtomicUsize::new(0),
        })
    }
}

impl OrdersApi for StaticOrders {
    async fn fetch_orders(&self, _user_email: &str) -> spindle_client::Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail.lock().unwrap() {
            return Err(ClientError::from_status(
                reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            ));
        }
        Ok(self.payload.lock().unwrap().clone())
    }
}

fn order_payload() -> Value {
    json!({"$values": [
        {
            "id": 1,
            "orderDate": "2024-03-01T10:30:00Z",
            "paymentMethod": "Card",
            "total": 19.99,
            "userEmail": "user@example.com",
            "lines": [{"recordId": 1, "title": "Kind of Blue", "price": 19.99, "amount": 1}],
        },
        {
            "id": 2,
            "orderDate": "2024-04-15T08:00:00Z",
            "paymentMethod": "PayPal",
            "total": 42.00,
            "userEmail": "user@example.com",
            "lines": [],
        },
        {
            "id": 3,
            "orderDate": "2024-05-20T12:00:00Z",
            "paymentMethod": "Card",
            "total": 7.50,
            "userEmail": "somebody-else@example.com",
            "lines": [],
        },
    ]})
}

async fn wait_until<A, F>(coordinator: &OrderSyncCoordinator<A>, predicate: F)
where
    A: OrdersApi + 'static,
    F: Fn(&OrderState) -> bool,
{
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if predicate(&coordinator.current()) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("order state never reached the expected condition");
}

#[tokio::test]
async fn signed_out_start_yields_empty_list_without_fetch() {
    let api = StaticOrders::new(order_payload());
    let identity = IdentityProvider::new();
    let coordinator = OrderSyncCoordinator::new(Arc::clone(&api), identity.watch());

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(coordinator.current().orders.is_empty());
    assert_eq!(api.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn sign_in_loads_orders_scoped_to_the_identity() {
    let api = StaticOrders::new(order_payload());
    let identity = IdentityProvider::new();
    let coordinator = OrderSyncCoordinator::new(Arc::clone(&api), identity.watch());

    identity.sign_in(Identity::new("user@example.com", "tok"));
    wait_until(&coordinator, |state| state.orders.len() == 2).await;

    let state = coordinator.current();
    // the third order belongs to another user and never shows up
    assert!(state.orders.iter().all(|o| o.user_email == "user@example.com"));
    // dates were denormalized to display form at load time
    assert_eq!(state.orders[0].date_display, "01/03/2024");
    assert_eq!(state.orders[1].date_display, "15/04/2024");
}

#[tokio::test]
async fn sign_out_clears_the_list_without_fetching() {
    let api = StaticOrders::new(order_payload());
    let identity = IdentityProvider::new();
    identity.sign_in(Identity::new("user@example.com", "tok"));
    let coordinator = OrderSyncCoordinator::new(Arc::clone(&api), identity.watch());

    wait_until(&coordinator, |state| state.orders.len() == 2).await;
    let calls_after_load = api.calls.load(Ordering::SeqCst);

    identity.sign_out();
    wait_until(&coordinator, |state| state.orders.is_empty()).await;
    assert_eq!(api.calls.load(Ordering::SeqCst), calls_after_load);
    assert_eq!(coordinator.current().error, None);
}

#[tokio::test]
async fn fetch_failure_surfaces_error_and_empties_the_list() {
    let api = StaticOrders::new(order_payload());
    *api.fail.lock().unwrap() = true;
    let identity = IdentityProvider::new();
    identity.sign_in(Identity::new("user@example.com", "tok"));
    let coordinator = OrderSyncCoordinator::new(Arc::clone(&api), identity.watch());

    wait_until(&coordinator, |state| state.error.is_some()).await;
    let state = coordinator.current();
    assert!(state.orders.is_empty());
    assert!(state.error.as_deref().unwrap().contains("server fault"));
}

#[tokio::test]
async fn search_filters_date_payment_and_total() {
    let api = StaticOrders::new(order_payload());
    let identity = IdentityProvider::new();
    identity.sign_in(Identity::new("user@example.com", "tok"));
    let coordinator = OrderSyncCoordinator::new(Arc::clone(&api), identity.watch());
    wait_until(&coordinator, |state| state.orders.len() == 2).await;

    coordinator.search("paypal");
    assert_eq!(coordinator.current().orders.len(), 1);
    assert_eq!(coordinator.current().orders[0].id, 2);

    coordinator.search("01/03");
    assert_eq!(coordinator.current().orders.len(), 1);
    assert_eq!(coordinator.current().orders[0].id, 1);

    coordinator.search("42.00");
    assert_eq!(coordinator.current().orders.len(), 1);

    coordinator.search("");
    assert_eq!(coordinator.current().orders.len(), 2);
}

#[tokio::test]
async fn refresh_reloads_for_the_current_identity() {
    let api = StaticOrders::new(order_payload());
    let identity = IdentityProvider::new();
    identity.sign_in(Identity::new("user@example.com", "tok"));
    let coordinator = OrderSyncCoordinator::new(Arc::clone(&api), identity.watch());
    wait_until(&coordinator, |state| state.orders.len() == 2).await;

    let before = api.calls.load(Ordering::SeqCst);
    coordinator.refresh().await;
    assert_eq!(api.calls.load(Ordering::SeqCst), before + 1);
    assert_eq!(coordinator.current().orders.len(), 2);
}
