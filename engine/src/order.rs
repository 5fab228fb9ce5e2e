//! Order history entities and view state.
//!
//! Structurally simpler than the catalog view: the list is read-only and
//! scoped to one user, so there is no stock or cart reconciliation, only
//! install and filter.

use crate::{OrderId, RecordId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One line item of a past order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Record that was ordered
    pub record_id: RecordId,
    /// Title at order time
    #[serde(default)]
    pub title: String,
    /// Unit price at order time
    pub price: f64,
    /// Units ordered
    pub amount: u32,
}

/// A past order, read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique identifier
    pub id: OrderId,
    /// Order date as reported by the server (ISO 8601)
    pub order_date: String,
    /// Locale-formatted date, denormalized by the client at load time
    #[serde(skip)]
    pub date_display: String,
    /// Payment method label
    #[serde(default)]
    pub payment_method: String,
    /// Order total
    pub total: f64,
    /// Owning user
    #[serde(default)]
    pub user_email: String,
    /// Line items
    #[serde(default)]
    pub lines: Vec<OrderLine>,
}

impl Order {
    /// Heuristic for order-shaped values in a flattened object map.
    pub fn looks_like(value: &serde_json::Value) -> bool {
        value.is_object() && value.get("id").is_some() && value.get("total").is_some()
    }

    fn matches_needle(&self, needle: &str) -> bool {
        self.date_display.to_lowercase().contains(needle)
            || self.payment_method.to_lowercase().contains(needle)
            || format!("{:.2}", self.total).contains(needle)
    }
}

/// In-memory order lists for one order-history view.
#[derive(Debug, Clone, Default)]
pub struct OrderView {
    base: Vec<Arc<Order>>,
    filtered: Vec<Arc<Order>>,
}

impl OrderView {
    /// Create an empty view.
    pub fn new() -> Self {
        Self::default()
    }

    /// The full order list installed by the last load.
    pub fn base(&self) -> &[Arc<Order>] {
        &self.base
    }

    /// The list the rendering layer consumes.
    pub fn filtered(&self) -> &[Arc<Order>] {
        &self.filtered
    }

    /// Fresh copy of the filtered list for publishing downstream.
    pub fn filtered_list(&self) -> Vec<Arc<Order>> {
        self.filtered.clone()
    }

    /// Install a freshly loaded order list; the filter resets.
    pub fn install(&mut self, orders: Vec<Order>) {
        let base: Vec<Arc<Order>> = orders.into_iter().map(Arc::new).collect();
        self.filtered = base.clone();
        self.base = base;
    }

    /// Drop all orders (identity cleared or load failure).
    pub fn clear(&mut self) {
        self.base = Vec::new();
        self.filtered = Vec::new();
    }

    /// Case-insensitive substring match over the formatted date, payment
    /// method, and formatted total, computed independently per order. The
    /// base list is never mutated; the result is a new filtered sequence.
    pub fn search(&mut self, text: &str) {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            self.filtered = self.base.clone();
            return;
        }
        self.filtered = self
            .base
            .iter()
            .filter(|order| order.matches_needle(&needle))
            .cloned()
            .collect();
    }
}
