//! Catalog entity types.

use crate::{GroupId, RecordId};
use serde::{Deserialize, Serialize};

/// Reserved identifier for a record that has not been persisted yet.
///
/// Views create drafts with this id; the save path routes on it to decide
/// between create and update.
pub const DRAFT_RECORD_ID: RecordId = 0;

/// A catalog record (one item in the shop).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Unique identifier; [`DRAFT_RECORD_ID`] marks an unsaved draft
    pub id: RecordId,
    /// Display title
    pub title: String,
    /// Publication year, if known
    #[serde(default)]
    pub year: Option<i32>,
    /// Server-hosted image reference
    #[serde(default)]
    pub image_url: Option<String>,
    /// Raw photo payload selected for upload; never round-trips the server
    #[serde(skip)]
    pub photo: Option<Vec<u8>>,
    /// Display name of the selected photo; upload-only like [`Record::photo`]
    #[serde(skip)]
    pub photo_name: Option<String>,
    /// Unit price, non-negative
    pub price: f64,
    /// Units in stock, non-negative
    pub stock: i64,
    /// Whether the record is discontinued
    #[serde(default)]
    pub discontinued: bool,
    /// Owning group, if any
    #[serde(default)]
    pub group_id: Option<GroupId>,
    /// Group display name, denormalized once at load time
    #[serde(default)]
    pub group_name: String,
    /// Whether the current user has this record in their cart.
    /// View-model only; never persisted server-side.
    #[serde(skip)]
    pub in_cart: bool,
    /// Units of this record in the cart. View-model only.
    #[serde(skip)]
    pub amount: u32,
}

impl Record {
    /// Create an empty draft with the sentinel id.
    pub fn draft() -> Self {
        Self {
            id: DRAFT_RECORD_ID,
            title: String::new(),
            year: None,
            image_url: None,
            photo: None,
            photo_name: None,
            price: 0.0,
            stock: 0,
            discontinued: false,
            group_id: None,
            group_name: String::new(),
            in_cart: false,
            amount: 0,
        }
    }

    /// Check whether this record is an unsaved draft.
    pub fn is_draft(&self) -> bool {
        self.id == DRAFT_RECORD_ID
    }

    /// Shallow copy carrying a new absolute stock level.
    pub fn with_stock(&self, stock: i64) -> Self {
        Self {
            stock: stock.max(0),
            ..self.clone()
        }
    }

    /// Set cart membership from a snapshot line; zero units clears membership.
    pub fn set_cart_line(&mut self, amount: u32) {
        self.amount = amount;
        self.in_cart = amount > 0;
    }

    /// Optimistic cart add: mark in-cart and take one more unit.
    pub fn add_to_cart(&mut self) {
        self.in_cart = true;
        self.amount += 1;
    }

    /// Rollback of a failed cart add: unconditional reset to out-of-cart.
    pub fn reset_cart(&mut self) {
        self.in_cart = false;
        self.amount = 0;
    }

    /// Optimistic cart remove: drop one unit, clamped at zero.
    pub fn remove_from_cart(&mut self) {
        self.amount = self.amount.saturating_sub(1);
        self.in_cart = self.amount > 0;
    }

    /// Rollback of a failed cart remove: put the unit back and force in-cart.
    pub fn restore_to_cart(&mut self) {
        self.amount += 1;
        self.in_cart = true;
    }

    /// Heuristic used when a flattened object map has to be probed for
    /// record-shaped values.
    pub fn looks_like(value: &serde_json::Value) -> bool {
        value.is_object() && value.get("id").is_some() && value.get("title").is_some()
    }
}

/// Read-only reference data joined onto records at load time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Unique identifier
    pub id: GroupId,
    /// Display name
    pub name: String,
}

impl Group {
    /// Create a new group.
    pub fn new(id: GroupId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Heuristic for group-shaped values in a flattened object map.
    pub fn looks_like(value: &serde_json::Value) -> bool {
        value.is_object() && value.get("id").is_some() && value.get("name").is_some()
    }
}
