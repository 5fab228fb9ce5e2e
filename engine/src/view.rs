//! Catalog view state.
//!
//! A view owns two ordered record lists: the base list installed by a load,
//! and the filtered list the rendering layer consumes. Every mutation
//! produces new list allocations; untouched records stay pointer-identical
//! (`Arc::ptr_eq`). Change-detection-driven renderers rely on this, so it is
//! a correctness requirement, not an optimization.

use crate::cart::CartSnapshot;
use crate::entity::{Group, Record};
use crate::RecordId;
use std::sync::Arc;

/// In-memory record lists for one catalog view.
#[derive(Debug, Clone, Default)]
pub struct CatalogView {
    base: Vec<Arc<Record>>,
    filtered: Vec<Arc<Record>>,
}

impl CatalogView {
    /// Create an empty view.
    pub fn new() -> Self {
        Self::default()
    }

    /// The full record list installed by the last load.
    pub fn base(&self) -> &[Arc<Record>] {
        &self.base
    }

    /// The list the rendering layer consumes.
    pub fn filtered(&self) -> &[Arc<Record>] {
        &self.filtered
    }

    /// Fresh copy of the filtered list for publishing downstream.
    pub fn filtered_list(&self) -> Vec<Arc<Record>> {
        self.filtered.clone()
    }

    /// Look up a record in the base list.
    pub fn get(&self, id: RecordId) -> Option<&Arc<Record>> {
        self.base.iter().find(|r| r.id == id)
    }

    /// Current absolute stock per record, in list order.
    pub fn stock_levels(&self) -> Vec<(RecordId, i64)> {
        self.base.iter().map(|r| (r.id, r.stock)).collect()
    }

    /// Install a freshly loaded record list, joining each record to its
    /// group name. A record whose group is absent keeps an empty name;
    /// that is not an error. The filter resets to the full list.
    pub fn install(&mut self, records: Vec<Record>, groups: &[Group]) {
        let base: Vec<Arc<Record>> = records
            .into_iter()
            .map(|mut record| {
                record.group_name = record
                    .group_id
                    .and_then(|gid| groups.iter().find(|g| g.id == gid))
                    .map(|g| g.name.clone())
                    .unwrap_or_default();
                Arc::new(record)
            })
            .collect();
        self.filtered = base.clone();
        self.base = base;
    }

    /// Drop all records (load failure path).
    pub fn clear(&mut self) {
        self.base = Vec::new();
        self.filtered = Vec::new();
    }

    /// Replace the record matching `id` in both lists with a shallow copy
    /// produced by `mutate`. Both lists are reallocated; every other record
    /// stays pointer-identical. Returns the new record, or `None` when no
    /// record matches (lists untouched).
    pub fn update_record<F>(&mut self, id: RecordId, mutate: F) -> Option<Arc<Record>>
    where
        F: FnOnce(&mut Record),
    {
        let current = self.base.iter().find(|r| r.id == id)?;
        let mut updated = Record::clone(current);
        mutate(&mut updated);
        let updated = Arc::new(updated);

        self.base = replace_in(&self.base, id, &updated);
        self.filtered = replace_in(&self.filtered, id, &updated);
        Some(updated)
    }

    /// Overwrite one record's absolute stock level.
    pub fn apply_stock(&mut self, id: RecordId, stock: i64) -> bool {
        self.update_record(id, |r| r.stock = stock.max(0)).is_some()
    }

    /// Reconcile cart membership for every record from a snapshot; records
    /// absent from the snapshot drop out of the cart. The filtered list
    /// becomes a fresh copy of the base list, which intentionally discards
    /// any active search filter.
    pub fn apply_cart(&mut self, snapshot: &CartSnapshot) {
        self.base = self
            .base
            .iter()
            .map(|record| {
                let amount = snapshot.amount_for(record.id).unwrap_or(0);
                if record.amount == amount && record.in_cart == (amount > 0) {
                    Arc::clone(record)
                } else {
                    let mut updated = Record::clone(record);
                    updated.set_cart_line(amount);
                    Arc::new(updated)
                }
            })
            .collect();
        self.filtered = self.base.clone();
    }

    /// Case-insensitive substring filter over title, group name, and the
    /// string form of the publication year. Empty or whitespace-only text
    /// resets the filter to the full base list. The base list is untouched.
    pub fn search(&mut self, text: &str) {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            self.filtered = self.base.clone();
            return;
        }
        self.filtered = self
            .base
            .iter()
            .filter(|r| matches_needle(r, &needle))
            .cloned()
            .collect();
    }
}

fn matches_needle(record: &Record, needle: &str) -> bool {
    record.title.to_lowercase().contains(needle)
        || record.group_name.to_lowercase().contains(needle)
        || record
            .year
            .is_some_and(|year| year.to_string().contains(needle))
}

fn replace_in(list: &[Arc<Record>], id: RecordId, updated: &Arc<Record>) -> Vec<Arc<Record>> {
    list.iter()
        .map(|r| {
            if r.id == id {
                Arc::clone(updated)
            } else {
                Arc::clone(r)
            }
        })
        .collect()
}
