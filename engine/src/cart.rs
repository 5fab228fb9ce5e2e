//! Cart contents and optimistic-operation sequencing.
//!
//! Cart snapshots are sourced externally and only consumed here. The
//! sequencer exists because two optimistic operations against the same
//! record can be in flight at once; their completions race, and a stale
//! commit or rollback must never clobber a newer operation's state. Each
//! issued operation gets a monotonically increasing sequence number per
//! record, and a reconciliation is applied only while its ticket is still
//! the latest issued for that record.

use crate::RecordId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One line of a user's cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Record this line refers to
    pub record_id: RecordId,
    /// Units in the cart, non-negative
    pub amount: u32,
}

impl CartLine {
    /// Create a new cart line.
    pub fn new(record_id: RecordId, amount: u32) -> Self {
        Self { record_id, amount }
    }

    /// Heuristic for cart-line-shaped values in a flattened object map.
    pub fn looks_like(value: &serde_json::Value) -> bool {
        value.is_object() && value.get("recordId").is_some() && value.get("amount").is_some()
    }
}

/// The full current cart contents for one user, in server order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    lines: Vec<CartLine>,
}

impl CartSnapshot {
    /// An empty cart.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a snapshot from ordered lines.
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    /// The ordered cart lines.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Units of `record_id` in the cart, if present.
    pub fn amount_for(&self, record_id: RecordId) -> Option<u32> {
        self.lines
            .iter()
            .find(|line| line.record_id == record_id)
            .map(|line| line.amount)
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Handle for one issued optimistic operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpTicket {
    /// Record the operation targets
    pub record_id: RecordId,
    /// Sequence number at issue time
    pub seq: u64,
}

/// Per-record sequence numbers for in-flight cart operations.
#[derive(Debug, Clone, Default)]
pub struct CartSequencer {
    latest: HashMap<RecordId, u64>,
    next_seq: u64,
}

impl CartSequencer {
    /// Create an empty sequencer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for a new operation against `record_id`, superseding
    /// any operation still in flight for that record.
    pub fn issue(&mut self, record_id: RecordId) -> OpTicket {
        self.next_seq += 1;
        self.latest.insert(record_id, self.next_seq);
        OpTicket {
            record_id,
            seq: self.next_seq,
        }
    }

    /// Whether `ticket` is still the latest issued for its record.
    pub fn is_current(&self, ticket: &OpTicket) -> bool {
        self.latest.get(&ticket.record_id) == Some(&ticket.seq)
    }

    /// Settle a completed operation. Returns `true` (and retires the entry)
    /// when the ticket is still current; returns `false` when a newer
    /// operation superseded it, in which case the reconciliation must be
    /// discarded.
    pub fn settle(&mut self, ticket: &OpTicket) -> bool {
        if self.is_current(ticket) {
            self.latest.remove(&ticket.record_id);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_lookup() {
        let snapshot = CartSnapshot::from_lines(vec![CartLine::new(1, 2), CartLine::new(7, 1)]);
        assert_eq!(snapshot.amount_for(1), Some(2));
        assert_eq!(snapshot.amount_for(7), Some(1));
        assert_eq!(snapshot.amount_for(9), None);
        assert!(!snapshot.is_empty());
        assert!(CartSnapshot::empty().is_empty());
    }

    #[test]
    fn snapshot_serialization() {
        let snapshot = CartSnapshot::from_lines(vec![CartLine::new(3, 4)]);
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"recordId\":3"));
        let parsed: CartSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, parsed);
    }

    #[test]
    fn tickets_increase_per_record() {
        let mut seq = CartSequencer::new();
        let t1 = seq.issue(1);
        let t2 = seq.issue(1);
        assert!(t2.seq > t1.seq);
        assert!(!seq.is_current(&t1));
        assert!(seq.is_current(&t2));
    }

    #[test]
    fn settle_applies_only_the_latest() {
        let mut seq = CartSequencer::new();
        let first = seq.issue(1);
        let second = seq.issue(1);

        // completions race: the superseded op settles first and is discarded
        assert!(!seq.settle(&first));
        assert!(seq.settle(&second));

        // everything settled; nothing current anymore
        assert!(!seq.is_current(&second));
    }

    #[test]
    fn records_sequence_independently() {
        let mut seq = CartSequencer::new();
        let a = seq.issue(1);
        let b = seq.issue(2);
        assert!(seq.is_current(&a));
        assert!(seq.is_current(&b));
        assert!(seq.settle(&a));
        assert!(seq.settle(&b));
    }

    #[test]
    fn settled_ticket_cannot_settle_twice() {
        let mut seq = CartSequencer::new();
        let t = seq.issue(5);
        assert!(seq.settle(&t));
        assert!(!seq.settle(&t));
    }
}
