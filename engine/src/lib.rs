//! # Spindle Engine
//!
//! The deterministic core of the Spindle catalog client.
//!
//! This crate provides the pure logic behind the reactive catalog/cart
//! synchronization layer: envelope normalization, catalog and order view
//! state, cart optimistic-operation sequencing, and draft validation.
//! The same inputs always produce the same outputs.
//!
//! ## Design Principles
//!
//! - **No IO**: Engine has no knowledge of network, identity, or platform
//! - **Deterministic**: Same inputs always produce same outputs
//! - **Testable**: Pure logic, no mocks needed
//! - **Copy-on-write lists**: every published record list is a fresh
//!   sequence; untouched entries stay pointer-identical
//!
//! ## Core Concepts
//!
//! ### Entities
//!
//! Catalog data is a list of [`Record`]s joined at load time to their
//! [`Group`] display names. Records carry two view-model-only fields
//! (`in_cart`, `amount`) that never round-trip the server.
//!
//! ### Envelope normalization
//!
//! The backend wraps collections in one of several envelope shapes. The
//! [`envelope`] module resolves the shape by explicit pattern matching and
//! degrades unrecognized payloads to empty sequences, never errors.
//!
//! ### Views
//!
//! [`CatalogView`] and [`OrderView`] hold a base list and a filtered list.
//! Mutations replace only the touched record and reallocate the lists, so
//! change-detection-driven renderers observe fresh sequences.
//!
//! ### Optimistic cart operations
//!
//! [`CartSequencer`] issues per-record, monotonically increasing operation
//! tickets. A completion (commit or rollback) is applied only while its
//! ticket is still the latest issued for that record, so racing in-flight
//! operations can never clobber each other's state.
//!
//! ## Quick Start
//!
//! ```rust
//! use spindle_engine::{envelope, CatalogView, Group, Record};
//! use serde_json::json;
//!
//! // 1. Normalize a server payload, whatever envelope it arrived in
//! let payload = json!({"$values": [
//!     {"id": 1, "title": "Kind of Blue", "price": 19.99, "stock": 5, "groupId": 10},
//! ]});
//! let normalized = envelope::normalize::<Record, _>(payload, Record::looks_like);
//!
//! // 2. Install into a view, joining group names
//! let mut view = CatalogView::new();
//! view.install(normalized.entities, &[Group::new(10, "Miles Davis")]);
//! assert_eq!(view.filtered()[0].group_name, "Miles Davis");
//!
//! // 3. Apply a stock update; only the touched record is reallocated
//! view.apply_stock(1, 3);
//! assert_eq!(view.filtered()[0].stock, 3);
//! ```

pub mod cart;
pub mod entity;
pub mod envelope;
pub mod error;
pub mod order;
pub mod validate;
pub mod view;

// Re-export main types at crate root
pub use cart::{CartLine, CartSequencer, CartSnapshot, OpTicket};
pub use entity::{Group, Record, DRAFT_RECORD_ID};
pub use envelope::{EnvelopeShape, Normalized};
pub use error::Error;
pub use order::{Order, OrderLine, OrderView};
pub use validate::validate_draft;
pub use view::CatalogView;

/// Type aliases for clarity
pub type RecordId = i64;
pub type GroupId = i64;
pub type OrderId = i64;
