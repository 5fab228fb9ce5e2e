//! Spindle Client - reactive catalog and cart synchronization.
//!
//! This crate wires the pure [`spindle_engine`] core to the outside world:
//! HTTP gateways for the catalog, cart, and orders APIs; in-process
//! broadcast hubs that fan stock and cart changes out to every open view;
//! and the coordinators that keep each view's record lists converged.
//!
//! ## Wiring
//!
//! Hubs are constructed explicitly and passed down; nothing here is a
//! process-wide singleton. A typical embedding:
//!
//! ```no_run
//! use std::sync::Arc;
//! use spindle_client::{
//!     ApiClient, CartHub, CartOptimisticUpdater, CatalogSyncCoordinator, Config,
//!     IdentityProvider, OrderSyncCoordinator, StockHub,
//! };
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env()?;
//! let identity = IdentityProvider::new();
//! let api = Arc::new(ApiClient::new(&config, identity.watch())?);
//!
//! let stock_hub = StockHub::new();
//! let cart_hub = CartHub::new();
//!
//! let catalog = CatalogSyncCoordinator::new(Arc::clone(&api), &stock_hub, &cart_hub);
//! let cart = CartOptimisticUpdater::new(
//!     Arc::clone(&api),
//!     catalog.handle(),
//!     stock_hub.clone(),
//!     cart_hub.clone(),
//!     identity.watch(),
//! );
//! let orders = OrderSyncCoordinator::new(Arc::clone(&api), identity.watch());
//!
//! catalog.load().await?;
//! cart.add_to_cart(7).await?;
//! # let _ = orders;
//! # Ok(())
//! # }
//! ```
//!
//! Dropping a coordinator releases its hub subscriptions and background
//! tasks deterministically; listener sets never grow across view
//! teardowns.

pub mod api;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod hub;
pub mod identity;
pub mod orders;

pub use api::{ApiClient, CartGateway, CatalogApi, OrdersApi};
pub use cart::CartOptimisticUpdater;
pub use catalog::{CatalogState, CatalogSyncCoordinator, CatalogViewHandle};
pub use config::{Config, ConfigError};
pub use error::{ClientError, Result, TransportKind};
pub use hub::{CartHub, StockHub, StockUpdate, Subscription};
pub use identity::{Identity, IdentityProvider, IdentityWatch};
pub use orders::{OrderState, OrderSyncCoordinator};
