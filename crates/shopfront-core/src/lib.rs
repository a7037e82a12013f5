//! # shopfront-core: Pure Business Logic for Shopfront POS
//!
//! This crate holds the domain model of the shop as pure types and
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Shopfront POS Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               Register (apps/register, CLI / UI)                │   │
//! │  │    catalog commands ──► cart commands ──► checkout command      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ shopfront-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │   codec   │  │   │
//! │  │   │ Inventory │  │   Money   │  │   Cart    │  │ LineItem  │  │   │
//! │  │   │ Service   │  │  parsing  │  │  limits   │  │  <-> JSON │  │   │
//! │  │   │ Sale      │  │           │  │           │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 shopfront-db (Database Layer)                   │   │
//! │  │     SQLite pool, repositories, sale transaction coordinator     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (InventoryItem, Service, Sale, LineItem)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`codec`] - Persisted form of a sale's line-item snapshots
//! - [`cart`] - The in-memory cart assembled before checkout
//! - [`error`] - Domain error types
//! - [`validation`] - Field validation used by the calling layer
//!
//! ## Example Usage
//!
//! ```rust
//! use shopfront_core::{LineItem, LineKind, Money};
//!
//! let line = LineItem::new(1, LineKind::Item, "RAM 8GB", Money::from_major_minor(1000, 0), 2);
//! assert_eq!(line.total(), Money::from_major_minor(2000, 0));
//! ```

pub mod cart;
pub mod codec;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

pub use cart::Cart;
pub use codec::{decode_line_items, encode_line_items};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

/// Maximum distinct lines allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line in the cart.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10)
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Stock level below which an inventory item is listed as low stock.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

/// Symbol used when formatting money for display.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₱";
