//! # Domain Types
//!
//! Core domain types used throughout Shopfront POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  InventoryItem  │   │     Service     │   │      Sale       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  name, brand    │   │  name           │   │  sale_date      │       │
//! │  │  category       │   │  category       │   │  total_amount   │       │
//! │  │  price          │   │  price          │   │  items ─────────┼──┐    │
//! │  │  stock          │   │  description    │   │  customer_name  │  │    │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘  │    │
//! │           │                     │                                  │    │
//! │           └──────── snapshot ───┴──────────►┌─────────────────┐   │    │
//! │                     at sale time             │    LineItem     │◄──┘    │
//! │                                              │  id, type       │        │
//! │                                              │  name, price    │        │
//! │                                              │  quantity       │        │
//! │                                              └─────────────────┘        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A sale owns copies of the name and price of everything it sold. Editing or
//! deleting a catalog row afterwards never changes a recorded sale.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Inventory
// =============================================================================

/// A stocked product (RAM, SSD, keyboards, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InventoryItem {
    /// Assigned by the store on creation.
    pub id: i64,

    /// Display name shown to the operator and stored on the sale.
    pub name: String,

    pub brand: Option<String>,

    /// Free-text classifier used by search filters.
    pub category: Option<String>,

    /// Unit price in centavos.
    pub price: Money,

    /// Units on hand. Never negative.
    pub stock: i64,

    #[ts(as = "String")]
    pub created_at: NaiveDateTime,
}

impl InventoryItem {
    /// Checks the advisory stock rule used when building a cart.
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }

    /// Returns the editable fields of this item.
    pub fn fields(&self) -> InventoryFields {
        InventoryFields {
            name: self.name.clone(),
            brand: self.brand.clone(),
            category: self.category.clone(),
            price: self.price,
            stock: self.stock,
        }
    }
}

/// Fields supplied when adding or editing an inventory item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventoryFields {
    pub name: String,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub price: Money,
    pub stock: i64,
}

// =============================================================================
// Service
// =============================================================================

/// A purchasable service (repair, reformat, cleaning, ...). Never depleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Service {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub price: Money,
    pub description: Option<String>,
    #[ts(as = "String")]
    pub created_at: NaiveDateTime,
}

impl Service {
    /// Returns the editable fields of this service.
    pub fn fields(&self) -> ServiceFields {
        ServiceFields {
            name: self.name.clone(),
            category: self.category.clone(),
            price: self.price,
            description: self.description.clone(),
        }
    }
}

/// Fields supplied when adding or editing a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ServiceFields {
    pub name: String,
    pub category: Option<String>,
    pub price: Money,
    pub description: Option<String>,
}

// =============================================================================
// Line Items
// =============================================================================

/// What a line item refers to.
///
/// Only `Item` lines touch inventory stock when a sale is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    /// Inventory-backed product; decrements stock.
    Item,
    /// Service; no stock concept.
    Service,
}

impl LineKind {
    /// Returns the persisted discriminator (`"item"` / `"service"`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            LineKind::Item => "item",
            LineKind::Service => "service",
        }
    }
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A line of a cart, frozen into a sale at checkout.
///
/// ## Design Notes
/// - `id` references an inventory row or a service row depending on `kind`
/// - `name` and `price` are copied when the line is created, so later
///   catalog edits never change the cart or the recorded sale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: LineKind,
    pub name: String,
    /// Unit price at the time the line was created.
    pub price: Money,
    pub quantity: i64,
}

impl LineItem {
    pub fn new(id: i64, kind: LineKind, name: impl Into<String>, price: Money, quantity: i64) -> Self {
        LineItem {
            id,
            kind,
            name: name.into(),
            price,
            quantity,
        }
    }

    /// Snapshots an inventory item.
    pub fn from_inventory(item: &InventoryItem, quantity: i64) -> Self {
        LineItem::new(item.id, LineKind::Item, item.name.clone(), item.price, quantity)
    }

    /// Snapshots a service.
    pub fn from_service(service: &Service, quantity: i64) -> Self {
        LineItem::new(
            service.id,
            LineKind::Service,
            service.name.clone(),
            service.price,
            quantity,
        )
    }

    /// Line total (price × quantity).
    #[inline]
    pub fn total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }

    /// Line total, or `None` if it doesn't fit in [`Money`].
    #[inline]
    pub fn checked_total(&self) -> Option<Money> {
        self.price.checked_multiply_quantity(self.quantity)
    }

    /// Whether recording this line adjusts inventory stock.
    #[inline]
    pub fn is_stock_tracked(&self) -> bool {
        self.kind == LineKind::Item
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale. A historical fact: never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Sale {
    pub id: i64,
    /// Calendar date of the sale (no time component).
    #[ts(as = "String")]
    pub sale_date: NaiveDate,
    /// Total as submitted at checkout.
    pub total_amount: Money,
    /// Snapshots of what was sold, in cart order.
    pub items: Vec<LineItem>,
    /// May be empty.
    pub customer_name: String,
    #[ts(as = "String")]
    pub created_at: NaiveDateTime,
}

impl Sale {
    /// Sum of the embedded line totals.
    ///
    /// Equal to `total_amount` for sales recorded from a [`Cart`](crate::Cart).
    pub fn items_total(&self) -> Money {
        self.items.iter().map(LineItem::total).sum()
    }

    /// Total number of units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ram() -> InventoryItem {
        InventoryItem {
            id: 1,
            name: "RAM 8GB".to_string(),
            brand: Some("Kingston".to_string()),
            category: Some("Memory".to_string()),
            price: Money::from_major_minor(1000, 0),
            stock: 5,
            created_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_line_total() {
        let line = LineItem::from_inventory(&ram(), 2);
        assert_eq!(line.kind, LineKind::Item);
        assert_eq!(line.total(), Money::from_major_minor(2000, 0));
        assert!(line.is_stock_tracked());
        assert_eq!(line.checked_total(), Some(line.total()));
    }

    #[test]
    fn test_line_total_overflow_is_detected() {
        let line = LineItem::new(1, LineKind::Service, "Big", Money::from_cents(i64::MAX / 2 + 1), 2);
        assert_eq!(line.checked_total(), None);
    }

    #[test]
    fn test_snapshot_is_decoupled_from_catalog_row() {
        let mut item = ram();
        let line = LineItem::from_inventory(&item, 1);

        item.name = "RAM 8GB DDR5".to_string();
        item.price = Money::from_major_minor(1500, 0);

        assert_eq!(line.name, "RAM 8GB");
        assert_eq!(line.price, Money::from_major_minor(1000, 0));
    }

    #[test]
    fn test_line_kind_wire_names() {
        assert_eq!(serde_json::to_string(&LineKind::Item).unwrap(), "\"item\"");
        assert_eq!(serde_json::to_string(&LineKind::Service).unwrap(), "\"service\"");
        assert_eq!(LineKind::Service.to_string(), "service");
    }

    #[test]
    fn test_can_sell() {
        let item = ram();
        assert!(item.can_sell(5));
        assert!(!item.can_sell(6));
    }
}
