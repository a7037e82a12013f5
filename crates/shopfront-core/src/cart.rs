//! # Cart
//!
//! The ephemeral, in-memory list of line items assembled before checkout.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Cart Lifecycle                                 │
//! │                                                                         │
//! │  add_item / add_service ──► lines snapshot name + price                 │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  update_quantity / remove ──► operator edits                            │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  checkout ──► SaleCoordinator::record_sale(lines, total, customer)      │
//! │          │                                                              │
//! │          ├── Ok  ──► clear()          (cart and customer name reset)    │
//! │          └── Err ──► left untouched   (operator can retry)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by `(id, kind)`; adding the same thing again merges
//! - Every quantity is between 1 and [`MAX_ITEM_QUANTITY`]
//! - At most [`MAX_CART_ITEMS`] lines
//!
//! The stock check in [`Cart::add_item`] is advisory: stock can change
//! between building the cart and recording the sale, and the coordinator
//! clamps rather than rejects.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{InventoryItem, LineItem, LineKind, Service};
use crate::validation::validate_quantity;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<LineItem>,
    customer_name: String,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds an inventory item or increases the quantity of its line.
    ///
    /// ## Errors
    /// - `InsufficientStock` if the combined quantity exceeds `item.stock`
    /// - `QuantityTooLarge` / `CartTooLarge` on cart limits
    pub fn add_item(&mut self, item: &InventoryItem, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        let existing = self.quantity_of(item.id, LineKind::Item);
        let requested = existing + quantity;
        if requested > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested,
                max: MAX_ITEM_QUANTITY,
            });
        }

        if !item.can_sell(requested) {
            return Err(CoreError::InsufficientStock {
                name: item.name.clone(),
                available: item.stock,
                requested,
            });
        }

        if existing > 0 {
            self.set_line_quantity(item.id, LineKind::Item, requested);
            return Ok(());
        }

        self.push(LineItem::from_inventory(item, quantity))
    }

    /// Adds a service or increases the quantity of its line.
    pub fn add_service(&mut self, service: &Service, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        let existing = self.quantity_of(service.id, LineKind::Service);
        let requested = existing + quantity;
        if requested > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested,
                max: MAX_ITEM_QUANTITY,
            });
        }

        if existing > 0 {
            self.set_line_quantity(service.id, LineKind::Service, requested);
            return Ok(());
        }

        self.push(LineItem::from_service(service, quantity))
    }

    /// Sets the quantity of a line. A quantity of 0 removes it.
    pub fn update_quantity(&mut self, id: i64, kind: LineKind, quantity: i64) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove(id, kind);
        }

        validate_quantity(quantity)?;

        if self.set_line_quantity(id, kind, quantity) {
            Ok(())
        } else {
            Err(CoreError::NotInCart { id, kind })
        }
    }

    /// Removes a line.
    pub fn remove(&mut self, id: i64, kind: LineKind) -> CoreResult<()> {
        let before = self.items.len();
        self.items.retain(|l| !(l.id == id && l.kind == kind));

        if self.items.len() == before {
            Err(CoreError::NotInCart { id, kind })
        } else {
            Ok(())
        }
    }

    /// Empties the cart and forgets the customer name.
    pub fn clear(&mut self) {
        self.items.clear();
        self.customer_name.clear();
    }

    pub fn set_customer_name(&mut self, name: impl Into<String>) {
        self.customer_name = name.into().trim().to_string();
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    /// Lines in the order they were added.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Sum of all line totals.
    pub fn total(&self) -> Money {
        self.items.iter().map(LineItem::total).sum()
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Total units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|l| l.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn quantity_of(&self, id: i64, kind: LineKind) -> i64 {
        self.items
            .iter()
            .find(|l| l.id == id && l.kind == kind)
            .map(|l| l.quantity)
            .unwrap_or(0)
    }

    fn set_line_quantity(&mut self, id: i64, kind: LineKind, quantity: i64) -> bool {
        match self.items.iter_mut().find(|l| l.id == id && l.kind == kind) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    fn push(&mut self, line: LineItem) -> CoreResult<()> {
        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }
        self.items.push(line);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn item(id: i64, price_pesos: i64, stock: i64) -> InventoryItem {
        InventoryItem {
            id,
            name: format!("Item {}", id),
            brand: None,
            category: None,
            price: Money::from_major_minor(price_pesos, 0),
            stock,
            created_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    fn service(id: i64, price_pesos: i64) -> Service {
        Service {
            id,
            name: format!("Service {}", id),
            category: None,
            price: Money::from_major_minor(price_pesos, 0),
            description: None,
            created_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_add_item_and_total() {
        let mut cart = Cart::new();
        cart.add_item(&item(1, 1000, 5), 2).unwrap();
        cart.add_service(&service(1, 350), 1).unwrap();

        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total_quantity(), 3);
        assert_eq!(cart.total(), Money::from_major_minor(2350, 0));
    }

    #[test]
    fn test_same_id_different_kind_are_separate_lines() {
        let mut cart = Cart::new();
        cart.add_item(&item(1, 10, 5), 1).unwrap();
        cart.add_service(&service(1, 20), 1).unwrap();
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_adding_again_merges_and_checks_stock() {
        let mut cart = Cart::new();
        let ram = item(1, 1000, 3);

        cart.add_item(&ram, 2).unwrap();
        let err = cart.add_item(&ram, 2).unwrap_err();

        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                available: 3,
                requested: 4,
                ..
            }
        ));
        assert_eq!(cart.total_quantity(), 2);

        cart.add_item(&ram, 1).unwrap();
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_quantity(), 3);
    }

    #[test]
    fn test_out_of_stock_item_is_rejected() {
        let mut cart = Cart::new();
        assert!(cart.add_item(&item(1, 10, 0), 1).is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_services_have_no_stock_limit() {
        let mut cart = Cart::new();
        cart.add_service(&service(2, 100), 50).unwrap();
        assert_eq!(cart.total_quantity(), 50);
    }

    #[test]
    fn test_quantity_limits() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.add_service(&service(1, 1), 0),
            Err(CoreError::Validation(_))
        ));
        cart.add_service(&service(1, 1), MAX_ITEM_QUANTITY).unwrap();
        assert!(matches!(
            cart.add_service(&service(1, 1), 1),
            Err(CoreError::QuantityTooLarge { .. })
        ));
    }

    #[test]
    fn test_cart_size_limit() {
        let mut cart = Cart::new();
        for id in 0..MAX_CART_ITEMS as i64 {
            cart.add_service(&service(id, 1), 1).unwrap();
        }
        assert!(matches!(
            cart.add_service(&service(9999, 1), 1),
            Err(CoreError::CartTooLarge { .. })
        ));
    }

    #[test]
    fn test_update_and_remove() {
        let mut cart = Cart::new();
        cart.add_item(&item(1, 10, 10), 1).unwrap();

        cart.update_quantity(1, LineKind::Item, 4).unwrap();
        assert_eq!(cart.total_quantity(), 4);

        assert!(matches!(
            cart.update_quantity(1, LineKind::Service, 2),
            Err(CoreError::NotInCart { .. })
        ));

        cart.update_quantity(1, LineKind::Item, 0).unwrap();
        assert!(cart.is_empty());
        assert!(cart.remove(1, LineKind::Item).is_err());
    }

    #[test]
    fn test_clear_forgets_customer() {
        let mut cart = Cart::new();
        cart.add_item(&item(1, 10, 10), 1).unwrap();
        cart.set_customer_name("  Juan Dela Cruz ");
        assert_eq!(cart.customer_name(), "Juan Dela Cruz");

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.customer_name(), "");
    }
}
