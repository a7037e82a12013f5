//! # Cart State
//!
//! The register's current cart.
//!
//! ## Thread Safety
//! The cart lives behind `Arc<tokio::sync::Mutex<Cart>>`. Catalog reads happen
//! before the lock is taken, so edits hold it only briefly; checkout holds it
//! for the whole sale so no line can be added between recording the sale and
//! clearing the cart.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Operator Action          Command                 Cart State Change     │
//! │  ───────────────          ───────                 ─────────────────     │
//! │                                                                         │
//! │  Pick Item ──────────────► add_item_to_cart() ──► add_item(snapshot)   │
//! │                                                                         │
//! │  Pick Service ───────────► add_service_to_cart() ► add_service()       │
//! │                                                                         │
//! │  Change Quantity ────────► update_cart_line() ──► update_quantity()    │
//! │                                                                         │
//! │  Click Remove ───────────► remove_from_cart() ──► remove()             │
//! │                                                                         │
//! │  Checkout ───────────────► checkout() ──────────► clear() on success   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use shopfront_core::Cart;
use tokio::sync::{Mutex, MutexGuard};

/// Cart state shared between commands.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    /// Creates a new cart state with an empty cart.
    pub fn new() -> Self {
        CartState::default()
    }

    /// Executes a function with read access to the cart.
    pub async fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().await;
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    pub async fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().await;
        f(&mut cart)
    }

    /// Holds the cart exclusively until the guard is dropped.
    pub async fn lock(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopfront_core::{Money, Service};

    fn repair() -> Service {
        Service {
            id: 1,
            name: "Screen Repair".into(),
            category: Some("Hardware".into()),
            price: Money::from_major_minor(800, 0),
            description: None,
            created_at: chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        }
    }

    #[tokio::test]
    async fn test_clones_share_one_cart() {
        let state = CartState::new();
        let other = state.clone();

        other
            .with_cart_mut(|cart| cart.add_service(&repair(), 2))
            .await
            .unwrap();

        let total = state.with_cart(|cart| cart.total()).await;
        assert_eq!(total, Money::from_major_minor(1600, 0));
    }

    #[tokio::test]
    async fn test_lock_is_exclusive() {
        let state = CartState::new();
        let guard = state.lock().await;
        assert!(state.cart.try_lock().is_err());
        drop(guard);
        assert!(state.cart.try_lock().is_ok());
    }
}
