//! # Cart Commands
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐                        │
//! │  │  Empty   │────►│ In Cart  │────►│ Recorded │                        │
//! │  │  Cart    │     │          │     │   Sale   │                        │
//! │  └──────────┘     └──────────┘     └──────────┘                        │
//! │       ▲                │                 │                              │
//! │       │           add_item_to_cart   checkout (sale.rs)                │
//! │       │           add_service_to_cart    │                              │
//! │       │           update_cart_line       │ success: cart cleared        │
//! │       │           remove_from_cart       │ failure: cart untouched      │
//! │       │                │                 │                              │
//! │       └──── clear_cart ┴─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::state::CartState;
use shopfront_core::{Cart, LineItem, LineKind, Money};
use shopfront_db::Database;

/// Cart contents and totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<LineItem>,
    pub total: Money,
    pub item_count: usize,
    pub total_quantity: i64,
    pub customer_name: String,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            items: cart.items().to_vec(),
            total: cart.total(),
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            customer_name: cart.customer_name().to_string(),
        }
    }
}

pub async fn get_cart(cart: &CartState) -> CartResponse {
    debug!("get_cart command");
    cart.with_cart(|c| CartResponse::from(c)).await
}

/// Adds an inventory item, checking the requested quantity against the
/// stock on hand right now.
///
/// The check is advisory; the stock actually decremented is settled at
/// checkout.
pub async fn add_item_to_cart(
    db: &Database,
    cart: &CartState,
    item_id: i64,
    quantity: i64,
) -> Result<CartResponse, ApiError> {
    debug!(item_id = %item_id, quantity = %quantity, "add_item_to_cart command");

    let item = db.inventory().get_by_id(item_id).await?;

    cart.with_cart_mut(|c| {
        c.add_item(&item, quantity)?;
        Ok::<_, ApiError>(CartResponse::from(&*c))
    })
    .await
}

pub async fn add_service_to_cart(
    db: &Database,
    cart: &CartState,
    service_id: i64,
    quantity: i64,
) -> Result<CartResponse, ApiError> {
    debug!(service_id = %service_id, quantity = %quantity, "add_service_to_cart command");

    let service = db.services().get_by_id(service_id).await?;

    cart.with_cart_mut(|c| {
        c.add_service(&service, quantity)?;
        Ok::<_, ApiError>(CartResponse::from(&*c))
    })
    .await
}

/// Sets a line's quantity; 0 removes the line.
pub async fn update_cart_line(
    cart: &CartState,
    id: i64,
    kind: LineKind,
    quantity: i64,
) -> Result<CartResponse, ApiError> {
    debug!(id = %id, kind = %kind, quantity = %quantity, "update_cart_line command");
    cart.with_cart_mut(|c| {
        c.update_quantity(id, kind, quantity)?;
        Ok::<_, ApiError>(CartResponse::from(&*c))
    })
    .await
}

pub async fn remove_from_cart(
    cart: &CartState,
    id: i64,
    kind: LineKind,
) -> Result<CartResponse, ApiError> {
    debug!(id = %id, kind = %kind, "remove_from_cart command");
    cart.with_cart_mut(|c| {
        c.remove(id, kind)?;
        Ok::<_, ApiError>(CartResponse::from(&*c))
    })
    .await
}

pub async fn set_customer_name(cart: &CartState, name: &str) -> CartResponse {
    cart.with_cart_mut(|c| {
        c.set_customer_name(name);
        CartResponse::from(&*c)
    })
    .await
}

/// Empties the cart and forgets the customer.
pub async fn clear_cart(cart: &CartState) -> CartResponse {
    debug!("clear_cart command");
    cart.with_cart_mut(|c| {
        c.clear();
        CartResponse::from(&*c)
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use shopfront_core::{InventoryFields, ServiceFields};
    use shopfront_db::DbConfig;

    async fn shop() -> (Database, i64, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let ssd = db
            .inventory()
            .add(&InventoryFields {
                name: "SSD 512GB".into(),
                brand: Some("Samsung".into()),
                category: Some("Storage".into()),
                price: Money::from_major_minor(2500, 0),
                stock: 3,
            })
            .await
            .unwrap();
        let cleaning = db
            .services()
            .add(&ServiceFields {
                name: "PC Cleaning".into(),
                category: Some("Maintenance".into()),
                price: Money::from_major_minor(300, 0),
                description: None,
            })
            .await
            .unwrap();
        (db, ssd, cleaning)
    }

    #[tokio::test]
    async fn test_build_a_cart() {
        let (db, ssd, cleaning) = shop().await;
        let cart = CartState::new();

        add_item_to_cart(&db, &cart, ssd, 1).await.unwrap();
        add_item_to_cart(&db, &cart, ssd, 1).await.unwrap();
        let response = add_service_to_cart(&db, &cart, cleaning, 1).await.unwrap();

        assert_eq!(response.item_count, 2);
        assert_eq!(response.total_quantity, 3);
        assert_eq!(response.total, Money::from_major_minor(5300, 0));

        let response = update_cart_line(&cart, ssd, LineKind::Item, 0).await.unwrap();
        assert_eq!(response.item_count, 1);
        assert_eq!(response.items[0].kind, LineKind::Service);
    }

    #[tokio::test]
    async fn test_advisory_stock_check() {
        let (db, ssd, _) = shop().await;
        let cart = CartState::new();

        let err = add_item_to_cart(&db, &cart, ssd, 4).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert!(get_cart(&cart).await.items.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_ids() {
        let (db, _, _) = shop().await;
        let cart = CartState::new();

        let err = add_item_to_cart(&db, &cart, 99, 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = remove_from_cart(&cart, 99, LineKind::Service).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);
    }

    #[tokio::test]
    async fn test_clear_forgets_customer() {
        let (db, _, cleaning) = shop().await;
        let cart = CartState::new();

        add_service_to_cart(&db, &cart, cleaning, 1).await.unwrap();
        let response = set_customer_name(&cart, "  Maria Santos ").await;
        assert_eq!(response.customer_name, "Maria Santos");

        let response = clear_cart(&cart).await;
        assert!(response.items.is_empty());
        assert_eq!(response.customer_name, "");
    }
}
