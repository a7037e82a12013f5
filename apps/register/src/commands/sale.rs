//! # Sale Commands
//!
//! Checkout turns the cart into a recorded sale.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  lock cart ─────────────────────────────────────────────┐ held until   │
//! │     │                                                   │ the end      │
//! │     ├── empty? ──► EmptyCart (cart untouched)           │              │
//! │     ▼                                                   │              │
//! │  SaleCoordinator::record_sale(items, total, customer)   │              │
//! │     │                                                   │              │
//! │     ├── Err ──► ApiError (cart and customer untouched)  │              │
//! │     ▼                                                   │              │
//! │  cart.clear() ──► CheckoutResponse                      │              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::{AppConfig, CartState};
use shopfront_core::{CoreError, LineItem, Money};
use shopfront_db::{Database, StockAdjustment};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub sale_id: i64,
    pub sale_date: NaiveDate,
    pub total: Money,
    pub items: Vec<LineItem>,
    pub customer_name: String,
    /// Lines whose stock ran out before the sale was recorded.
    pub clamped: Vec<StockAdjustment>,
}

/// Records the cart as a sale and clears it.
///
/// On any error the cart, including the customer name, is left exactly as
/// it was so the operator can retry.
pub async fn checkout(
    db: &Database,
    cart: &CartState,
    config: &AppConfig,
) -> Result<CheckoutResponse, ApiError> {
    debug!("checkout command");

    let mut guard = cart.lock().await;
    if guard.is_empty() {
        return Err(CoreError::EmptyCart.into());
    }

    let recorded = db
        .coordinator_with(config.coordinator_options())
        .record_sale(guard.items(), guard.total(), guard.customer_name())
        .await?;

    let clamped: Vec<StockAdjustment> = recorded
        .adjustments
        .into_iter()
        .filter(StockAdjustment::is_clamped)
        .collect();
    if !clamped.is_empty() {
        warn!(sale_id = %recorded.id, lines = clamped.len(), "Sale recorded with clamped stock");
    }

    let response = CheckoutResponse {
        sale_id: recorded.id,
        sale_date: recorded.sale_date,
        total: recorded.total_amount,
        items: guard.items().to_vec(),
        customer_name: guard.customer_name().to_string(),
        clamped,
    };
    guard.clear();

    info!(
        sale_id = %response.sale_id,
        total = %config.format_money(response.total),
        "Checkout complete"
    );
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::cart::{add_item_to_cart, add_service_to_cart, get_cart, set_customer_name};
    use crate::error::ErrorCode;
    use shopfront_core::{InventoryFields, ServiceFields};
    use shopfront_db::DbConfig;

    async fn shop() -> (Database, i64, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let ram = db
            .inventory()
            .add(&InventoryFields {
                name: "RAM 8GB".into(),
                brand: Some("Kingston".into()),
                category: Some("Memory".into()),
                price: Money::from_major_minor(1000, 0),
                stock: 5,
            })
            .await
            .unwrap();
        let repair = db
            .services()
            .add(&ServiceFields {
                name: "Screen Repair".into(),
                category: Some("Hardware".into()),
                price: Money::from_major_minor(800, 0),
                description: None,
            })
            .await
            .unwrap();
        (db, ram, repair)
    }

    #[tokio::test]
    async fn test_checkout_clears_cart() {
        let (db, ram, repair) = shop().await;
        let cart = CartState::new();
        let config = AppConfig::default();

        add_item_to_cart(&db, &cart, ram, 2).await.unwrap();
        add_service_to_cart(&db, &cart, repair, 1).await.unwrap();
        set_customer_name(&cart, "Juan").await;

        let response = checkout(&db, &cart, &config).await.unwrap();
        assert_eq!(response.total, Money::from_major_minor(2800, 0));
        assert_eq!(response.items.len(), 2);
        assert_eq!(response.customer_name, "Juan");
        assert!(response.clamped.is_empty());

        let after = get_cart(&cart).await;
        assert!(after.items.is_empty());
        assert_eq!(after.customer_name, "");

        assert_eq!(db.inventory().get_by_id(ram).await.unwrap().stock, 3);
        let sale = db.sales().get_by_id(response.sale_id).await.unwrap();
        assert_eq!(sale.customer_name, "Juan");
    }

    #[tokio::test]
    async fn test_empty_cart_is_rejected() {
        let (db, _, _) = shop().await;
        let err = checkout(&db, &CartState::new(), &AppConfig::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);
        assert!(db.sales().list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_checkout_keeps_cart() {
        let (db, ram, _) = shop().await;
        let cart = CartState::new();
        let mut config = AppConfig::default();
        config.inventory.strict_stock = true;

        add_item_to_cart(&db, &cart, ram, 4).await.unwrap();
        set_customer_name(&cart, "Ana").await;
        // Another register sold most of the stock meanwhile
        db.inventory().set_stock(ram, 1).await.unwrap();

        let err = checkout(&db, &cart, &config).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);

        let kept = get_cart(&cart).await;
        assert_eq!(kept.total_quantity, 4);
        assert_eq!(kept.customer_name, "Ana");
        assert_eq!(db.inventory().get_by_id(ram).await.unwrap().stock, 1);
        assert!(db.sales().list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clamped_lines_are_reported() {
        let (db, ram, _) = shop().await;
        let cart = CartState::new();

        add_item_to_cart(&db, &cart, ram, 4).await.unwrap();
        db.inventory().set_stock(ram, 1).await.unwrap();

        let response = checkout(&db, &cart, &AppConfig::default()).await.unwrap();
        assert_eq!(response.clamped.len(), 1);
        assert_eq!(response.clamped[0].previous, 1);
        assert_eq!(response.clamped[0].new, 0);
        assert_eq!(db.inventory().get_by_id(ram).await.unwrap().stock, 0);
    }
}
