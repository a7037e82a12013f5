//! # Inventory Commands
//!
//! Catalog management for stocked products.
//!
//! ## Input Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operator form (text fields)                                           │
//! │    name "RAM 8GB"  price "1000.50"  stock "5"                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  InventoryForm::into_fields()   parse_price / parse_stock / validate   │
//! │       │                          (ValidationError → VALIDATION_ERROR)  │
//! │       ▼                                                                 │
//! │  InventoryRepository::add / update                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppConfig;
use shopfront_core::validation::{
    parse_price, parse_stock, validate_inventory_fields, validate_search_query, validate_stock,
    ValidationResult,
};
use shopfront_core::{InventoryFields, InventoryItem};
use shopfront_db::Database;

/// Inventory fields as typed by the operator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryForm {
    pub name: String,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub price: String,
    pub stock: String,
}

impl InventoryForm {
    /// Parses and validates the form.
    pub fn into_fields(self) -> ValidationResult<InventoryFields> {
        let fields = InventoryFields {
            name: self.name.trim().to_string(),
            brand: non_blank(self.brand),
            category: non_blank(self.category),
            price: parse_price(&self.price)?,
            stock: parse_stock(&self.stock)?,
        };
        validate_inventory_fields(&fields)?;
        Ok(fields)
    }
}

/// Blank optional text is stored as NULL.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Lists every inventory item by name.
pub async fn list_inventory(db: &Database) -> Result<Vec<InventoryItem>, ApiError> {
    debug!("list_inventory command");
    Ok(db.inventory().list_all().await?)
}

pub async fn get_inventory_item(db: &Database, id: i64) -> Result<InventoryItem, ApiError> {
    debug!(id = %id, "get_inventory_item command");
    Ok(db.inventory().get_by_id(id).await?)
}

/// Searches by name, optionally within one category.
///
/// A blank query lists everything in the category.
pub async fn search_inventory(
    db: &Database,
    query: &str,
    category: Option<&str>,
) -> Result<Vec<InventoryItem>, ApiError> {
    let query = validate_search_query(query)?;
    debug!(query = %query, category = ?category, "search_inventory command");
    Ok(db.inventory().search(&query, category).await?)
}

pub async fn list_inventory_categories(db: &Database) -> Result<Vec<String>, ApiError> {
    Ok(db.inventory().list_categories().await?)
}

/// Adds an item and returns it as stored.
pub async fn add_inventory_item(
    db: &Database,
    form: InventoryForm,
) -> Result<InventoryItem, ApiError> {
    let fields = form.into_fields()?;
    let id = db.inventory().add(&fields).await?;
    info!(id = %id, name = %fields.name, stock = %fields.stock, "Inventory item added");
    Ok(db.inventory().get_by_id(id).await?)
}

pub async fn update_inventory_item(
    db: &Database,
    id: i64,
    form: InventoryForm,
) -> Result<InventoryItem, ApiError> {
    let fields = form.into_fields()?;
    db.inventory().update(id, &fields).await?;
    info!(id = %id, "Inventory item updated");
    Ok(db.inventory().get_by_id(id).await?)
}

/// Deletes an item. Recorded sales keep their snapshot of it.
pub async fn delete_inventory_item(db: &Database, id: i64) -> Result<(), ApiError> {
    db.inventory().delete(id).await?;
    info!(id = %id, "Inventory item deleted");
    Ok(())
}

/// Sets the stock count directly (restock or stocktake correction).
pub async fn set_stock(db: &Database, id: i64, stock: i64) -> Result<InventoryItem, ApiError> {
    validate_stock(stock)?;
    db.inventory().set_stock(id, stock).await?;
    info!(id = %id, stock = %stock, "Stock set");
    Ok(db.inventory().get_by_id(id).await?)
}

/// Items below `threshold`, or the configured threshold when `None`.
pub async fn low_stock(
    db: &Database,
    config: &AppConfig,
    threshold: Option<i64>,
) -> Result<Vec<InventoryItem>, ApiError> {
    let threshold = threshold.unwrap_or(config.inventory.low_stock_threshold);
    if threshold < 0 {
        return Err(ApiError::validation("threshold must not be negative"));
    }
    debug!(threshold = %threshold, "low_stock command");
    Ok(db.inventory().list_low_stock(threshold).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use shopfront_core::Money;
    use shopfront_db::DbConfig;

    fn form(name: &str, price: &str, stock: &str) -> InventoryForm {
        InventoryForm {
            name: name.to_string(),
            brand: Some("  ".to_string()),
            category: Some(" Memory ".to_string()),
            price: price.to_string(),
            stock: stock.to_string(),
        }
    }

    #[test]
    fn test_form_parsing() {
        let fields = form(" RAM 8GB ", "1000.50", "5").into_fields().unwrap();
        assert_eq!(fields.name, "RAM 8GB");
        assert_eq!(fields.brand, None);
        assert_eq!(fields.category.as_deref(), Some("Memory"));
        assert_eq!(fields.price, Money::from_major_minor(1000, 50));
        assert_eq!(fields.stock, 5);
    }

    #[test]
    fn test_form_rejects_bad_input() {
        assert!(form("", "100", "1").into_fields().is_err());
        assert!(form("RAM", "abc", "1").into_fields().is_err());
        assert!(form("RAM", "100", "-1").into_fields().is_err());
        assert!(form("RAM", "100", "1.5").into_fields().is_err());
    }

    #[tokio::test]
    async fn test_add_search_and_restock() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let config = AppConfig::default();

        let ram = add_inventory_item(&db, form("RAM 8GB", "1000", "2")).await.unwrap();
        add_inventory_item(&db, form("RAM 16GB", "1800", "9")).await.unwrap();

        let found = search_inventory(&db, "  ram ", Some("Memory")).await.unwrap();
        assert_eq!(found.len(), 2);

        let low = low_stock(&db, &config, None).await.unwrap();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].id, ram.id);

        let restocked = set_stock(&db, ram.id, 20).await.unwrap();
        assert_eq!(restocked.stock, 20);
        assert!(low_stock(&db, &config, None).await.unwrap().is_empty());
        assert_eq!(list_inventory_categories(&db).await.unwrap(), vec!["Memory"]);
    }

    #[tokio::test]
    async fn test_errors_map_to_codes() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = add_inventory_item(&db, form("RAM", "-5", "1")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = set_stock(&db, 42, 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = set_stock(&db, 42, -1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = delete_inventory_item(&db, 42).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
