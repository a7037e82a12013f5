//! # Inventory Repository
//!
//! Database operations for stocked items.
//!
//! ## Key Operations
//! - CRUD on the `inventory` table
//! - Name search with an optional category filter
//! - Low-stock listing
//! - Executor-generic stock helpers used inside the sale transaction
//!
//! ## Stock Writes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Two ways stock changes                                                 │
//! │                                                                         │
//! │  Operator restock / correction                                         │
//! │     set_stock(id, 12)              (own connection, autocommit)        │
//! │                                                                         │
//! │  Checkout                                                              │
//! │     SaleCoordinator                                                    │
//! │       └── stock_on(&mut *tx, id)   (inside the sale transaction)       │
//! │       └── set_stock_on(&mut *tx, id, max(0, stock - qty))              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::{category_filter, like_pattern};
use shopfront_core::{InventoryFields, InventoryItem};

const SELECT_ITEM: &str = "SELECT id, name, brand, category, price, stock, created_at FROM inventory";

/// Repository for inventory database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.inventory();
///
/// let id = repo.add(&fields).await?;
/// let item = repo.get_by_id(id).await?;
/// let matches = repo.search("ram", Some("Memory")).await?;
/// ```
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Lists every item, sorted by name.
    pub async fn list_all(&self) -> DbResult<Vec<InventoryItem>> {
        let items = sqlx::query_as::<_, InventoryItem>(&format!("{} ORDER BY name, id", SELECT_ITEM))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = items.len(), "Listed inventory");
        Ok(items)
    }

    /// Gets an item by its ID.
    ///
    /// ## Returns
    /// * `Ok(InventoryItem)` - Item found
    /// * `Err(DbError::NotFound)` - No such item
    pub async fn get_by_id(&self, id: i64) -> DbResult<InventoryItem> {
        sqlx::query_as::<_, InventoryItem>(&format!("{} WHERE id = ?1", SELECT_ITEM))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Inventory item", id))
    }

    /// Inserts a new item.
    ///
    /// ## Returns
    /// The store-assigned id.
    pub async fn add(&self, fields: &InventoryFields) -> DbResult<i64> {
        debug!(name = %fields.name, stock = fields.stock, "Adding inventory item");

        let result = sqlx::query(
            r#"
            INSERT INTO inventory (name, brand, category, price, stock)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(fields.name.trim())
        .bind(fields.brand.as_deref())
        .bind(fields.category.as_deref())
        .bind(fields.price)
        .bind(fields.stock)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Overwrites every editable field of an item.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Item doesn't exist
    pub async fn update(&self, id: i64, fields: &InventoryFields) -> DbResult<()> {
        debug!(id, "Updating inventory item");

        let result = sqlx::query(
            r#"
            UPDATE inventory SET
                name = ?2,
                brand = ?3,
                category = ?4,
                price = ?5,
                stock = ?6
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(fields.name.trim())
        .bind(fields.brand.as_deref())
        .bind(fields.category.as_deref())
        .bind(fields.price)
        .bind(fields.stock)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Inventory item", id));
        }

        Ok(())
    }

    /// Deletes an item. Recorded sales keep their snapshot of it.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting inventory item");

        let result = sqlx::query("DELETE FROM inventory WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Inventory item", id));
        }

        Ok(())
    }

    /// Searches by name substring, optionally restricted to one category.
    ///
    /// ## Arguments
    /// * `term` - Matched anywhere in the name, case-insensitive for ASCII.
    ///   Empty matches everything.
    /// * `category` - Exact category; `None` or `"All"` means no filter
    pub async fn search(&self, term: &str, category: Option<&str>) -> DbResult<Vec<InventoryItem>> {
        let category = category_filter(category);
        debug!(term = %term.trim(), category = ?category, "Searching inventory");

        let items = sqlx::query_as::<_, InventoryItem>(&format!(
            "{} WHERE name LIKE ?1 ESCAPE '\\' AND (?2 IS NULL OR category = ?2) ORDER BY name, id",
            SELECT_ITEM
        ))
        .bind(like_pattern(term))
        .bind(category)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = items.len(), "Search returned items");
        Ok(items)
    }

    /// Distinct non-empty categories, sorted.
    pub async fn list_categories(&self) -> DbResult<Vec<String>> {
        let categories: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT category FROM inventory
            WHERE category IS NOT NULL AND TRIM(category) <> ''
            ORDER BY category
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Items whose stock is below `threshold`, lowest stock first.
    pub async fn list_low_stock(&self, threshold: i64) -> DbResult<Vec<InventoryItem>> {
        let items = sqlx::query_as::<_, InventoryItem>(&format!(
            "{} WHERE stock < ?1 ORDER BY stock, name",
            SELECT_ITEM
        ))
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;

        debug!(threshold, count = items.len(), "Listed low stock");
        Ok(items)
    }

    /// Overwrites the stock level of an item (restock or correction).
    pub async fn set_stock(&self, id: i64, stock: i64) -> DbResult<()> {
        debug!(id, stock, "Setting stock");

        if Self::set_stock_on(&self.pool, id, stock).await? {
            Ok(())
        } else {
            Err(DbError::not_found("Inventory item", id))
        }
    }

    /// Counts items (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Executor-generic helpers
    // =========================================================================

    /// Reads the stock of an item through any executor, typically the sale
    /// transaction (`&mut *tx`).
    ///
    /// ## Returns
    /// `None` if the item doesn't exist.
    pub async fn stock_on<'e, E>(executor: E, id: i64) -> DbResult<Option<i64>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let stock: Option<i64> = sqlx::query_scalar("SELECT stock FROM inventory WHERE id = ?1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(stock)
    }

    /// Writes the stock of an item through any executor.
    ///
    /// ## Returns
    /// Whether a row was updated.
    pub async fn set_stock_on<'e, E>(executor: E, id: i64, stock: i64) -> DbResult<bool>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE inventory SET stock = ?2 WHERE id = ?1")
            .bind(id)
            .bind(stock)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use shopfront_core::Money;

    fn fields(name: &str, category: Option<&str>, pesos: i64, stock: i64) -> InventoryFields {
        InventoryFields {
            name: name.to_string(),
            brand: None,
            category: category.map(str::to_string),
            price: Money::from_major_minor(pesos, 0),
            stock,
        }
    }

    async fn repo() -> InventoryRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().inventory()
    }

    #[tokio::test]
    async fn test_add_and_get() {
        let repo = repo().await;
        let id = repo
            .add(&InventoryFields {
                brand: Some("Kingston".to_string()),
                ..fields("RAM 8GB", Some("Memory"), 1000, 5)
            })
            .await
            .unwrap();

        let item = repo.get_by_id(id).await.unwrap();
        assert_eq!(item.name, "RAM 8GB");
        assert_eq!(item.brand.as_deref(), Some("Kingston"));
        assert_eq!(item.price, Money::from_cents(100000));
        assert_eq!(item.stock, 5);
    }

    #[tokio::test]
    async fn test_missing_item_is_not_found() {
        let repo = repo().await;
        assert!(matches!(repo.get_by_id(42).await, Err(DbError::NotFound { .. })));
        assert!(matches!(
            repo.update(42, &fields("x", None, 1, 1)).await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(repo.delete(42).await, Err(DbError::NotFound { .. })));
        assert!(matches!(repo.set_stock(42, 3).await, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = repo().await;
        let id = repo.add(&fields("SSD 256GB", None, 1800, 2)).await.unwrap();

        repo.update(id, &fields("SSD 512GB", Some("Storage"), 2500, 6))
            .await
            .unwrap();
        let item = repo.get_by_id(id).await.unwrap();
        assert_eq!(item.name, "SSD 512GB");
        assert_eq!(item.category.as_deref(), Some("Storage"));
        assert_eq!(item.stock, 6);

        repo.delete(id).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_search_with_category_filter() {
        let repo = repo().await;
        repo.add(&fields("RAM 8GB", Some("Memory"), 1000, 5)).await.unwrap();
        repo.add(&fields("RAM 16GB", Some("Memory"), 1900, 5)).await.unwrap();
        repo.add(&fields("Keyboard", Some("Peripherals"), 500, 5)).await.unwrap();

        assert_eq!(repo.search("ram", None).await.unwrap().len(), 2);
        assert_eq!(repo.search("RAM", Some("All")).await.unwrap().len(), 2);
        assert_eq!(repo.search("", Some("Peripherals")).await.unwrap().len(), 1);
        assert!(repo.search("ram", Some("Peripherals")).await.unwrap().is_empty());

        let names: Vec<String> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Keyboard", "RAM 16GB", "RAM 8GB"]);
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let repo = repo().await;
        repo.add(&fields("Fan 100%", None, 1, 1)).await.unwrap();
        repo.add(&fields("Fan 1000", None, 1, 1)).await.unwrap();

        let found = repo.search("100%", None).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Fan 100%");
    }

    #[tokio::test]
    async fn test_list_categories() {
        let repo = repo().await;
        repo.add(&fields("a", Some("Storage"), 1, 1)).await.unwrap();
        repo.add(&fields("b", Some("Memory"), 1, 1)).await.unwrap();
        repo.add(&fields("c", Some("Memory"), 1, 1)).await.unwrap();
        repo.add(&fields("d", None, 1, 1)).await.unwrap();

        assert_eq!(repo.list_categories().await.unwrap(), vec!["Memory", "Storage"]);
    }

    #[tokio::test]
    async fn test_low_stock_ordering() {
        let repo = repo().await;
        repo.add(&fields("plenty", None, 1, 50)).await.unwrap();
        repo.add(&fields("two", None, 1, 2)).await.unwrap();
        repo.add(&fields("none", None, 1, 0)).await.unwrap();
        repo.add(&fields("four", None, 1, 4)).await.unwrap();

        let low: Vec<i64> = repo
            .list_low_stock(5)
            .await
            .unwrap()
            .iter()
            .map(|i| i.stock)
            .collect();
        assert_eq!(low, vec![0, 2, 4]);
    }

    #[tokio::test]
    async fn test_negative_stock_is_rejected_by_schema() {
        let repo = repo().await;
        let id = repo.add(&fields("x", None, 1, 1)).await.unwrap();

        assert!(matches!(
            repo.set_stock(id, -1).await,
            Err(DbError::ConstraintViolation(_))
        ));
        assert_eq!(repo.get_by_id(id).await.unwrap().stock, 1);
    }

    #[tokio::test]
    async fn test_executor_helpers_inside_transaction() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.inventory();
        let id = repo.add(&fields("x", None, 1, 7)).await.unwrap();

        let mut tx = db.pool().begin().await.unwrap();
        assert_eq!(InventoryRepository::stock_on(&mut *tx, id).await.unwrap(), Some(7));
        assert_eq!(InventoryRepository::stock_on(&mut *tx, id + 1).await.unwrap(), None);
        assert!(InventoryRepository::set_stock_on(&mut *tx, id, 3).await.unwrap());
        tx.rollback().await.unwrap();

        assert_eq!(repo.get_by_id(id).await.unwrap().stock, 7);
    }
}
