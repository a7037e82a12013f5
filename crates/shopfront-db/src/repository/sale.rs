//! # Sale Repository
//!
//! Read-only queries over recorded sales: daily totals, per-day listings
//! and history. Sales are written exclusively by
//! [`SaleCoordinator`](crate::coordinator::SaleCoordinator) and never
//! updated or deleted.
//!
//! ## Row Mapping
//! ```text
//! sales row                           Sale
//! ─────────────────────────           ─────────────────────────────
//! sale_date     TEXT 'YYYY-MM-DD' ──► NaiveDate
//! total_amount  INTEGER centavos  ──► Money
//! items         TEXT (JSON)       ──► Vec<LineItem>  (malformed → [])
//! customer_name TEXT              ──► String
//! ```

use chrono::{Local, NaiveDate, NaiveDateTime};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use shopfront_core::{decode_line_items, Money, Sale};

const SELECT_SALE: &str =
    "SELECT id, sale_date, total_amount, items, customer_name, created_at FROM sales";

#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: i64,
    sale_date: NaiveDate,
    total_amount: Money,
    items: String,
    customer_name: String,
    created_at: NaiveDateTime,
}

impl From<SaleRow> for Sale {
    fn from(row: SaleRow) -> Self {
        Sale {
            id: row.id,
            sale_date: row.sale_date,
            total_amount: row.total_amount,
            items: decode_line_items(&row.items),
            customer_name: row.customer_name,
            created_at: row.created_at,
        }
    }
}

/// Repository for sale queries.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Sum of `total_amount` over all sales on `date`. Zero if there are none.
    pub async fn total_for_date(&self, date: NaiveDate) -> DbResult<Money> {
        let cents: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_amount), 0) FROM sales WHERE sale_date = ?1",
        )
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        debug!(%date, cents, "Computed daily total");
        Ok(Money::from_cents(cents))
    }

    /// Sales recorded on `date`, in the order they were recorded.
    pub async fn for_date(&self, date: NaiveDate) -> DbResult<Vec<Sale>> {
        let rows = sqlx::query_as::<_, SaleRow>(&format!(
            "{} WHERE sale_date = ?1 ORDER BY id",
            SELECT_SALE
        ))
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Sale::from).collect())
    }

    /// Number of sales recorded on `date`.
    pub async fn count_for_date(&self, date: NaiveDate) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales WHERE sale_date = ?1")
            .bind(date)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Every sale, newest date first.
    pub async fn list_all(&self) -> DbResult<Vec<Sale>> {
        let rows = sqlx::query_as::<_, SaleRow>(&format!(
            "{} ORDER BY sale_date DESC, id DESC",
            SELECT_SALE
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed sales");
        Ok(rows.into_iter().map(Sale::from).collect())
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Sale> {
        sqlx::query_as::<_, SaleRow>(&format!("{} WHERE id = ?1", SELECT_SALE))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Sale::from)
            .ok_or_else(|| DbError::not_found("Sale", id))
    }

    /// Sales recorded today (local date).
    pub async fn today(&self) -> DbResult<Vec<Sale>> {
        self.for_date(Local::now().date_naive()).await
    }

    /// Total of today's sales (local date).
    pub async fn total_today(&self) -> DbResult<Money> {
        self.total_for_date(Local::now().date_naive()).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    async fn insert_raw(db: &Database, date: &str, total: i64, items: &str, customer: &str) -> i64 {
        sqlx::query(
            "INSERT INTO sales (sale_date, total_amount, items, customer_name) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(date)
        .bind(total)
        .bind(items)
        .bind(customer)
        .execute(db.pool())
        .await
        .unwrap()
        .last_insert_rowid()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn test_total_for_date_without_sales_is_zero() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let total = db.sales().total_for_date(date("2024-01-01")).await.unwrap();
        assert!(total.is_zero());
        assert_eq!(db.sales().count_for_date(date("2024-01-01")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_totals_and_ordering() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let a = insert_raw(&db, "2024-03-01", 100000, "[]", "").await;
        let b = insert_raw(&db, "2024-03-02", 50000, "[]", "Ana").await;
        let c = insert_raw(&db, "2024-03-02", 25050, "[]", "").await;

        let sales = db.sales();
        assert_eq!(
            sales.total_for_date(date("2024-03-02")).await.unwrap(),
            Money::from_cents(75050)
        );

        let day: Vec<i64> = sales
            .for_date(date("2024-03-02"))
            .await
            .unwrap()
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(day, vec![b, c]);

        let all: Vec<i64> = sales.list_all().await.unwrap().iter().map(|s| s.id).collect();
        assert_eq!(all, vec![c, b, a]);
    }

    #[tokio::test]
    async fn test_malformed_items_read_as_empty() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let id = insert_raw(&db, "2024-03-01", 1000, "{not json", "Ben").await;

        let sale = db.sales().get_by_id(id).await.unwrap();
        assert!(sale.items.is_empty());
        assert_eq!(sale.total_amount, Money::from_cents(1000));
        assert_eq!(sale.customer_name, "Ben");
    }

    #[tokio::test]
    async fn test_missing_sale_is_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(matches!(
            db.sales().get_by_id(1).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
