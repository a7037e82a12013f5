//! # Sale Transaction Coordinator
//!
//! Records a checkout: one sale row plus the matching stock decrements,
//! committed as a single unit.
//!
//! ## Transaction Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    record_sale(items, total, customer)                  │
//! │                                                                         │
//! │  encode_line_items(items)            (fails before anything is opened) │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                 │
//! │  INSERT INTO sales ...               ← first statement: takes SQLite's │
//! │       │                                single writer lock, waiting up  │
//! │       │                                to busy_timeout for other sales │
//! │       ▼                                                                 │
//! │  for each `item` line:                                                 │
//! │     SELECT stock          (missing row → 0, or NotFound when strict)   │
//! │     UPDATE stock = max(0, stock - qty)  (or InsufficientStock)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  COMMIT ──► RecordedSale                                               │
//! │                                                                         │
//! │  any error ──► transaction dropped ──► ROLLBACK ──► SaleError          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//! - Either the sale row and every stock change are visible, or none are
//! - Stock never goes below zero
//! - Concurrent checkouts serialize on the writer lock, so every stock read
//!   sees all previously committed sales
//! - Other connections see nothing until COMMIT

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult, SaleError};
use crate::repository::inventory::InventoryRepository;
use shopfront_core::{encode_line_items, LineItem, Money};

// =============================================================================
// Options
// =============================================================================

/// What to do when a line asks for more units than are in stock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockPolicy {
    /// Record the sale and floor stock at zero.
    #[default]
    Clamp,
    /// Abort the whole sale with `DbError::InsufficientStock`.
    Reject,
}

/// What to do when an `item` line references a row that doesn't exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingItemPolicy {
    /// Treat the stock as zero; the sale is still recorded.
    #[default]
    TreatAsZero,
    /// Abort the whole sale with `DbError::NotFound`.
    Reject,
}

/// Coordinator behaviour for the two oversell edge cases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinatorOptions {
    pub stock_policy: StockPolicy,
    pub missing_item_policy: MissingItemPolicy,
}

impl CoordinatorOptions {
    /// Rejects both oversells and missing items.
    pub fn strict() -> Self {
        CoordinatorOptions {
            stock_policy: StockPolicy::Reject,
            missing_item_policy: MissingItemPolicy::Reject,
        }
    }
}

// =============================================================================
// Results
// =============================================================================

/// How one `item` line changed stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdjustment {
    pub item_id: i64,
    pub requested: i64,
    pub previous: i64,
    pub new: i64,
}

impl StockAdjustment {
    /// Whether the floor at zero swallowed part of the requested quantity.
    pub fn is_clamped(&self) -> bool {
        self.previous < self.requested
    }
}

/// A committed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedSale {
    pub id: i64,
    pub sale_date: NaiveDate,
    pub total_amount: Money,
    pub adjustments: Vec<StockAdjustment>,
}

// =============================================================================
// Coordinator
// =============================================================================

/// Records sales atomically.
///
/// ## Usage
/// ```rust,ignore
/// let recorded = db
///     .coordinator()
///     .record_sale(cart.items(), cart.total(), cart.customer_name())
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct SaleCoordinator {
    pool: SqlitePool,
    options: CoordinatorOptions,
}

impl SaleCoordinator {
    /// Creates a coordinator with default options.
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_options(pool, CoordinatorOptions::default())
    }

    pub fn with_options(pool: SqlitePool, options: CoordinatorOptions) -> Self {
        SaleCoordinator { pool, options }
    }

    pub fn options(&self) -> CoordinatorOptions {
        self.options
    }

    /// Records a sale dated today (local date).
    ///
    /// ## Arguments
    /// * `items` - Line snapshots, stored in this order
    /// * `total_amount` - Stored as given; normally `Cart::total()`
    /// * `customer_name` - Trimmed; may be empty
    ///
    /// ## Errors
    /// `SaleError` wrapping the first failure. Nothing was written.
    pub async fn record_sale(
        &self,
        items: &[LineItem],
        total_amount: Money,
        customer_name: &str,
    ) -> Result<RecordedSale, SaleError> {
        self.record_sale_for_date(Local::now().date_naive(), items, total_amount, customer_name)
            .await
    }

    /// Records a sale with an explicit date (back-office entry).
    pub async fn record_sale_for_date(
        &self,
        sale_date: NaiveDate,
        items: &[LineItem],
        total_amount: Money,
        customer_name: &str,
    ) -> Result<RecordedSale, SaleError> {
        check_lines(items)?;

        let encoded = encode_line_items(items).map_err(DbError::from)?;
        let customer_name = customer_name.trim();

        let mut tx = self.pool.begin().await?;

        let id = insert_sale(&mut tx, sale_date, total_amount, &encoded, customer_name).await?;
        debug!(sale_id = id, lines = items.len(), "Sale row inserted");

        let mut adjustments = Vec::new();
        for line in items.iter().filter(|l| l.is_stock_tracked()) {
            adjustments.push(self.decrement_stock(&mut tx, line).await?);
        }

        tx.commit().await?;

        info!(
            sale_id = id,
            date = %sale_date,
            total = %total_amount,
            lines = items.len(),
            customer = %customer_name,
            "Sale recorded"
        );

        Ok(RecordedSale {
            id,
            sale_date,
            total_amount,
            adjustments,
        })
    }

    async fn decrement_stock(
        &self,
        conn: &mut SqliteConnection,
        line: &LineItem,
    ) -> DbResult<StockAdjustment> {
        let previous = match InventoryRepository::stock_on(&mut *conn, line.id).await? {
            Some(stock) => stock,
            None => match self.options.missing_item_policy {
                MissingItemPolicy::TreatAsZero => {
                    warn!(item_id = line.id, name = %line.name, "Sold item no longer exists, treating stock as 0");
                    0
                }
                MissingItemPolicy::Reject => {
                    return Err(DbError::not_found("Inventory item", line.id));
                }
            },
        };

        if previous < line.quantity {
            if self.options.stock_policy == StockPolicy::Reject {
                return Err(DbError::InsufficientStock {
                    item_id: line.id,
                    available: previous,
                    requested: line.quantity,
                });
            }
            warn!(
                item_id = line.id,
                available = previous,
                requested = line.quantity,
                "Oversell, clamping stock to 0"
            );
        }

        let new = (previous - line.quantity).max(0);
        InventoryRepository::set_stock_on(&mut *conn, line.id, new).await?;

        Ok(StockAdjustment {
            item_id: line.id,
            requested: line.quantity,
            previous,
            new,
        })
    }
}

/// Rejects lines that can't be stored: a quantity below 1, or a line total
/// that doesn't fit in [`Money`]. The upper quantity cap belongs to the cart.
fn check_lines(items: &[LineItem]) -> DbResult<()> {
    for line in items {
        if line.quantity <= 0 {
            return Err(DbError::ConstraintViolation(format!(
                "{} {}: quantity must be positive, got {}",
                line.kind, line.id, line.quantity
            )));
        }
        if line.price.is_negative() {
            return Err(DbError::ConstraintViolation(format!(
                "{} {}: price must not be negative",
                line.kind, line.id
            )));
        }
        if line.checked_total().is_none() {
            return Err(DbError::ConstraintViolation(format!(
                "{} {}: line total overflows",
                line.kind, line.id
            )));
        }
    }
    Ok(())
}

async fn insert_sale(
    conn: &mut SqliteConnection,
    sale_date: NaiveDate,
    total_amount: Money,
    items: &str,
    customer_name: &str,
) -> DbResult<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO sales (sale_date, total_amount, items, customer_name)
        VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(sale_date)
    .bind(total_amount)
    .bind(items)
    .bind(customer_name)
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_rowid())
}

// =============================================================================
// Unit Tests
// =============================================================================
