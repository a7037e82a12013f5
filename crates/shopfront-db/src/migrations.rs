//! # Schema Setup
//!
//! Embedded SQL migrations for Shopfront POS.
//!
//! ## How It Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      ensure_schema()                                    │
//! │                                                                         │
//! │  Check _sqlx_migrations table                                          │
//! │       │                                                                 │
//! │       ├── Table doesn't exist? Create it                               │
//! │       ▼                                                                 │
//! │  Compare embedded migrations vs applied                                │
//! │       │                                                                 │
//! │       ├── 001_initial_schema.sql  inventory, services, sales           │
//! │       └── 002_integer_money.sql   REAL pesos → INTEGER centavos       │
//! │       ▼                                                                 │
//! │  Run pending migrations in order, record each one                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every table statement is `CREATE TABLE IF NOT EXISTS`, so a database
//! whose tables were created by hand is adopted without data loss.
//!
//! ## Earlier Register Databases
//! Files written by the earlier register keep money as REAL pesos and may
//! predate the `sales.customer_name` column. Before the migrator runs, a
//! missing `customer_name` is added; `002` then rewrites money columns as
//! integer centavos.
//!
//! ## Adding New Migrations
//!
//! 1. Create a new file in `migrations/sqlite/` with the next sequence number
//! 2. Name format: `NNN_description.sql`
//! 3. **NEVER** modify existing migrations - always add new ones

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

/// Embedded migrations from the workspace `migrations/sqlite` directory.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Creates any missing tables and indexes.
///
/// Idempotent: calling it on an up-to-date database is a no-op.
///
/// ## Errors
/// `DbError::SchemaFailed` if a migration can't be applied.
pub async fn ensure_schema(pool: &SqlitePool) -> DbResult<()> {
    debug!(total = MIGRATOR.migrations.len(), "Checking schema");

    add_missing_customer_name(pool)
        .await
        .map_err(|e| DbError::SchemaFailed(e.to_string()))?;

    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| DbError::SchemaFailed(e.to_string()))?;

    info!("Schema is up to date");
    Ok(())
}

/// Adds `sales.customer_name` to a sales table created without it.
async fn add_missing_customer_name(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let columns: Vec<String> = sqlx::query_scalar("SELECT name FROM pragma_table_info('sales')")
        .fetch_all(pool)
        .await?;

    // No sales table yet: 001 creates it with the column
    if columns.is_empty() || columns.iter().any(|c| c == "customer_name") {
        return Ok(());
    }

    info!("Adding customer_name to an existing sales table");
    sqlx::query("ALTER TABLE sales ADD COLUMN customer_name TEXT DEFAULT ''")
        .execute(pool)
        .await?;
    Ok(())
}

/// Returns `(total_migrations, applied_migrations)`.
///
/// ## Usage
/// For diagnostics (`shopfront init` prints it).
pub async fn schema_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    // A fresh file has no bookkeeping table yet
    let tracked: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations'",
    )
    .fetch_one(pool)
    .await?;
    if tracked == 0 {
        return Ok((total, 0));
    }

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
        .fetch_one(pool)
        .await?;

    Ok((total, applied as usize))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn bare_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_status_of_untracked_database() {
        let pool = bare_pool().await;
        let (total, applied) = schema_status(&pool).await.unwrap();
        assert_eq!(total, MIGRATOR.migrations.len());
        assert_eq!(applied, 0);
    }

    #[tokio::test]
    async fn test_status_after_ensure_schema() {
        let pool = bare_pool().await;
        ensure_schema(&pool).await.unwrap();
        let (total, applied) = schema_status(&pool).await.unwrap();
        assert_eq!(applied, total);
    }

    #[tokio::test]
    async fn test_status_reports_query_errors() {
        let pool = bare_pool().await;
        pool.close().await;
        assert!(schema_status(&pool).await.is_err());
    }
}
