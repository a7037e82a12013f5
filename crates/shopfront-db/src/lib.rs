//! # shopfront-db: Database Layer for Shopfront POS
//!
//! This crate provides database access for Shopfront POS.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Shopfront POS Data Flow                            │
//! │                                                                         │
//! │  Register command (checkout)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   shopfront-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────┐   ┌────────────────┐   ┌───────────────┐    │   │
//! │  │   │   Database   │   │ SaleCoordinator│   │  Repositories │    │   │
//! │  │   │  (pool.rs)   │◄──│ (one tx per    │──►│ Inventory     │    │   │
//! │  │   │              │   │  sale)         │   │ Service       │    │   │
//! │  │   │ SqlitePool   │   └────────────────┘   │ Sale (reads)  │    │   │
//! │  │   │ WAL + busy   │                        └───────────────┘    │   │
//! │  │   └──────────────┘   migrations: 001 schema, 002 centavos      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │                  <data dir>/data/app.db                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded schema
//! - [`coordinator`] - The sale transaction
//! - [`error`] - Database error types
//! - [`repository`] - Inventory, service and sale repositories
//! - [`seed`] - Demo catalog
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shopfront_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("data/app.db")).await?;
//!
//! let ram = db.inventory().search("ram", None).await?;
//! let recorded = db.coordinator().record_sale(cart.items(), cart.total(), "").await?;
//! let today = db.sales().total_today().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod coordinator;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use coordinator::{
    CoordinatorOptions, MissingItemPolicy, RecordedSale, SaleCoordinator, StockAdjustment,
    StockPolicy,
};
pub use error::{DbError, DbResult, SaleError};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::inventory::InventoryRepository;
pub use repository::sale::SaleRepository;
pub use repository::service::ServiceRepository;
pub use repository::ALL_CATEGORIES;
