//! # Shopfront Register Library
//!
//! The register: cart, checkout and catalog commands on top of
//! `shopfront-core` and `shopfront-db`. The `shopfront` binary is a thin
//! command-line front over this library.
//!
//! ## Module Organization
//! ```text
//! shopfront_register/
//! ├── lib.rs          ◄─── You are here (startup helpers)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── cart.rs     ◄─── Cart state management
//! │   └── config.rs   ◄─── shopfront.toml + SHOPFRONT_* overrides
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── inventory.rs◄─── Inventory search/CRUD/restock
//! │   ├── services.rs ◄─── Service search/CRUD
//! │   ├── cart.rs     ◄─── Cart manipulation commands
//! │   ├── sale.rs     ◄─── Checkout
//! │   └── report.rs   ◄─── Sales reports
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. init_tracing()         RUST_LOG, default info,shopfront=debug      │
//! │  2. AppConfig::load()      defaults → shopfront.toml → env → validate  │
//! │  3. open_database(&config) WAL pool, busy timeout, migrations          │
//! │  4. CartState::new()       empty cart                                  │
//! │  5. run commands                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod state;

use tracing::info;
use tracing_subscriber::EnvFilter;

use error::ApiError;
use shopfront_db::Database;
use state::AppConfig;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,shopfront=debug,sqlx=warn";

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=shopfront_db=trace` - Trace the database layer only
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Opens the configured database, creating it and its schema if needed.
pub async fn open_database(config: &AppConfig) -> Result<Database, ApiError> {
    let db_config = config.db_config();
    info!(path = %db_config.database_path.display(), "Opening database");
    let db = Database::new(db_config).await?;
    Ok(db)
}
