//! # Register State
//!
//! State is split by concern, and each command takes only the parts it needs:
//!
//! - `Database` (from `shopfront-db`) - the connection pool
//! - [`CartState`] - the cart being assembled
//! - [`AppConfig`] - store settings
//!
//! ```rust,ignore
//! pub async fn checkout(db: &Database, cart: &CartState, config: &AppConfig)
//! ```

mod cart;
mod config;

pub use cart::CartState;
pub use config::{
    default_config_path, default_database_path, AppConfig, ConfigError, DatabaseConfig,
    InventoryConfig, StoreConfig, CONFIG_FILE_NAME,
};
