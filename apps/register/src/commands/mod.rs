//! # Register Commands
//!
//! Every operation the register offers, as plain async functions.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (exports)
//! ├── inventory.rs  ◄─── Inventory search, CRUD, restock, low stock
//! ├── services.rs   ◄─── Service search, CRUD
//! ├── cart.rs       ◄─── Cart manipulation
//! ├── sale.rs       ◄─── Checkout
//! └── report.rs     ◄─── Daily totals and sales history
//! ```
//!
//! ## State Injection
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Only needs database
//! async fn search_inventory(db: &Database, query: &str, category: Option<&str>)
//!
//! // Only needs cart
//! async fn get_cart(cart: &CartState)
//!
//! // Needs both
//! async fn add_item_to_cart(db: &Database, cart: &CartState, item_id: i64, quantity: i64)
//!
//! // Needs everything
//! async fn checkout(db: &Database, cart: &CartState, config: &AppConfig)
//! ```

pub mod cart;
pub mod inventory;
pub mod report;
pub mod sale;
pub mod services;

pub use cart::*;
pub use inventory::*;
pub use report::*;
pub use sale::*;
pub use services::*;
