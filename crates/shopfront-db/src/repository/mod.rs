//! # Repository Module
//!
//! Database repository implementations for Shopfront POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Register command                                                      │
//! │       │                                                                 │
//! │       │  db.inventory().search("ram", None)                            │
//! │       ▼                                                                 │
//! │  InventoryRepository / ServiceRepository                               │
//! │  ├── list_all / get_by_id / search / list_categories                   │
//! │  └── add / update / delete                                             │
//! │       │                                                                 │
//! │       │  SQL Query (one pooled connection per call)                    │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  SaleRepository is read-only: sales are written exclusively by the    │
//! │  SaleCoordinator.                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`InventoryRepository`](inventory::InventoryRepository) - Stocked items, stock levels
//! - [`ServiceRepository`](service::ServiceRepository) - Services
//! - [`SaleRepository`](sale::SaleRepository) - Sale queries and daily totals

pub mod inventory;
pub mod sale;
pub mod service;

/// The literal category filter that means "no filter".
pub const ALL_CATEGORIES: &str = "All";

/// Normalizes a category filter: `None`, blank or `"All"` mean no filter.
pub(crate) fn category_filter(category: Option<&str>) -> Option<&str> {
    category
        .map(str::trim)
        .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
}

/// Builds a `LIKE` pattern matching `term` anywhere, with `\` as the escape
/// character.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
