//! # Demo Catalog
//!
//! A small computer-shop catalog for development and demos. Used by the
//! `seed` binary and `shopfront seed`.

use tracing::{info, warn};

use crate::error::DbResult;
use crate::pool::Database;
use shopfront_core::{InventoryFields, Money, ServiceFields};

/// (name, brand, category, pesos, stock)
const ITEMS: &[(&str, &str, &str, i64, i64)] = &[
    ("RAM 8GB DDR4", "Kingston", "Memory", 1000, 12),
    ("RAM 16GB DDR4", "Kingston", "Memory", 1900, 6),
    ("RAM 8GB DDR5", "Corsair", "Memory", 1650, 3),
    ("SSD 256GB SATA", "Samsung", "Storage", 1500, 10),
    ("SSD 512GB NVMe", "WD", "Storage", 2500, 4),
    ("HDD 1TB", "Seagate", "Storage", 2300, 2),
    ("Wireless Mouse", "Logitech", "Peripherals", 450, 25),
    ("Mechanical Keyboard", "Redragon", "Peripherals", 1800, 5),
    ("USB Flash Drive 32GB", "SanDisk", "Storage", 250, 40),
    ("HDMI Cable 1.5m", "Ugreen", "Cables", 180, 30),
    ("Power Supply 550W", "Seasonic", "Components", 3200, 1),
    ("Thermal Paste", "Arctic", "Components", 350, 0),
];

/// (name, category, pesos, description)
const SERVICES: &[(&str, &str, i64, &str)] = &[
    ("Reformat", "Software", 350, "OS reinstall with drivers"),
    ("Virus Removal", "Software", 300, "Scan and clean-up"),
    ("Data Backup", "Software", 500, "Up to 500GB"),
    ("Laptop Cleaning", "Hardware", 600, "Dust removal and repaste"),
    ("Screen Replacement", "Hardware", 1500, "Labor only"),
    ("RAM/SSD Installation", "Hardware", 200, "Per unit"),
];

/// What [`seed_demo_data`] inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub items: usize,
    pub services: usize,
}

impl SeedSummary {
    pub fn is_empty(&self) -> bool {
        self.items == 0 && self.services == 0
    }
}

/// Inserts the demo catalog into empty tables. Tables that already have
/// rows are left alone.
pub async fn seed_demo_data(db: &Database) -> DbResult<SeedSummary> {
    let mut summary = SeedSummary::default();

    let inventory = db.inventory();
    if inventory.count().await? == 0 {
        for (name, brand, category, pesos, stock) in ITEMS {
            inventory
                .add(&InventoryFields {
                    name: name.to_string(),
                    brand: Some(brand.to_string()),
                    category: Some(category.to_string()),
                    price: Money::from_major_minor(*pesos, 0),
                    stock: *stock,
                })
                .await?;
            summary.items += 1;
        }
    } else {
        warn!("Inventory already has rows, not seeding items");
    }

    let services = db.services();
    if services.count().await? == 0 {
        for (name, category, pesos, description) in SERVICES {
            services
                .add(&ServiceFields {
                    name: name.to_string(),
                    category: Some(category.to_string()),
                    price: Money::from_major_minor(*pesos, 0),
                    description: Some(description.to_string()),
                })
                .await?;
            summary.services += 1;
        }
    } else {
        warn!("Services already has rows, not seeding services");
    }

    info!(items = summary.items, services = summary.services, "Seed complete");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbConfig;

    #[tokio::test]
    async fn test_seed_is_skipped_on_second_run() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let first = seed_demo_data(&db).await.unwrap();
        assert_eq!(first.items, ITEMS.len());
        assert_eq!(first.services, SERVICES.len());

        let second = seed_demo_data(&db).await.unwrap();
        assert!(second.is_empty());
        assert_eq!(db.inventory().count().await.unwrap(), ITEMS.len() as i64);
    }
}
