//! # Seed Data Generator
//!
//! Populates a database with the demo computer-shop catalog.
//!
//! ## Usage
//! ```bash
//! # Seed ./shopfront_dev.db
//! cargo run -p shopfront-db --bin seed
//!
//! # Specify database path
//! cargo run -p shopfront-db --bin seed -- --db ./data/app.db
//! ```
//!
//! Tables that already contain rows are skipped, so running it twice is
//! harmless.

use std::env;

use shopfront_db::seed::seed_demo_data;
use shopfront_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./shopfront_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Shopfront POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./shopfront_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => {
                eprintln!("Ignoring unknown argument: {}", other);
            }
        }
        i += 1;
    }

    println!("🌱 Shopfront POS Seed Data Generator");
    println!("====================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Schema ready");

    let start = std::time::Instant::now();
    let summary = seed_demo_data(&db).await?;

    if summary.is_empty() {
        println!("⚠ Catalog already populated, nothing inserted.");
        println!("  Delete the database file to regenerate.");
    } else {
        println!(
            "✓ Inserted {} items and {} services in {:?}",
            summary.items,
            summary.services,
            start.elapsed()
        );
    }

    let low = db.inventory().list_low_stock(shopfront_core::DEFAULT_LOW_STOCK_THRESHOLD).await?;
    println!("  Low stock items: {}", low.len());

    db.close().await;
    println!();
    println!("✓ Seed complete!");

    Ok(())
}
