//! # Seed Data Generator
//!
//! Populates the database with demo sales and stock for development.
//!
//! ## Usage
//! ```bash
//! # Generate 200 sales over the last 60 days (default)
//! cargo run -p duka-store --bin seed
//!
//! # Generate custom amount
//! cargo run -p duka-store --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p duka-store --bin seed -- --db ./data/duka.db
//! ```
//!
//! ## Generated Sales
//! The sales document deliberately mixes every shape found in real stores:
//! - Legacy records (`saleId`, `quantitySold`, `profit`), every 10th
//! - Partial records (missing totals, numbers as strings), every 7th
//! - Canonical records, the rest
//!
//! Every 9th sale is discounted below cost so that losses show up in reports.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde_json::{json, Value};
use std::env;

use duka_core::{InventoryItem, Money};
use duka_store::{Database, DbConfig};

/// Demo catalogue: (name, buy price, sell price) in cents.
const CATALOGUE: &[(&str, i64, i64)] = &[
    ("Sugar 2kg", 28_000, 32_000),
    ("Maize Flour 2kg", 15_500, 18_000),
    ("Rice 1kg", 17_000, 21_000),
    ("Cooking Oil 1L", 32_000, 37_500),
    ("Bar Soap", 9_500, 12_000),
    ("Milk 500ml", 5_500, 6_500),
    ("Bread", 5_800, 7_000),
    ("Tea Leaves 250g", 11_000, 14_000),
    ("Salt 1kg", 4_000, 5_500),
    ("Matchbox", 150, 300),
];

/// Days of history the sales are spread over.
const HISTORY_DAYS: i64 = 60;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./duka_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Duka Ledger Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of sales to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./duka_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Duka Ledger Seed Data Generator");
    println!("==================================");
    println!("Database: {}", db_path);
    println!("Sales:    {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.sales().load_all().await?.len();
    if existing > 0 {
        println!("⚠ Database already has {} sales", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let now = Utc::now();

    // Stock
    println!();
    println!("Generating inventory...");
    let inventory = db.inventory();
    for (idx, (name, buy, sell)) in CATALOGUE.iter().enumerate() {
        let created = now - Duration::milliseconds(idx as i64 + 1);
        let item = InventoryItem::new(
            name,
            Money::from_cents(*buy),
            Money::from_cents(*sell),
            20 + (idx as i64 * 7) % 40,
            "",
            &created,
        )?;
        inventory.add(item).await?;
    }
    println!("✓ Generated {} inventory items", CATALOGUE.len());

    // Sales
    println!();
    println!("Generating sales...");
    let start = std::time::Instant::now();

    let sales: Vec<Value> = (0..count).map(|seed| generate_sale(seed, &now)).collect();
    db.sales().save_raw(&sales).await?;

    let elapsed = start.elapsed();
    println!("✓ Generated {} sales in {:?}", sales.len(), elapsed);

    // Verify the mixed shapes normalize
    println!();
    println!("Verifying normalization...");
    let (records, report) = db.sales().load_with_report().await?;
    println!("  Loaded:    {}", records.len());
    println!("  Legacy:    {}", report.legacy);
    println!("  Partial:   {}", report.partial);
    println!("  Canonical: {}", report.canonical);

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}

/// Generates one stored sale. The shape depends on `seed`.
fn generate_sale(seed: usize, now: &DateTime<Utc>) -> Value {
    let (name, buy, sell) = CATALOGUE[seed % CATALOGUE.len()];

    let days_ago = (seed as i64 * 7) % HISTORY_DAYS;
    let minutes = ((seed as i64 * 37) % 600) + 8 * 60;
    let at = *now - Duration::days(days_ago) - Duration::minutes(minutes);

    let quantity = 1 + (seed % 5) as i64;
    let total_cost = Money::from_cents(buy * quantity);
    let unit_price = if seed % 9 == 0 { buy * 90 / 100 } else { sell };
    let total_sale = Money::from_cents(unit_price * quantity);
    let profit = total_sale - total_cost;

    let id = at.timestamp_millis() + seed as i64;
    let sale_date = at.to_rfc3339_opts(SecondsFormat::Millis, true);

    if seed % 10 == 0 {
        json!({
            "saleId": id,
            "itemName": name,
            "quantitySold": quantity,
            "totalCost": total_cost.as_units(),
            "totalSale": total_sale.as_units(),
            "profit": profit.as_units(),
            "saleDate": sale_date,
        })
    } else if seed % 7 == 0 {
        json!({
            "id": id,
            "itemName": name,
            "quantity": quantity.to_string(),
            "totalSale": total_sale.as_units().to_string(),
            "saleDate": sale_date,
        })
    } else {
        json!({
            "id": id,
            "itemName": name,
            "quantity": quantity,
            "totalCost": total_cost.as_units(),
            "totalSale": total_sale.as_units(),
            "profitLoss": profit.as_units(),
            "saleDate": sale_date,
        })
    }
}
