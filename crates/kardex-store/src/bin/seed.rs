//! # Seed Data Generator
//!
//! Populates the database with auto-parts products for development.
//!
//! ## Usage
//! ```bash
//! # Generate 500 products (default)
//! cargo run -p kardex-store --bin seed
//!
//! # Generate custom amount
//! cargo run -p kardex-store --bin seed -- --count 2000
//!
//! # Specify database path
//! cargo run -p kardex-store --bin seed -- --db ./data/kardex.db
//! ```
//!
//! ## Generated Products
//! Creates realistic part data across categories:
//! - Filters (oil, air, fuel, cabin)
//! - Brakes (pads, discs, drums)
//! - Electrical (batteries, alternators, spark plugs)
//! - Suspension (shocks, springs, bushings)
//! - Fluids (oil, coolant, brake fluid)
//!
//! Each product has:
//! - Unique code: `{CATEGORY}-{INDEX}`
//! - Realistic name
//! - Deterministic pseudo-random price and stock

use std::env;

use tracing_subscriber::EnvFilter;

use kardex_store::{Database, DbConfig};

/// Part categories for realistic test data
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "FLT",
        &[
            "Oil Filter",
            "Air Filter",
            "Fuel Filter",
            "Cabin Filter",
            "Hydraulic Filter",
            "Transmission Filter",
        ],
    ),
    (
        "BRK",
        &[
            "Brake Pads Front",
            "Brake Pads Rear",
            "Brake Disc",
            "Brake Drum",
            "Brake Caliper",
            "Brake Hose",
            "Handbrake Cable",
        ],
    ),
    (
        "ELC",
        &[
            "Battery 12V 45Ah",
            "Battery 12V 60Ah",
            "Alternator",
            "Starter Motor",
            "Spark Plug",
            "Glow Plug",
            "Ignition Coil",
            "Headlight Bulb",
        ],
    ),
    (
        "SUS",
        &[
            "Shock Absorber Front",
            "Shock Absorber Rear",
            "Coil Spring",
            "Leaf Spring",
            "Control Arm Bushing",
            "Stabilizer Link",
            "Ball Joint",
        ],
    ),
    (
        "FLD",
        &[
            "Engine Oil 5W-30",
            "Engine Oil 10W-40",
            "Engine Oil 20W-50",
            "Coolant Green",
            "Coolant Red",
            "Brake Fluid DOT4",
            "Power Steering Fluid",
            "Gear Oil 80W-90",
        ],
    ),
];

/// Fitment variants for parts
const FITMENTS: &[(&str, i64)] = &[
    ("Universal", 0),
    ("Toyota Hilux", 200),
    ("Nissan Frontier", 250),
    ("Hyundai H100", 150),
    ("Kia K2700", 150),
    ("Mitsubishi L200", 300),
    ("Suzuki Alto", 100),
    ("Chevrolet N300", 120),
];

/// Initializes the tracing subscriber for log output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kardex=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 500;
    let mut db_path = String::from("./kardex_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(500);
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
                println!("Kardex Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 500)");
                println!("  -d, --db <PATH>    Database file path (default: ./kardex_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Kardex Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing products
    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Generate products
    println!();
    println!("Generating products...");

    let mut generated = 0;
    let start = std::time::Instant::now();

    'outer: for (category_idx, (category_code, parts)) in CATEGORIES.iter().enumerate() {
        for (part_idx, part_name) in parts.iter().enumerate() {
            for (fitment_idx, (fitment, price_addon)) in FITMENTS.iter().enumerate() {
                if generated >= count {
                    break 'outer;
                }

                let seed = category_idx * 1000 + part_idx * 20 + fitment_idx;
                let code = format!("{}-{:04}", category_code, seed);
                let name = format!("{} {}", part_name, fitment);

                // Price S/ 4.99 - S/ 84.99 plus fitment addon
                let price_cents = 499 + ((seed * 37) % 8000) as i64 + price_addon;

                // Stock 0-60, with some parts deliberately at or under the
                // default low-stock threshold
                let quantity = (seed % 61) as i64;

                if let Err(e) = db.products().create(&code, &name, price_cents, quantity).await {
                    eprintln!("Failed to insert {}: {}", code, e);
                    continue;
                }

                generated += 1;

                if generated % 100 == 0 {
                    println!("  Generated {} products...", generated);
                }
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products in {:?}", generated, elapsed);

    // Verify a lookup
    println!();
    println!("Verifying catalog...");
    let sample = db.products().list_active(5).await?;
    for product in &sample {
        println!("  {} {} (stock {})", product.code, product.name, product.quantity);
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
