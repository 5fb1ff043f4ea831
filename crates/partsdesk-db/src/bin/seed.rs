//! # Seed Data Generator
//!
//! Populates the database with a test parts catalog and party directory
//! for development.
//!
//! ## Usage
//! ```bash
//! # Generate 1,000 products (default)
//! cargo run -p partsdesk-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p partsdesk-db --bin seed -- --count 5000
//!
//! # Specify database path
//! cargo run -p partsdesk-db --bin seed -- --db ./data/partsdesk.db
//! ```
//!
//! ## Generated Data
//! Auto parts across common categories (brakes, filters, suspension,
//! electrical, engine), fitted to a handful of makes/models, plus a few
//! clients and suppliers. Each product gets:
//! - Unique SKU: `{CATEGORY}-{MAKE}-{INDEX}`
//! - Tax-inclusive sale price
//! - Random stock: 0 - 50
//! - Tax rate: 0% or 18%

use chrono::Utc;
use std::env;

use partsdesk_core::{Party, PartyRole, Product};
use partsdesk_db::repository::party::generate_party_id;
use partsdesk_db::repository::product::generate_product_id;
use partsdesk_db::{Database, DbConfig};

/// Part categories with representative part names.
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "BRK",
        &[
            "Brake Pad Set Front",
            "Brake Pad Set Rear",
            "Brake Disc Front",
            "Brake Disc Rear",
            "ABS Sensor Front Left",
            "ABS Sensor Front Right",
            "Brake Caliper Front",
            "Handbrake Cable",
            "Brake Fluid DOT4",
            "Brake Hose Front",
        ],
    ),
    (
        "FLT",
        &[
            "Oil Filter",
            "Air Filter",
            "Cabin Filter",
            "Fuel Filter",
            "Transmission Filter",
        ],
    ),
    (
        "SUS",
        &[
            "Shock Absorber Front",
            "Shock Absorber Rear",
            "Coil Spring Front",
            "Control Arm Lower",
            "Stabilizer Link",
            "Ball Joint",
            "Tie Rod End",
            "Wheel Bearing Front",
        ],
    ),
    (
        "ELE",
        &[
            "Alternator",
            "Starter Motor",
            "Ignition Coil",
            "Spark Plug Set",
            "Battery 60Ah",
            "Headlight Bulb H7",
            "Oxygen Sensor",
            "Camshaft Sensor",
        ],
    ),
    (
        "ENG",
        &[
            "Timing Belt Kit",
            "Water Pump",
            "Thermostat",
            "Radiator",
            "Engine Mount",
            "Valve Cover Gasket",
            "Serpentine Belt",
            "Turbocharger",
        ],
    ),
];

/// Vehicle fitments: (make, models).
const FITMENTS: &[(&str, &[&str])] = &[
    ("Toyota", &["Corolla", "Camry", "Hilux"]),
    ("Honda", &["Civic", "City", "Accord"]),
    ("Suzuki", &["Swift", "Cultus", "Alto"]),
    ("Audi", &["A4", "A6", "Q5"]),
    ("BMW", &["320i", "520d", "X5"]),
];

/// Part brands.
const BRANDS: &[&str] = &["Bosch", "Denso", "NGK", "Monroe", "Gates", "Mahle"];

/// Tax rates in basis points. Most parts carry the standard rate.
const TAX_RATES: &[u32] = &[1800, 1800, 1800, 0];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 1000;
    let mut db_path = String::from("./partsdesk_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(1000);
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
                println!("PartsDesk Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 1000)");
                println!("  -d, --db <PATH>    Database file path (default: ./partsdesk_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 PartsDesk Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

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

    println!();
    println!("Generating products...");

    let mut generated = 0;
    let start = std::time::Instant::now();

    'outer: for (category_idx, (category_code, parts)) in CATEGORIES.iter().enumerate() {
        for (part_idx, part_name) in parts.iter().enumerate() {
            for (fit_idx, (make, models)) in FITMENTS.iter().enumerate() {
                if generated >= count {
                    break 'outer;
                }

                let seed = category_idx * 1000 + part_idx * 40 + fit_idx;
                let model = models[seed % models.len()];
                let product = generate_product(category_code, part_name, make, model, seed);

                if let Err(e) = db.products().insert(&product).await {
                    eprintln!("Failed to insert {}: {}", product.sku, e);
                    continue;
                }

                generated += 1;

                if generated % 200 == 0 {
                    println!("  Generated {} products...", generated);
                }
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products in {:?}", generated, elapsed);

    println!();
    println!("Generating parties...");
    for party in sample_parties() {
        db.parties().insert(&party).await?;
        println!("  + {} ({:?})", party.name, party.role);
    }

    println!();
    println!("Verifying search...");
    let results = db.products().search("brake", 10).await?;
    println!("  Search 'brake': {} results", results.len());

    let results = db.products().search("Corolla", 10).await?;
    println!("  Search 'Corolla': {} results", results.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single product with realistic data.
fn generate_product(category: &str, name: &str, make: &str, model: &str, seed: usize) -> Product {
    let now = Utc::now();

    let sku = format!("{}-{}-{:04}", category, make[..3].to_uppercase(), seed);

    // Tax-inclusive sale price: roughly 5.00 - 250.00
    let sale_price_cents = 500 + ((seed * 37) % 24_500) as i64;

    // Cost: 60-80% of sale price
    let cost_pct = 60 + (seed % 20) as i64;
    let purchase_price_cents = Some(sale_price_cents * cost_pct / 100);

    let tax_rate_bps = TAX_RATES[seed % TAX_RATES.len()];
    let stock = (seed % 51) as i64;
    let brand = BRANDS[seed % BRANDS.len()];

    Product {
        id: generate_product_id(),
        sku,
        name: name.to_string(),
        brand: Some(brand.to_string()),
        make: Some(make.to_string()),
        model: Some(model.to_string()),
        variant: None,
        category: Some(category.to_string()),
        purchase_price_cents,
        sale_price_cents,
        tax_rate_bps,
        stock,
        created_at: now,
        updated_at: now,
    }
}

/// A handful of clients and suppliers for ledger/party testing.
fn sample_parties() -> Vec<Party> {
    let now = Utc::now();

    let entries: &[(&str, PartyRole, Option<&str>)] = &[
        ("City Motors Workshop", PartyRole::Client, Some("GST-114422")),
        ("Khan Auto Repairs", PartyRole::Client, None),
        ("Highway Garage", PartyRole::Client, None),
        ("Bosch Distribution Ltd", PartyRole::Supplier, Some("GST-550011")),
        ("Denso Parts Supply", PartyRole::Supplier, Some("GST-550090")),
    ];

    entries
        .iter()
        .map(|(name, role, gst)| Party {
            id: generate_party_id(),
            name: name.to_string(),
            role: *role,
            gst_no: gst.map(str::to_string),
            phone: None,
            address: None,
            created_at: now,
        })
        .collect()
}
