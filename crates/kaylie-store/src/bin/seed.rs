//! # Demo Cart Seeder
//!
//! Fills the configured cart with demo products so the storefront can be
//! developed against a non-empty cart.
//!
//! ## Usage
//! ```bash
//! # Seed 3 products (default) into the platform data directory
//! cargo run -p kaylie-store --bin seed
//!
//! # Seed a custom amount
//! cargo run -p kaylie-store --bin seed -- --items 6
//!
//! # Use another storage key or directory
//! cargo run -p kaylie-store --bin seed -- --key preview-cart --data-dir ./data
//! ```
//!
//! The existing cart under the key is cleared first. Each product gets a
//! fresh UUID, a catalog-style name, and a quantity of 1 to 3.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use kaylie_core::{LicenseType, Money, Product, ProductType};
use kaylie_store::{init_tracing, CartStore, StoreConfig, StoreResult};
use tracing::{error, info};
use uuid::Uuid;

/// Demo catalog: (name, type, price in cents, original price in cents)
const CATALOG: &[(&str, ProductType, i64, Option<i64>)] = &[
    ("Premium Loading Spinner Pack", ProductType::Animation, 1900, Some(2900)),
    ("React Component Library", ProductType::UiComponent, 4900, None),
    ("Glassmorphism Buttons", ProductType::UiComponent, 1200, None),
    ("Color Palette Generator", ProductType::HtmlTool, 900, None),
    ("Debounce and Throttle Kit", ProductType::JsUtility, 500, Some(900)),
    ("SaaS Landing Page", ProductType::Template, 3900, None),
    ("Scroll Reveal Effects", ProductType::Animation, 1500, None),
    ("Form Validation Helpers", ProductType::JsUtility, 700, None),
];

struct Args {
    items: usize,
    key: Option<String>,
    data_dir: Option<PathBuf>,
}

fn parse_args() -> Option<Args> {
    let args: Vec<String> = env::args().collect();
    let mut parsed = Args {
        items: 3,
        key: None,
        data_dir: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--items" => {
                if i + 1 < args.len() {
                    parsed.items = args[i + 1].parse().unwrap_or(3);
                    i += 1;
                }
            }
            "-k" | "--key" => {
                if i + 1 < args.len() {
                    parsed.key = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "-d" | "--data-dir" => {
                if i + 1 < args.len() {
                    parsed.data_dir = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "-h" | "--help" => {
                println!("Kaylie Labs Demo Cart Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -n, --items <N>        Number of products to add (default: 3)");
                println!("  -k, --key <KEY>        Storage key (default: $KAYLIE_CART_KEY or kaylie-labs-cart)");
                println!("  -d, --data-dir <PATH>  Snapshot directory (default: $KAYLIE_DATA_DIR or platform dir)");
                println!("  -h, --help             Show this help message");
                return None;
            }
            _ => {}
        }
        i += 1;
    }

    Some(parsed)
}

fn demo_product(index: usize) -> Product {
    let (name, product_type, price, original) = CATALOG[index % CATALOG.len()];

    let mut product = Product::new(Uuid::new_v4().to_string(), name, Money::from_cents(price));
    product.original_price = original.map(Money::from_cents);
    product.product_type = product_type;
    product.license_type = if index % 2 == 0 {
        LicenseType::Single
    } else {
        LicenseType::Multiple
    };
    product
}

fn run(args: Args) -> StoreResult<ExitCode> {
    let mut config = StoreConfig::from_env();
    if let Some(key) = args.key {
        config.storage_key = key;
    }
    if let Some(dir) = args.data_dir {
        config.data_dir = Some(dir);
    }
    config.validate()?;

    let storage = config.open_file_storage()?;
    info!(dir = %storage.dir().display(), key = %config.storage_key, "seeding cart");

    let mut store = CartStore::with_config(storage, &config)?;
    store.clear_cart()?;

    for index in 0..args.items {
        let quantity = (index % 3) as i64 + 1;
        store.add_to_cart(demo_product(index), quantity)?;
    }

    if let Some(err) = store.last_persist_error() {
        error!(error = %err, "cart was seeded in memory but not saved");
        return Ok(ExitCode::FAILURE);
    }

    println!("✓ Seeded {} products", store.items().len());
    println!("  Items: {}", store.item_count());
    println!("  Total: {}", config.format_currency(store.total()));

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    init_tracing();

    let Some(args) = parse_args() else {
        return ExitCode::SUCCESS;
    };

    match run(args) {
        Ok(code) => code,
        Err(err) => {
            error!(error = %err, "seed failed");
            ExitCode::FAILURE
        }
    }
}
