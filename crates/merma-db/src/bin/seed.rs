//! # Seed Data Generator
//!
//! Populates a development database with one business, a product catalog,
//! stock levels and a few weeks of sales.
//!
//! ## Usage
//! ```bash
//! # One business, 60 products, 21 days of sales (defaults)
//! cargo run -p merma-db --bin seed
//!
//! # Bigger catalog, custom database
//! cargo run -p merma-db --bin seed -- --products 400 --db ./data/merma.db
//! ```
//!
//! The generated business id is printed at the end; pass it to
//! `faltantes --business <id>`.
//!
//! ## Generated Data
//! - Products named after allow-list categories (`LECHE ...`, `ARROZ ...`)
//!   plus a few that fall into OTROS
//! - Purchase cost: $800 - $15.000 (pesos)
//! - Stock: 0 - 24, with every seventh product out of stock
//! - 3 - 8 sales per day, 1 - 4 lines each, one shift per day

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use clap::Parser;
use merma_core::Money;
use merma_db::{Database, DbConfig, SaleLine};
use tracing_subscriber::EnvFilter;

/// Product names, grouped by the category their first word selects.
const CATALOG: &[&str] = &[
    "Leche Alqueria entera 1L",
    "Leche Colanta deslactosada 1L",
    "Arroz Diana 500g",
    "Arroz Roa 1kg",
    "Aceite Premier 1L",
    "Azucar Manuelita 1kg",
    "Cafe Sello Rojo 250g",
    "Huevos AA x12",
    "Pasta Doria spaghetti 250g",
    "Harina PAN 1kg",
    "Gaseosa Postobon 1.5L",
    "Cerveza Aguila lata",
    "Agua Cristal 600ml",
    "Jugo Hit mora 500ml",
    "Galletas Festival",
    "Chocolate Corona 250g",
    "Jabon Rey barra",
    "Detergente Fab 500g",
    "Papel higienico Familia x4",
    "Shampoo Sedal 340ml",
    "Sal Refisal 500g",
    "Cigarrillos Marlboro",
    "Pan tajado Bimbo",
    "Atun Van Camps",
];

const SIZES: &[&str] = &["", " x2", " x6", " promo"];

#[derive(Debug, Parser)]
#[command(name = "seed", about = "Populate a development database")]
struct Args {
    /// Database file path
    #[arg(short, long, default_value = "./merma_dev.db")]
    db: String,

    /// Business name
    #[arg(short, long, default_value = "Tienda La Esquina")]
    business: String,

    /// Number of products to generate
    #[arg(short, long, default_value_t = 60)]
    products: usize,

    /// Days of sales history
    #[arg(long, default_value_t = 21)]
    days: i64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    println!("🌱 Merma Seed Data Generator");
    println!("============================");
    println!("Database: {}", args.db);
    println!("Products: {}", args.products);
    println!("Days:     {}", args.days);
    println!();

    let db = Database::new(DbConfig::new(&args.db))
        .await
        .context("opening database")?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();
    let business = db.businesses().create(&args.business).await?;
    println!("✓ Business '{}' created", business.name);

    // Catalog and stock
    let mut catalog = Vec::with_capacity(args.products);
    for seed in 0..args.products {
        let name = format!(
            "{}{}",
            CATALOG[seed % CATALOG.len()],
            SIZES[(seed / CATALOG.len()) % SIZES.len()]
        );
        let cost = Money::from_cents(80_000 + ((seed * 7_919) % 1_420_000) as i64);
        let price = Money::from_cents(cost.cents() * (125 + (seed % 20) as i64) / 100);

        let product = db.products().create(&name, cost).await?;
        let stock = if seed % 7 == 0 { 0 } else { (seed % 25) as i64 };
        db.inventory().set_stock(&business.id, &product.id, stock).await?;

        catalog.push((product.id, price));
    }
    println!("✓ Generated {} products with stock", catalog.len());

    if catalog.is_empty() {
        println!("✓ Seed complete! Business id: {}", business.id);
        return Ok(());
    }

    // Sales, one shift per day
    let now = Utc::now();
    let mut sale_count = 0usize;
    for day in 0..args.days {
        let opened = now - Duration::days(day) - Duration::hours(10);
        let shift = db
            .shifts()
            .open(&business.id, &format!("empleado-{}", day % 3 + 1), opened)
            .await?;

        let sales_today = 3 + (day * 5 % 6) as usize;
        for n in 0..sales_today {
            let seed = (day as usize) * 31 + n * 7;
            let lines: Vec<SaleLine> = (0..1 + seed % 4)
                .map(|k| {
                    let (product_id, price) = &catalog[(seed + k * 13) % catalog.len()];
                    SaleLine::new(product_id.clone(), 1 + ((seed + k) % 3) as i64, *price)
                })
                .collect();

            let at = opened + Duration::minutes(20 * (n as i64 + 1));
            db.sales()
                .record_sale(&business.id, Some(&shift.id), &lines, at)
                .await?;
            sale_count += 1;
        }

        db.shifts().close(&shift.id, opened + Duration::hours(8)).await?;
    }

    let elapsed = start.elapsed();
    println!("✓ Generated {} sales in {:?}", sale_count, elapsed);
    println!();
    println!("✓ Seed complete! Business id: {}", business.id);
    println!("  faltantes --db {} --business {}", args.db, business.id);

    Ok(())
}
