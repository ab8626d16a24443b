// ABOUTME: Demo data seeder for the Larder pantry manager
// ABOUTME: Loads twelve ingredients, three recipes with steps and a handful of stock lots
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Demo data seeder for Larder.
//!
//! Usage:
//! ```bash
//! # Seed the default database (skipped when recipes already exist)
//! cargo run --bin seed-demo-data
//!
//! # Clear every table except units, then seed
//! cargo run --bin seed-demo-data -- --reset
//!
//! # Seed another database with verbose output
//! cargo run --bin seed-demo-data -- --database-url sqlite:./demo.db -v
//! ```

use anyhow::Result;
use clap::Parser;
use larder::clock::{Clock, SystemClock};
use larder::config::{DatabaseUrl, LarderConfig};
use larder::database::demo_data::seed_demo_data;
use larder::database::Database;
use larder::logging::LoggingConfig;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "seed-demo-data",
    about = "Larder Demo Data Seeder",
    long_about = "Populate the database with demo ingredients, recipes and stock"
)]
struct SeedArgs {
    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Clear every table except units before seeding
    #[arg(long)]
    reset: bool,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = SeedArgs::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    LoggingConfig::from_env().with_level(log_level).init()?;

    info!("=== Larder Demo Data Seeder ===");

    let config = LarderConfig::from_env()?;
    let database_url = args
        .database_url
        .as_deref()
        .map_or_else(|| config.database.clone(), DatabaseUrl::parse_url);

    info!("Connecting to database: {}", database_url.to_connection_string());
    let database = Database::from_config(&database_url).await?;

    if args.reset {
        info!("Resetting pantry data...");
        database.clear_all_data().await?;
    }

    let summary = seed_demo_data(&database, SystemClock.today()).await?;
    if summary.is_empty() {
        info!("Database already holds recipes, nothing seeded (use --reset to start over)");
    } else {
        info!(
            "Seeded {} ingredients, {} recipes and {} stock lots",
            summary.ingredients, summary.recipes, summary.stock_lots
        );
    }

    database.close().await;
    Ok(())
}
