// ABOUTME: Larder CLI - command-line front end for the pantry engine
// ABOUTME: Manages the catalog, stock lots, recipes and the shopping list against one database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # What can I cook right now?
//! larder-cli recipes makeable
//!
//! # Check a recipe for four portions
//! larder-cli recipes show 2 --portions 4
//!
//! # Cook it, putting anything missing on the shopping list
//! larder-cli recipes make 2 --portions 4 --on-shortfall add-to-list
//!
//! # Lots expiring in the next three days
//! larder-cli stock expiring --days 3
//!
//! # Move one shopping row into stock
//! larder-cli shopping buy 5 --expiry 2025-06-01
//! ```

mod commands;
mod helpers;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use larder::config::{DatabaseUrl, LarderConfig};
use larder::logging::LoggingConfig;
use larder::services::Pantry;
use larder_inventory::ShortfallChoice;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "larder-cli",
    about = "Larder Pantry Management CLI",
    long_about = "Track ingredients in stock, check which recipes can be made, cook them and keep the shopping list in sync."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Unit registry
    Units {
        #[command(subcommand)]
        action: UnitCommand,
    },

    /// Ingredient catalog
    Ingredients {
        #[command(subcommand)]
        action: IngredientCommand,
    },

    /// Stock lots
    Stock {
        #[command(subcommand)]
        action: StockCommand,
    },

    /// Recipes and availability
    Recipes {
        #[command(subcommand)]
        action: RecipeCommand,
    },

    /// Shopping list
    Shopping {
        #[command(subcommand)]
        action: ShoppingCommand,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum UnitCommand {
    /// List every known unit
    List,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum IngredientCommand {
    /// List the catalog
    List,

    /// Add an ingredient
    Add {
        /// Ingredient name
        #[arg(long)]
        name: String,

        /// Category (defaults to "Other")
        #[arg(long)]
        category: Option<String>,

        /// Canonical unit symbol
        #[arg(long)]
        unit: Option<String>,
    },

    /// Delete an ingredient; its stock lots become orphans
    Delete {
        /// Ingredient ID
        id: i64,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum StockCommand {
    /// List every lot with days to expiry
    List,

    /// Put a new lot into stock
    Add {
        /// Ingredient ID
        #[arg(long)]
        ingredient: i64,

        /// Quantity
        #[arg(long)]
        quantity: f64,

        /// Unit (defaults to the ingredient's unit)
        #[arg(long)]
        unit: Option<String>,

        /// Expiry date (YYYY-MM-DD)
        #[arg(long)]
        expiry: NaiveDate,
    },

    /// Remove a lot
    Remove {
        /// Lot ID
        id: i64,
    },

    /// Lots expiring soon
    Expiring {
        /// Window in days (defaults to the configured window)
        #[arg(long)]
        days: Option<u32>,
    },

    /// Delete lots whose ingredient no longer exists
    PurgeOrphans,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum RecipeCommand {
    /// List recipes with their availability
    List {
        /// Filter by name, description or category
        #[arg(long)]
        search: Option<String>,
    },

    /// Recipes whose requirements are fully in stock
    Makeable,

    /// Show a recipe with per-ingredient availability
    Show {
        /// Recipe ID
        id: i64,

        /// Portion multiplier
        #[arg(long, default_value = "1")]
        portions: f64,
    },

    /// Cook a recipe, deducting its requirements from stock
    Make {
        /// Recipe ID
        id: i64,

        /// Portion multiplier
        #[arg(long, default_value = "1")]
        portions: f64,

        /// What to do when stock is short (add-to-list, proceed)
        #[arg(long, value_parser = parse_shortfall_choice)]
        on_shortfall: Option<ShortfallChoice>,
    },

    /// Delete a recipe and the shopping rows it produced
    Delete {
        /// Recipe ID
        id: i64,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum ShoppingCommand {
    /// List the shopping list with quantities in stock
    List,

    /// Add a recipe's missing ingredients
    AddMissing {
        /// Recipe ID
        recipe: i64,

        /// Portion multiplier
        #[arg(long, default_value = "1")]
        portions: f64,
    },

    /// Move one row into stock
    Buy {
        /// Shopping list item ID
        item: i64,

        /// Quantity bought (defaults to the quantity needed)
        #[arg(long)]
        quantity: Option<f64>,

        /// Expiry date (YYYY-MM-DD, defaults to the configured shelf life)
        #[arg(long)]
        expiry: Option<NaiveDate>,
    },

    /// Move every row into stock
    BuyAll,

    /// Remove one row
    Remove {
        /// Shopping list item ID
        item: i64,
    },

    /// Empty the shopping list
    Clear,
}

fn parse_shortfall_choice(value: &str) -> std::result::Result<ShortfallChoice, String> {
    ShortfallChoice::parse(value)
        .ok_or_else(|| format!("unknown choice '{value}', expected add-to-list or proceed"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so command output stays clean
    let log_level = if cli.verbose { "debug" } else { "warn" };
    LoggingConfig::from_env()
        .with_level(log_level)
        .with_stderr()
        .init()?;

    let mut config = LarderConfig::from_env()?;
    if let Some(url) = cli.database_url.as_deref() {
        config.database = DatabaseUrl::parse_url(url);
    }
    info!("Connecting to database: {}", config.database);
    let pantry = Pantry::from_config(&config).await?;

    match cli.command {
        Command::Units { action } => match action {
            UnitCommand::List => commands::catalog::list_units(&pantry).await?,
        },
        Command::Ingredients { action } => match action {
            IngredientCommand::List => commands::catalog::list_ingredients(&pantry).await?,
            IngredientCommand::Add {
                name,
                category,
                unit,
            } => commands::catalog::add_ingredient(&pantry, name, category, unit).await?,
            IngredientCommand::Delete { id } => {
                commands::catalog::delete_ingredient(&pantry, id).await?;
            }
        },
        Command::Stock { action } => match action {
            StockCommand::List => commands::stock::list(&pantry).await?,
            StockCommand::Add {
                ingredient,
                quantity,
                unit,
                expiry,
            } => commands::stock::add(&pantry, ingredient, quantity, unit, expiry).await?,
            StockCommand::Remove { id } => commands::stock::remove(&pantry, id).await?,
            StockCommand::Expiring { days } => commands::stock::expiring(&pantry, days).await?,
            StockCommand::PurgeOrphans => commands::stock::purge_orphans(&pantry).await?,
        },
        Command::Recipes { action } => match action {
            RecipeCommand::List { search } => {
                commands::recipes::list(&pantry, search.as_deref()).await?;
            }
            RecipeCommand::Makeable => commands::recipes::makeable(&pantry).await?,
            RecipeCommand::Show { id, portions } => {
                commands::recipes::show(&pantry, id, portions).await?;
            }
            RecipeCommand::Make {
                id,
                portions,
                on_shortfall,
            } => commands::recipes::make(&pantry, id, portions, on_shortfall).await?,
            RecipeCommand::Delete { id } => commands::recipes::delete(&pantry, id).await?,
        },
        Command::Shopping { action } => match action {
            ShoppingCommand::List => commands::shopping::list(&pantry).await?,
            ShoppingCommand::AddMissing { recipe, portions } => {
                commands::shopping::add_missing(&pantry, recipe, portions).await?;
            }
            ShoppingCommand::Buy {
                item,
                quantity,
                expiry,
            } => commands::shopping::buy(&pantry, item, quantity, expiry).await?,
            ShoppingCommand::BuyAll => commands::shopping::buy_all(&pantry).await?,
            ShoppingCommand::Remove { item } => commands::shopping::remove(&pantry, item).await?,
            ShoppingCommand::Clear => commands::shopping::clear(&pantry).await?,
        },
    }

    pantry.database().close().await;
    Ok(())
}
