// ABOUTME: Main library entry point for the Larder recipe and pantry manager
// ABOUTME: Persistence, configuration, logging and the stock availability and consumption services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Larder
//!
//! Recipes, ingredients and perishable stock in a `SQLite` file, plus the
//! engine that tells whether a recipe can be made right now.
//!
//! ## Features
//!
//! - **Unit-exact aggregation**: lots combine only when their trimmed, lowercased units match
//! - **Availability verdicts**: full, partial or none, with per-ingredient shortfalls
//! - **FEFO consumption**: making a recipe uses the earliest-expiring lots first
//! - **Shopping list**: shortfalls become rows, purchases become stock lots
//!
//! ## Architecture
//!
//! - **`larder_core`**: models, identifiers, errors and constants
//! - **`larder_inventory`**: pure algorithms over a stock snapshot
//! - **database**: `SQLite` managers and the repository traits the services consume
//! - **services**: unit registry, ingredient catalog, stock ledger, evaluator, reconciler
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use larder::config::LarderConfig;
//! use larder::errors::AppResult;
//! use larder::services::Pantry;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = LarderConfig::from_env()?;
//!     let pantry = Pantry::from_config(&config).await?;
//!
//!     for recipe in pantry.evaluator().makeable_recipes().await? {
//!         println!("You can make {}", recipe.name);
//!     }
//!     Ok(())
//! }
//! ```

/// Source of the current calendar day
pub mod clock;

/// Environment-based configuration
pub mod config;

/// Application constants
pub mod constants;

/// `SQLite` persistence and repositories
pub mod database;

/// Error types re-exported from `larder_core`
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Engine services
pub mod services;

pub use larder_core::models;
