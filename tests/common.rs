// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory databases, a pantry on a fixed clock and catalog fixtures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `larder`
//!
//! This module provides common test setup functions to reduce duplication
//! across integration tests.

use anyhow::Result;
use chrono::{Duration, NaiveDate};
use larder::clock::FixedClock;
use larder::config::EngineSettings;
use larder::database::Database;
use larder::models::{IngredientId, NewIngredient, NewRecipe, NewStockLot, RecipeId, RecipeRequirement, StockLotId};
use larder::services::Pantry;
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // TEST_LOG controls the level; quiet by default
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Day every test pantry starts on
pub fn test_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 30).unwrap()
}

/// `test_today()` shifted by `days`
pub fn day(days: i64) -> NaiveDate {
    test_today() + Duration::days(days)
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    Ok(Database::new("sqlite::memory:").await?)
}

/// Test pantry and the clock driving it
pub struct TestPantry {
    pub pantry: Pantry,
    pub clock: Arc<FixedClock>,
}

/// Pantry over a fresh in-memory database, pinned to `test_today()`
pub async fn create_test_pantry() -> Result<TestPantry> {
    let database = create_test_database().await?;
    let clock = Arc::new(FixedClock::new(test_today()));
    let pantry = Pantry::new(database, EngineSettings::default(), clock.clone()).await?;
    Ok(TestPantry { pantry, clock })
}

/// Add an ingredient with the default category
pub async fn add_ingredient(pantry: &Pantry, name: &str) -> Result<IngredientId> {
    Ok(pantry
        .ingredients()
        .create(&NewIngredient::named(name, "Other"))
        .await?)
}

/// Put a lot into stock expiring `expires_in` days from `test_today()`
pub async fn add_lot(
    pantry: &Pantry,
    ingredient_id: IngredientId,
    quantity: f64,
    unit: &str,
    expires_in: i64,
) -> Result<StockLotId> {
    Ok(pantry
        .stock()
        .add_lot(&NewStockLot {
            ingredient_id,
            quantity,
            unit: unit.to_owned(),
            expiry_date: day(expires_in),
        })
        .await?)
}

/// Store a recipe with the given requirements and a single step
pub async fn add_recipe(
    pantry: &Pantry,
    name: &str,
    requirements: Vec<RecipeRequirement>,
) -> Result<RecipeId> {
    Ok(pantry
        .recipes()
        .create(&NewRecipe {
            name: name.to_owned(),
            steps: vec!["Cook everything".to_owned()],
            requirements,
            ..NewRecipe::default()
        })
        .await?)
}

/// Approximate float equality for quantities
pub fn assert_quantity(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
