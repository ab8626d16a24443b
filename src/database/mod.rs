// ABOUTME: SQLite persistence for units, ingredients, stock lots, recipes and the shopping list
// ABOUTME: Connection setup, idempotent schema migrations, unit seeding and shared row helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Database Management
//!
//! One [`Database`] handle wraps a `SQLite` pool. Table-specific managers
//! (`UnitManager`, `StockManager`, ...) borrow the pool and return
//! [`DatabaseError`] so callers can tell missing rows, constraint violations
//! and a closed store apart.

/// Unit registry table
pub mod units;
/// Ingredient catalog table
pub mod ingredients;
/// Stock lot table
pub mod stock;
/// Recipe, requirement and step tables
pub mod recipes;
/// Shopping list table
pub mod shopping_list;
/// Demo dataset
pub mod demo_data;
/// Repository traits and their `SQLite` implementations
pub mod repositories;

pub use ingredients::IngredientManager;
pub use recipes::RecipeManager;
pub use shopping_list::{BulkInsertFailure, BulkInsertReport, ShoppingListManager};
pub use stock::StockManager;
pub use units::UnitManager;

use crate::config::DatabaseUrl;
use crate::errors::{DatabaseError, DatabaseResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Sqlite, SqlitePool};
use tracing::{debug, error, info, warn};

/// Database handle shared by every repository
#[derive(Clone, Debug)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Connect, run migrations and seed the canonical units
    ///
    /// File URLs get `mode=rwc` so the database file is created when missing.
    /// In-memory URLs use a single long-lived connection so every query sees
    /// the same database.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be opened or a migration fails
    pub async fn new(database_url: &str) -> DatabaseResult<Self> {
        let is_memory = database_url.contains(":memory:");
        let needs_create_mode =
            database_url.starts_with("sqlite:") && !is_memory && !database_url.contains('?');
        let connection_options = if needs_create_mode {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };

        let mut options = SqlitePoolOptions::new();
        if is_memory {
            options = options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = options
            .connect(&connection_options)
            .await
            .map_err(|e| {
                error!(database_url, error = %e, "Failed to open database");
                DatabaseError::from_sqlx("database", "connect", e)
            })?;

        let db = Self { pool };
        db.migrate().await?;
        UnitManager::new(db.pool.clone()).seed_defaults().await?;

        info!(database_url, "Database ready");
        Ok(db)
    }

    /// Connect using a typed configuration value
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be opened or a migration fails
    pub async fn from_config(url: &DatabaseUrl) -> DatabaseResult<Self> {
        if let DatabaseUrl::SQLite { path } = url {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| DatabaseError::QueryError {
                    context: format!("create database directory {}: {e}", parent.display()),
                })?;
            }
        }
        Self::new(&url.to_connection_string()).await
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Close every connection; later operations fail with `NotInitialized`
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database closed");
    }

    /// Whether [`Database::close`] has been called
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    /// Unit table manager
    #[must_use]
    pub fn units(&self) -> UnitManager {
        UnitManager::new(self.pool.clone())
    }

    /// Ingredient table manager
    #[must_use]
    pub fn ingredients(&self) -> IngredientManager {
        IngredientManager::new(self.pool.clone())
    }

    /// Stock table manager
    #[must_use]
    pub fn stock(&self) -> StockManager {
        StockManager::new(self.pool.clone())
    }

    /// Recipe tables manager
    #[must_use]
    pub fn recipes(&self) -> RecipeManager {
        RecipeManager::new(self.pool.clone())
    }

    /// Shopping list table manager
    #[must_use]
    pub fn shopping_list(&self) -> ShoppingListManager {
        ShoppingListManager::new(self.pool.clone())
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns `MigrationError` if any statement fails
    pub async fn migrate(&self) -> DatabaseResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    error!(error = %e, "Migration statement failed");
                    DatabaseError::MigrationError {
                        context: format!("{e}: {}", statement.trim()),
                    }
                })?;
        }
        debug!(statements = SCHEMA.len(), "Database migrations applied");
        Ok(())
    }

    /// Delete every row from every table except `units`
    ///
    /// # Errors
    ///
    /// Returns an error if a delete fails
    pub async fn clear_all_data(&self) -> DatabaseResult<()> {
        for table in [
            "shopping_list",
            "ingredient_stock",
            "recipe_steps",
            "recipe_ingredients",
            "recipes",
            "ingredients",
        ] {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&self.pool)
                .await
                .map_err(|e| DatabaseError::from_sqlx("database", "clear tables", e))?;
        }
        info!("All pantry data cleared");
        Ok(())
    }
}

/// Schema statements, applied in order on every start
///
/// References to `ingredients` deliberately carry no foreign key: deleting an
/// ingredient leaves orphaned lots, requirements and shopping rows behind.
const SCHEMA: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS units (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        symbol TEXT NOT NULL UNIQUE,
        description TEXT
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS ingredients (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        category TEXT NOT NULL DEFAULT 'Other',
        unit_id INTEGER REFERENCES units(id),
        calories REAL,
        protein REAL,
        carbs REAL,
        fat REAL,
        image TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS recipes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        description TEXT,
        category TEXT,
        difficulty INTEGER CHECK (difficulty IS NULL OR difficulty BETWEEN 1 AND 5),
        prep_time INTEGER,
        cook_time INTEGER,
        servings INTEGER,
        image TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS recipe_ingredients (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
        ingredient_id INTEGER NOT NULL,
        quantity REAL NOT NULL,
        unit TEXT NOT NULL,
        position INTEGER NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS recipe_steps (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
        position INTEGER NOT NULL,
        description TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS ingredient_stock (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        ingredient_id INTEGER NOT NULL,
        quantity REAL NOT NULL,
        unit TEXT NOT NULL,
        expiry_date TEXT NOT NULL,
        added_date TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS shopping_list (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        ingredient_id INTEGER NOT NULL,
        quantity_needed REAL NOT NULL,
        unit TEXT NOT NULL,
        source_recipe_id INTEGER,
        source_recipe_name TEXT,
        created_at TEXT NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_stock_ingredient ON ingredient_stock(ingredient_id)",
    "CREATE INDEX IF NOT EXISTS idx_stock_expiry ON ingredient_stock(expiry_date)",
    "CREATE INDEX IF NOT EXISTS idx_recipe_ingredients_recipe ON recipe_ingredients(recipe_id)",
    "CREATE INDEX IF NOT EXISTS idx_recipe_steps_recipe ON recipe_steps(recipe_id)",
    "CREATE INDEX IF NOT EXISTS idx_shopping_list_recipe ON shopping_list(source_recipe_id)",
];

// ============================================================================
// Row helpers shared by the table managers
// ============================================================================

/// Wrap a row decoder so a malformed row is logged and dropped from a listing
pub(crate) fn skip_malformed<T>(
    entity: &'static str,
    decode: fn(&SqliteRow) -> DatabaseResult<T>,
) -> impl Fn(&SqliteRow) -> Option<T> {
    move |row| match decode(row) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(entity, error = %e, "Skipping malformed row");
            None
        }
    }
}

/// Calendar dates are stored as `YYYY-MM-DD`
pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a stored calendar date, tolerating a trailing time component
pub(crate) fn parse_date(entity: &'static str, raw: &str) -> DatabaseResult<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|e| DatabaseError::malformed(entity, format!("invalid date '{raw}': {e}")))
}

/// Timestamps are stored as RFC 3339
pub(crate) fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339()
}

/// Parse a stored timestamp (RFC 3339 or `SQLite`'s `YYYY-MM-DD HH:MM:SS`)
pub(crate) fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

/// Convert an optional `u32` column value for binding
pub(crate) fn opt_u32_to_i64(value: Option<u32>) -> Option<i64> {
    value.map(i64::from)
}

/// Convert an optional integer column into `u32`, dropping out-of-range values
pub(crate) fn opt_i64_to_u32(value: Option<i64>) -> Option<u32> {
    value.and_then(|v| u32::try_from(v).ok())
}
