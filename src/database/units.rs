// ABOUTME: Database operations for the unit registry
// ABOUTME: Lookups by id, name and normalized symbol, plus seeding of canonical cooking units
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::units::SEED_UNITS;
use crate::errors::{DatabaseError, DatabaseResult};
use larder_core::models::{NewUnit, Unit, UnitId};
use larder_inventory::normalize_unit;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::{debug, info};

const ENTITY: &str = "unit";

/// Unit table manager
pub struct UnitManager {
    pool: SqlitePool,
}

impl UnitManager {
    /// Create a new unit manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all units ordered by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list(&self) -> DatabaseResult<Vec<Unit>> {
        let rows = sqlx::query("SELECT id, name, symbol, description FROM units ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx(ENTITY, "list units", e))?;

        rows.iter().map(row_to_unit).collect()
    }

    /// Get a unit by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get(&self, id: UnitId) -> DatabaseResult<Option<Unit>> {
        let row = sqlx::query("SELECT id, name, symbol, description FROM units WHERE id = ?")
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx(ENTITY, "get unit", e))?;

        row.as_ref().map(row_to_unit).transpose()
    }

    /// Find a unit by its human name (case-insensitive)
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn find_by_name(&self, name: &str) -> DatabaseResult<Option<Unit>> {
        let row = sqlx::query(
            "SELECT id, name, symbol, description FROM units WHERE name = ? COLLATE NOCASE",
        )
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_sqlx(ENTITY, "find unit by name", e))?;

        row.as_ref().map(row_to_unit).transpose()
    }

    /// Find a unit by symbol, comparing trimmed lowercase forms
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn find_by_symbol(&self, symbol: &str) -> DatabaseResult<Option<Unit>> {
        let row = sqlx::query(
            "SELECT id, name, symbol, description FROM units WHERE LOWER(TRIM(symbol)) = ?",
        )
        .bind(normalize_unit(symbol))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_sqlx(ENTITY, "find unit by symbol", e))?;

        row.as_ref().map(row_to_unit).transpose()
    }

    /// Insert a unit
    ///
    /// # Errors
    ///
    /// Returns `ConstraintViolation` if the symbol already exists
    pub async fn create(&self, unit: &NewUnit) -> DatabaseResult<UnitId> {
        let result = sqlx::query("INSERT INTO units (name, symbol, description) VALUES (?, ?, ?)")
            .bind(&unit.name)
            .bind(&unit.symbol)
            .bind(&unit.description)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx(ENTITY, "create unit", e))?;

        let id = UnitId(result.last_insert_rowid());
        debug!(unit_id = %id, symbol = %unit.symbol, "Unit created");
        Ok(id)
    }

    /// Number of units in the registry
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn count(&self) -> DatabaseResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM units")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx(ENTITY, "count units", e))
    }

    /// Insert the canonical cooking units when the table is empty
    ///
    /// Returns the number of units inserted (zero when already populated).
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails
    pub async fn seed_defaults(&self) -> DatabaseResult<usize> {
        if self.count().await? > 0 {
            return Ok(0);
        }

        for (name, symbol, description) in SEED_UNITS {
            self.create(&NewUnit {
                name: (*name).to_owned(),
                symbol: (*symbol).to_owned(),
                description: Some((*description).to_owned()),
            })
            .await?;
        }

        info!(count = SEED_UNITS.len(), "Seeded canonical units");
        Ok(SEED_UNITS.len())
    }
}

fn row_to_unit(row: &SqliteRow) -> DatabaseResult<Unit> {
    let decode = |e: sqlx::Error| DatabaseError::malformed(ENTITY, e.to_string());
    Ok(Unit {
        id: UnitId(row.try_get("id").map_err(decode)?),
        name: row.try_get("name").map_err(decode)?,
        symbol: row.try_get("symbol").map_err(decode)?,
        description: row.try_get("description").map_err(decode)?,
    })
}
