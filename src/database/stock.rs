// ABOUTME: Database operations for stock lots
// ABOUTME: Lot CRUD, ingredient-joined listing, orphan purge and transactional application of deductions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{format_date, format_timestamp, parse_date, parse_timestamp, skip_malformed};
use crate::errors::{DatabaseError, DatabaseResult};
use chrono::{Datelike, NaiveDate, Utc};
use larder_core::models::{
    IngredientId, NewStockLot, StockLot, StockLotId, StockLotPatch, StockLotWithDetails,
};
use larder_inventory::{days_after, DeductionReport};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::debug;

const ENTITY: &str = "stock lot";

const SELECT_LOTS: &str = r"
    SELECT s.id, s.ingredient_id, s.quantity, s.unit, s.expiry_date, s.added_date
    FROM ingredient_stock s
";

const SELECT_LOTS_WITH_DETAILS: &str = r"
    SELECT s.id, s.ingredient_id, s.quantity, s.unit, s.expiry_date, s.added_date,
           i.name AS ingredient_name, i.category AS ingredient_category
    FROM ingredient_stock s
    LEFT JOIN ingredients i ON i.id = s.ingredient_id
";

/// Stock table manager
pub struct StockManager {
    pool: SqlitePool,
}

impl StockManager {
    /// Create a new stock manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All lots ordered by expiry; malformed rows are skipped with a warning
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list(&self) -> DatabaseResult<Vec<StockLot>> {
        let rows = sqlx::query(&format!("{SELECT_LOTS} ORDER BY s.expiry_date ASC, s.id ASC"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx(ENTITY, "list stock", e))?;

        Ok(rows.iter().filter_map(skip_malformed(ENTITY, row_to_stock_lot)).collect())
    }

    /// All lots joined with ingredient name and category, orphans included
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_with_details(&self) -> DatabaseResult<Vec<StockLotWithDetails>> {
        let rows = sqlx::query(&format!(
            "{SELECT_LOTS_WITH_DETAILS} ORDER BY s.expiry_date ASC, s.id ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_sqlx(ENTITY, "list stock with details", e))?;

        Ok(rows
            .iter()
            .filter_map(skip_malformed(ENTITY, row_to_lot_with_details))
            .collect())
    }

    /// Lots expiring within `[today, today + days]`, earliest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_expiring_within(
        &self,
        today: NaiveDate,
        days: u32,
    ) -> DatabaseResult<Vec<StockLotWithDetails>> {
        let horizon = days_after(today, days);
        let rows = sqlx::query(&format!(
            "{SELECT_LOTS_WITH_DETAILS} WHERE s.expiry_date >= ? AND s.expiry_date <= ? \
             ORDER BY s.expiry_date ASC, s.id ASC"
        ))
        .bind(format_date(today))
        .bind(format_horizon(horizon))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_sqlx(ENTITY, "list expiring stock", e))?;

        Ok(rows
            .iter()
            .filter_map(skip_malformed(ENTITY, row_to_lot_with_details))
            .collect())
    }

    /// Get a lot by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is malformed
    pub async fn get(&self, id: StockLotId) -> DatabaseResult<Option<StockLot>> {
        let row = sqlx::query(&format!("{SELECT_LOTS} WHERE s.id = ?"))
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx(ENTITY, "get stock lot", e))?;

        row.as_ref().map(row_to_stock_lot).transpose()
    }

    /// Insert a lot
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn create(&self, lot: &NewStockLot) -> DatabaseResult<StockLotId> {
        let result = sqlx::query(
            r"
            INSERT INTO ingredient_stock (ingredient_id, quantity, unit, expiry_date, added_date)
            VALUES (?, ?, ?, ?, ?)
            ",
        )
        .bind(lot.ingredient_id.get())
        .bind(lot.quantity)
        .bind(lot.unit.trim())
        .bind(format_date(lot.expiry_date))
        .bind(format_timestamp(Utc::now()))
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_sqlx(ENTITY, "create stock lot", e))?;

        let id = StockLotId(result.last_insert_rowid());
        debug!(lot_id = %id, ingredient_id = %lot.ingredient_id, "Stock lot created");
        Ok(id)
    }

    /// Apply a partial update; unspecified fields keep their value
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no lot has this id
    pub async fn update(&self, id: StockLotId, patch: &StockLotPatch) -> DatabaseResult<()> {
        let result = sqlx::query(
            r"
            UPDATE ingredient_stock SET
                ingredient_id = COALESCE(?, ingredient_id),
                quantity = COALESCE(?, quantity),
                unit = COALESCE(?, unit),
                expiry_date = COALESCE(?, expiry_date)
            WHERE id = ?
            ",
        )
        .bind(patch.ingredient_id.map(IngredientId::get))
        .bind(patch.quantity)
        .bind(patch.unit.as_deref().map(str::trim))
        .bind(patch.expiry_date.map(format_date))
        .bind(id.get())
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_sqlx(ENTITY, "update stock lot", e))?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found(ENTITY, id));
        }
        debug!(lot_id = %id, "Stock lot updated");
        Ok(())
    }

    /// Delete a lot, returning whether a row was removed
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn delete(&self, id: StockLotId) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM ingredient_stock WHERE id = ?")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx(ENTITY, "delete stock lot", e))?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete lots whose ingredient no longer exists
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn delete_orphans(&self) -> DatabaseResult<u64> {
        let result = sqlx::query(
            "DELETE FROM ingredient_stock WHERE ingredient_id NOT IN (SELECT id FROM ingredients)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_sqlx(ENTITY, "purge orphaned stock", e))?;

        Ok(result.rows_affected())
    }

    /// Persist a deduction plan in one transaction
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails; nothing is written in that case
    pub async fn apply_deduction(&self, report: &DeductionReport) -> DatabaseResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DatabaseError::from_sqlx(ENTITY, "begin deduction", e))?;

        for update in &report.updated {
            sqlx::query("UPDATE ingredient_stock SET quantity = ? WHERE id = ?")
                .bind(update.remaining)
                .bind(update.lot_id.get())
                .execute(&mut *tx)
                .await
                .map_err(|e| DatabaseError::from_sqlx(ENTITY, "deduct from stock lot", e))?;
        }

        for lot_id in &report.deleted {
            sqlx::query("DELETE FROM ingredient_stock WHERE id = ?")
                .bind(lot_id.get())
                .execute(&mut *tx)
                .await
                .map_err(|e| DatabaseError::from_sqlx(ENTITY, "delete consumed stock lot", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| DatabaseError::from_sqlx(ENTITY, "commit deduction", e))?;

        debug!(
            updated = report.updated.len(),
            deleted = report.deleted.len(),
            "Deduction persisted"
        );
        Ok(())
    }
}

/// Wrap a row decoder so malformed rows are logged and skipped
/// Upper bound for an expiry window as stored text
///
/// Stored dates have four-digit years; a later horizon is capped so the
/// string comparison still covers every stored date.
fn format_horizon(horizon: NaiveDate) -> String {
    if horizon.year() > 9999 {
        "9999-12-31".to_owned()
    } else {
        format_date(horizon)
    }
}

fn row_to_stock_lot(row: &SqliteRow) -> DatabaseResult<StockLot> {
    let decode = |e: sqlx::Error| DatabaseError::malformed(ENTITY, e.to_string());
    let expiry: String = row.try_get("expiry_date").map_err(decode)?;
    let added: Option<String> = row.try_get("added_date").map_err(decode)?;

    Ok(StockLot {
        id: StockLotId(row.try_get("id").map_err(decode)?),
        ingredient_id: IngredientId(row.try_get("ingredient_id").map_err(decode)?),
        quantity: row.try_get("quantity").map_err(decode)?,
        unit: row.try_get("unit").map_err(decode)?,
        expiry_date: parse_date(ENTITY, &expiry)?,
        added_date: parse_timestamp(added.as_deref()),
    })
}

fn row_to_lot_with_details(row: &SqliteRow) -> DatabaseResult<StockLotWithDetails> {
    let decode = |e: sqlx::Error| DatabaseError::malformed(ENTITY, e.to_string());
    Ok(StockLotWithDetails {
        lot: row_to_stock_lot(row)?,
        ingredient_name: row.try_get("ingredient_name").map_err(decode)?,
        ingredient_category: row.try_get("ingredient_category").map_err(decode)?,
    })
}
