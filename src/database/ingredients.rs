// ABOUTME: Database operations for the ingredient catalog
// ABOUTME: CRUD with COALESCE partial updates; deletes leave stock and recipe references orphaned
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{format_timestamp, parse_timestamp};
use crate::errors::{DatabaseError, DatabaseResult};
use chrono::Utc;
use larder_core::models::{Ingredient, IngredientId, IngredientPatch, NewIngredient, UnitId};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::debug;

const ENTITY: &str = "ingredient";

const SELECT_COLUMNS: &str = r"
    SELECT id, name, category, unit_id, calories, protein, carbs, fat, image,
           created_at, updated_at
    FROM ingredients
";

/// Ingredient table manager
pub struct IngredientManager {
    pool: SqlitePool,
}

impl IngredientManager {
    /// Create a new ingredient manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List ingredients ordered by name
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list(&self) -> DatabaseResult<Vec<Ingredient>> {
        let rows = sqlx::query(&format!("{SELECT_COLUMNS} ORDER BY name COLLATE NOCASE ASC"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx(ENTITY, "list ingredients", e))?;

        rows.iter().map(row_to_ingredient).collect()
    }

    /// Get an ingredient by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get(&self, id: IngredientId) -> DatabaseResult<Option<Ingredient>> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx(ENTITY, "get ingredient", e))?;

        row.as_ref().map(row_to_ingredient).transpose()
    }

    /// Find an ingredient by exact name
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn find_by_name(&self, name: &str) -> DatabaseResult<Option<Ingredient>> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE name = ?"))
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx(ENTITY, "find ingredient by name", e))?;

        row.as_ref().map(row_to_ingredient).transpose()
    }

    /// Insert an ingredient
    ///
    /// # Errors
    ///
    /// Returns `ConstraintViolation` for a duplicate name or unknown unit
    pub async fn create(&self, ingredient: &NewIngredient) -> DatabaseResult<IngredientId> {
        let now = format_timestamp(Utc::now());
        let result = sqlx::query(
            r"
            INSERT INTO ingredients
                (name, category, unit_id, calories, protein, carbs, fat, image, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(ingredient.name.trim())
        .bind(ingredient.effective_category())
        .bind(ingredient.unit_id.map(UnitId::get))
        .bind(ingredient.calories)
        .bind(ingredient.protein)
        .bind(ingredient.carbs)
        .bind(ingredient.fat)
        .bind(&ingredient.image)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_sqlx(ENTITY, "create ingredient", e))?;

        let id = IngredientId(result.last_insert_rowid());
        debug!(ingredient_id = %id, name = %ingredient.name, "Ingredient created");
        Ok(id)
    }

    /// Apply a partial update; unspecified fields keep their value
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no ingredient has this id, `ConstraintViolation` on a duplicate name
    pub async fn update(&self, id: IngredientId, patch: &IngredientPatch) -> DatabaseResult<()> {
        let result = sqlx::query(
            r"
            UPDATE ingredients SET
                name = COALESCE(?, name),
                category = COALESCE(?, category),
                unit_id = COALESCE(?, unit_id),
                calories = COALESCE(?, calories),
                protein = COALESCE(?, protein),
                carbs = COALESCE(?, carbs),
                fat = COALESCE(?, fat),
                image = COALESCE(?, image),
                updated_at = ?
            WHERE id = ?
            ",
        )
        .bind(patch.name.as_deref().map(str::trim))
        .bind(&patch.category)
        .bind(patch.unit_id.map(UnitId::get))
        .bind(patch.calories)
        .bind(patch.protein)
        .bind(patch.carbs)
        .bind(patch.fat)
        .bind(&patch.image)
        .bind(format_timestamp(Utc::now()))
        .bind(id.get())
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_sqlx(ENTITY, "update ingredient", e))?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found(ENTITY, id));
        }
        debug!(ingredient_id = %id, "Ingredient updated");
        Ok(())
    }

    /// Delete an ingredient, returning whether a row was removed
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn delete(&self, id: IngredientId) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM ingredients WHERE id = ?")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx(ENTITY, "delete ingredient", e))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_ingredient(row: &SqliteRow) -> DatabaseResult<Ingredient> {
    let decode = |e: sqlx::Error| DatabaseError::malformed(ENTITY, e.to_string());
    let created_at: Option<String> = row.try_get("created_at").map_err(decode)?;
    let updated_at: Option<String> = row.try_get("updated_at").map_err(decode)?;
    let unit_id: Option<i64> = row.try_get("unit_id").map_err(decode)?;

    Ok(Ingredient {
        id: IngredientId(row.try_get("id").map_err(decode)?),
        name: row.try_get("name").map_err(decode)?,
        category: row.try_get("category").map_err(decode)?,
        unit_id: unit_id.map(UnitId),
        calories: row.try_get("calories").map_err(decode)?,
        protein: row.try_get("protein").map_err(decode)?,
        carbs: row.try_get("carbs").map_err(decode)?,
        fat: row.try_get("fat").map_err(decode)?,
        image: row.try_get("image").map_err(decode)?,
        created_at: parse_timestamp(created_at.as_deref()),
        updated_at: parse_timestamp(updated_at.as_deref()),
    })
}
