// ABOUTME: Database operations for the shopping list
// ABOUTME: Row CRUD, sequential bulk inserts with per-item failure reporting, and scoped deletes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{format_timestamp, parse_timestamp, skip_malformed};
use crate::errors::{DatabaseError, DatabaseResult};
use chrono::Utc;
use larder_core::models::{
    IngredientId, NewShoppingListItem, RecipeId, ShoppingItemId, ShoppingListItem,
    ShoppingListItemPatch, ShoppingListItemWithDetails,
};
use serde::Serialize;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::{debug, warn};

const ENTITY: &str = "shopping list item";

const SELECT_ITEMS: &str = r"
    SELECT l.id, l.ingredient_id, l.quantity_needed, l.unit, l.source_recipe_id,
           l.source_recipe_name, l.created_at
    FROM shopping_list l
";

const SELECT_ITEMS_WITH_DETAILS: &str = r"
    SELECT l.id, l.ingredient_id, l.quantity_needed, l.unit, l.source_recipe_id,
           l.source_recipe_name, l.created_at,
           i.name AS ingredient_name, i.category AS ingredient_category
    FROM shopping_list l
    LEFT JOIN ingredients i ON i.id = l.ingredient_id
";

/// An item of a bulk insert that the store rejected
#[derive(Debug, Clone, Serialize)]
pub struct BulkInsertFailure {
    /// Position of the item in the submitted batch
    pub index: usize,
    /// The rejected item
    pub item: NewShoppingListItem,
    /// Store error message
    pub error: String,
}

/// Outcome of a sequential bulk insert
#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkInsertReport {
    /// Ids of the rows written, in submission order
    pub inserted: Vec<ShoppingItemId>,
    /// Items that could not be written
    pub failed: Vec<BulkInsertFailure>,
}

impl BulkInsertReport {
    /// Whether every item was written
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Shopping list table manager
pub struct ShoppingListManager {
    pool: SqlitePool,
}

impl ShoppingListManager {
    /// Create a new shopping list manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All rows, oldest first; rows that fail to decode are logged and skipped
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list(&self) -> DatabaseResult<Vec<ShoppingListItem>> {
        let rows = sqlx::query(&format!("{SELECT_ITEMS} ORDER BY l.created_at ASC, l.id ASC"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx(ENTITY, "list shopping list", e))?;

        Ok(rows.iter().filter_map(skip_malformed(ENTITY, row_to_item)).collect())
    }

    /// Rows joined with ingredient name and category
    ///
    /// `in_stock` is left at zero; the reconciler fills it from the stock snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_with_details(&self) -> DatabaseResult<Vec<ShoppingListItemWithDetails>> {
        let rows = sqlx::query(&format!(
            "{SELECT_ITEMS_WITH_DETAILS} ORDER BY l.created_at ASC, l.id ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_sqlx(ENTITY, "list shopping list with details", e))?;

        Ok(rows
            .iter()
            .filter_map(skip_malformed(ENTITY, row_to_item_with_details))
            .collect())
    }

    /// Get a row by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get(&self, id: ShoppingItemId) -> DatabaseResult<Option<ShoppingListItem>> {
        let row = sqlx::query(&format!("{SELECT_ITEMS} WHERE l.id = ?"))
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx(ENTITY, "get shopping list item", e))?;

        row.as_ref().map(row_to_item).transpose()
    }

    /// Insert a row
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn create(&self, item: &NewShoppingListItem) -> DatabaseResult<ShoppingItemId> {
        let result = sqlx::query(
            r"
            INSERT INTO shopping_list
                (ingredient_id, quantity_needed, unit, source_recipe_id, source_recipe_name, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(item.ingredient_id.get())
        .bind(item.quantity_needed)
        .bind(item.unit.trim())
        .bind(item.source_recipe_id.map(RecipeId::get))
        .bind(&item.source_recipe_name)
        .bind(format_timestamp(Utc::now()))
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_sqlx(ENTITY, "create shopping list item", e))?;

        let id = ShoppingItemId(result.last_insert_rowid());
        debug!(item_id = %id, ingredient_id = %item.ingredient_id, "Shopping list item created");
        Ok(id)
    }

    /// Insert rows one by one; a failed row is reported and the rest still go in
    pub async fn create_bulk(&self, items: &[NewShoppingListItem]) -> BulkInsertReport {
        let mut report = BulkInsertReport::default();
        for (index, item) in items.iter().enumerate() {
            match self.create(item).await {
                Ok(id) => report.inserted.push(id),
                Err(e) => {
                    warn!(index, ingredient_id = %item.ingredient_id, error = %e, "Shopping list insert failed");
                    report.failed.push(BulkInsertFailure {
                        index,
                        item: item.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }
        report
    }

    /// Apply a partial update; unspecified fields keep their value
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no row has this id
    pub async fn update(
        &self,
        id: ShoppingItemId,
        patch: &ShoppingListItemPatch,
    ) -> DatabaseResult<()> {
        let result = sqlx::query(
            r"
            UPDATE shopping_list SET
                quantity_needed = COALESCE(?, quantity_needed),
                unit = COALESCE(?, unit)
            WHERE id = ?
            ",
        )
        .bind(patch.quantity_needed)
        .bind(patch.unit.as_deref().map(str::trim))
        .bind(id.get())
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_sqlx(ENTITY, "update shopping list item", e))?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found(ENTITY, id));
        }
        debug!(item_id = %id, "Shopping list item updated");
        Ok(())
    }

    /// Delete a row, returning whether it existed
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn delete(&self, id: ShoppingItemId) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM shopping_list WHERE id = ?")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx(ENTITY, "delete shopping list item", e))?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete every row for an ingredient, returning the number removed
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn delete_by_ingredient(&self, ingredient_id: IngredientId) -> DatabaseResult<u64> {
        let result = sqlx::query("DELETE FROM shopping_list WHERE ingredient_id = ?")
            .bind(ingredient_id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx(ENTITY, "delete shopping list by ingredient", e))?;

        Ok(result.rows_affected())
    }

    /// Delete every row produced by a recipe, returning the number removed
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn delete_by_source_recipe(&self, recipe_id: RecipeId) -> DatabaseResult<u64> {
        let result = sqlx::query("DELETE FROM shopping_list WHERE source_recipe_id = ?")
            .bind(recipe_id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx(ENTITY, "delete shopping list by recipe", e))?;

        Ok(result.rows_affected())
    }

    /// Delete every row, returning the number removed
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn clear(&self) -> DatabaseResult<u64> {
        let result = sqlx::query("DELETE FROM shopping_list")
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx(ENTITY, "clear shopping list", e))?;

        Ok(result.rows_affected())
    }
}

fn row_to_item_with_details(row: &SqliteRow) -> DatabaseResult<ShoppingListItemWithDetails> {
    let decode = |e: sqlx::Error| DatabaseError::malformed(ENTITY, e.to_string());
    Ok(ShoppingListItemWithDetails {
        item: row_to_item(row)?,
        ingredient_name: row.try_get("ingredient_name").map_err(decode)?,
        ingredient_category: row.try_get("ingredient_category").map_err(decode)?,
        in_stock: 0.0,
    })
}

fn row_to_item(row: &SqliteRow) -> DatabaseResult<ShoppingListItem> {
    let decode = |e: sqlx::Error| DatabaseError::malformed(ENTITY, e.to_string());
    let source_recipe_id: Option<i64> = row.try_get("source_recipe_id").map_err(decode)?;
    let created_at: Option<String> = row.try_get("created_at").map_err(decode)?;

    Ok(ShoppingListItem {
        id: ShoppingItemId(row.try_get("id").map_err(decode)?),
        ingredient_id: IngredientId(row.try_get("ingredient_id").map_err(decode)?),
        quantity_needed: row.try_get("quantity_needed").map_err(decode)?,
        unit: row.try_get("unit").map_err(decode)?,
        source_recipe_id: source_recipe_id.map(RecipeId),
        source_recipe_name: row.try_get("source_recipe_name").map_err(decode)?,
        created_at: parse_timestamp(created_at.as_deref()),
    })
}
