// ABOUTME: Database operations for recipes with their ordered steps and ingredient requirements
// ABOUTME: Create and update run in one transaction so a recipe is never stored half-written
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{format_timestamp, opt_i64_to_u32, opt_u32_to_i64, parse_timestamp};
use crate::errors::{DatabaseError, DatabaseResult};
use chrono::Utc;
use larder_core::models::{
    Difficulty, IngredientId, NewRecipe, Recipe, RecipeId, RecipePatch, RecipeRequirement,
};
use sqlx::{sqlite::SqliteRow, Row, Sqlite, SqlitePool, Transaction};
use std::collections::HashMap;
use tracing::{debug, warn};

const ENTITY: &str = "recipe";

const SELECT_RECIPES: &str = r"
    SELECT id, name, description, category, difficulty, prep_time, cook_time, servings, image,
           created_at, updated_at
    FROM recipes
";

/// Recipe tables manager
pub struct RecipeManager {
    pool: SqlitePool,
}

impl RecipeManager {
    /// Create a new recipe manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All recipes, newest first, with steps and requirements attached
    ///
    /// A malformed row fails the whole read: a recipe missing one requirement
    /// would look easier to make than it is.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails or a row cannot be decoded
    pub async fn list(&self) -> DatabaseResult<Vec<Recipe>> {
        let rows = sqlx::query(&format!("{SELECT_RECIPES} ORDER BY id DESC"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx(ENTITY, "list recipes", e))?;

        let mut steps = self.steps_by_recipe(None).await?;
        let mut requirements = self.requirements_by_recipe(None).await?;

        rows.iter()
            .map(|row| {
                let mut recipe = row_to_recipe(row)?;
                recipe.steps = steps.remove(&recipe.id).unwrap_or_default();
                recipe.requirements = requirements.remove(&recipe.id).unwrap_or_default();
                Ok(recipe)
            })
            .collect()
    }

    /// Get a recipe by id with its steps and requirements
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails
    pub async fn get(&self, id: RecipeId) -> DatabaseResult<Option<Recipe>> {
        let row = sqlx::query(&format!("{SELECT_RECIPES} WHERE id = ?"))
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx(ENTITY, "get recipe", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut recipe = row_to_recipe(&row)?;
        recipe.steps = self
            .steps_by_recipe(Some(id))
            .await?
            .remove(&id)
            .unwrap_or_default();
        recipe.requirements = self
            .requirements_by_recipe(Some(id))
            .await?
            .remove(&id)
            .unwrap_or_default();
        Ok(Some(recipe))
    }

    /// Insert a recipe with its steps and requirements
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails; nothing is written in that case
    pub async fn create(&self, recipe: &NewRecipe) -> DatabaseResult<RecipeId> {
        let mut tx = self.begin("begin recipe create").await?;
        let now = format_timestamp(Utc::now());

        let result = sqlx::query(
            r"
            INSERT INTO recipes
                (name, description, category, difficulty, prep_time, cook_time, servings, image,
                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(recipe.name.trim())
        .bind(&recipe.description)
        .bind(&recipe.category)
        .bind(recipe.difficulty.map(Difficulty::level))
        .bind(opt_u32_to_i64(recipe.prep_time_minutes))
        .bind(opt_u32_to_i64(recipe.cook_time_minutes))
        .bind(opt_u32_to_i64(recipe.servings))
        .bind(&recipe.image)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await
        .map_err(|e| DatabaseError::from_sqlx(ENTITY, "create recipe", e))?;

        let id = RecipeId(result.last_insert_rowid());
        insert_steps(&mut tx, id, &recipe.steps).await?;
        insert_requirements(&mut tx, id, &recipe.requirements).await?;

        tx.commit()
            .await
            .map_err(|e| DatabaseError::from_sqlx(ENTITY, "commit recipe create", e))?;

        debug!(
            recipe_id = %id,
            steps = recipe.steps.len(),
            requirements = recipe.requirements.len(),
            "Recipe created"
        );
        Ok(id)
    }

    /// Apply a partial update; present step or requirement lists replace the stored ones
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no recipe has this id
    pub async fn update(&self, id: RecipeId, patch: &RecipePatch) -> DatabaseResult<()> {
        let mut tx = self.begin("begin recipe update").await?;

        let result = sqlx::query(
            r"
            UPDATE recipes SET
                name = COALESCE(?, name),
                description = COALESCE(?, description),
                category = COALESCE(?, category),
                difficulty = COALESCE(?, difficulty),
                prep_time = COALESCE(?, prep_time),
                cook_time = COALESCE(?, cook_time),
                servings = COALESCE(?, servings),
                image = COALESCE(?, image),
                updated_at = ?
            WHERE id = ?
            ",
        )
        .bind(patch.name.as_deref().map(str::trim))
        .bind(&patch.description)
        .bind(&patch.category)
        .bind(patch.difficulty.map(Difficulty::level))
        .bind(opt_u32_to_i64(patch.prep_time_minutes))
        .bind(opt_u32_to_i64(patch.cook_time_minutes))
        .bind(opt_u32_to_i64(patch.servings))
        .bind(&patch.image)
        .bind(format_timestamp(Utc::now()))
        .bind(id.get())
        .execute(&mut *tx)
        .await
        .map_err(|e| DatabaseError::from_sqlx(ENTITY, "update recipe", e))?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found(ENTITY, id));
        }

        if let Some(steps) = &patch.steps {
            sqlx::query("DELETE FROM recipe_steps WHERE recipe_id = ?")
                .bind(id.get())
                .execute(&mut *tx)
                .await
                .map_err(|e| DatabaseError::from_sqlx(ENTITY, "replace recipe steps", e))?;
            insert_steps(&mut tx, id, steps).await?;
        }

        if let Some(requirements) = &patch.requirements {
            sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = ?")
                .bind(id.get())
                .execute(&mut *tx)
                .await
                .map_err(|e| DatabaseError::from_sqlx(ENTITY, "replace recipe requirements", e))?;
            insert_requirements(&mut tx, id, requirements).await?;
        }

        tx.commit()
            .await
            .map_err(|e| DatabaseError::from_sqlx(ENTITY, "commit recipe update", e))?;

        debug!(recipe_id = %id, "Recipe updated");
        Ok(())
    }

    /// Delete a recipe with its steps and requirements
    ///
    /// Shopping rows that name this recipe as their source are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if a delete fails
    pub async fn delete(&self, id: RecipeId) -> DatabaseResult<bool> {
        let mut tx = self.begin("begin recipe delete").await?;

        for (table, operation) in [
            ("recipe_steps", "delete recipe steps"),
            ("recipe_ingredients", "delete recipe requirements"),
        ] {
            sqlx::query(&format!("DELETE FROM {table} WHERE recipe_id = ?"))
                .bind(id.get())
                .execute(&mut *tx)
                .await
                .map_err(|e| DatabaseError::from_sqlx(ENTITY, operation, e))?;
        }

        let result = sqlx::query("DELETE FROM recipes WHERE id = ?")
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(|e| DatabaseError::from_sqlx(ENTITY, "delete recipe", e))?;

        tx.commit()
            .await
            .map_err(|e| DatabaseError::from_sqlx(ENTITY, "commit recipe delete", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn begin(&self, operation: &str) -> DatabaseResult<Transaction<'static, Sqlite>> {
        self.pool
            .begin()
            .await
            .map_err(|e| DatabaseError::from_sqlx(ENTITY, operation, e))
    }

    async fn steps_by_recipe(
        &self,
        recipe: Option<RecipeId>,
    ) -> DatabaseResult<HashMap<RecipeId, Vec<String>>> {
        let rows = sqlx::query(
            r"
            SELECT recipe_id, description FROM recipe_steps
            WHERE ? IS NULL OR recipe_id = ?
            ORDER BY recipe_id, position, id
            ",
        )
        .bind(recipe.map(RecipeId::get))
        .bind(recipe.map(RecipeId::get))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_sqlx(ENTITY, "load recipe steps", e))?;

        let mut grouped: HashMap<RecipeId, Vec<String>> = HashMap::new();
        for row in &rows {
            let decode = |e: sqlx::Error| DatabaseError::malformed(ENTITY, e.to_string());
            let recipe_id = RecipeId(row.try_get("recipe_id").map_err(decode)?);
            let description: String = row.try_get("description").map_err(decode)?;
            grouped.entry(recipe_id).or_default().push(description);
        }
        Ok(grouped)
    }

    async fn requirements_by_recipe(
        &self,
        recipe: Option<RecipeId>,
    ) -> DatabaseResult<HashMap<RecipeId, Vec<RecipeRequirement>>> {
        let rows = sqlx::query(
            r"
            SELECT recipe_id, ingredient_id, quantity, unit FROM recipe_ingredients
            WHERE ? IS NULL OR recipe_id = ?
            ORDER BY recipe_id, position, id
            ",
        )
        .bind(recipe.map(RecipeId::get))
        .bind(recipe.map(RecipeId::get))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_sqlx(ENTITY, "load recipe requirements", e))?;

        let mut grouped: HashMap<RecipeId, Vec<RecipeRequirement>> = HashMap::new();
        for row in &rows {
            let decode = |e: sqlx::Error| DatabaseError::malformed(ENTITY, e.to_string());
            let recipe_id = RecipeId(row.try_get("recipe_id").map_err(decode)?);
            let requirement = RecipeRequirement {
                ingredient_id: IngredientId(row.try_get("ingredient_id").map_err(decode)?),
                quantity: row.try_get("quantity").map_err(decode)?,
                unit: row.try_get("unit").map_err(decode)?,
            };
            grouped.entry(recipe_id).or_default().push(requirement);
        }
        Ok(grouped)
    }
}

async fn insert_steps(
    tx: &mut Transaction<'static, Sqlite>,
    recipe_id: RecipeId,
    steps: &[String],
) -> DatabaseResult<()> {
    for (position, description) in steps.iter().enumerate() {
        sqlx::query("INSERT INTO recipe_steps (recipe_id, position, description) VALUES (?, ?, ?)")
            .bind(recipe_id.get())
            .bind(position as i64)
            .bind(description)
            .execute(&mut **tx)
            .await
            .map_err(|e| DatabaseError::from_sqlx(ENTITY, "insert recipe step", e))?;
    }
    Ok(())
}

async fn insert_requirements(
    tx: &mut Transaction<'static, Sqlite>,
    recipe_id: RecipeId,
    requirements: &[RecipeRequirement],
) -> DatabaseResult<()> {
    for (position, requirement) in requirements.iter().enumerate() {
        sqlx::query(
            r"
            INSERT INTO recipe_ingredients (recipe_id, ingredient_id, quantity, unit, position)
            VALUES (?, ?, ?, ?, ?)
            ",
        )
        .bind(recipe_id.get())
        .bind(requirement.ingredient_id.get())
        .bind(requirement.quantity)
        .bind(requirement.unit.trim())
        .bind(position as i64)
        .execute(&mut **tx)
        .await
        .map_err(|e| DatabaseError::from_sqlx(ENTITY, "insert recipe requirement", e))?;
    }
    Ok(())
}

fn row_to_recipe(row: &SqliteRow) -> DatabaseResult<Recipe> {
    let decode = |e: sqlx::Error| DatabaseError::malformed(ENTITY, e.to_string());
    let id = RecipeId(row.try_get("id").map_err(decode)?);
    let difficulty: Option<i64> = row.try_get("difficulty").map_err(decode)?;
    let created_at: Option<String> = row.try_get("created_at").map_err(decode)?;
    let updated_at: Option<String> = row.try_get("updated_at").map_err(decode)?;

    let difficulty = difficulty.and_then(|level| {
        let parsed = Difficulty::from_level(level);
        if parsed.is_none() {
            warn!(recipe_id = %id, level, "Ignoring out-of-range recipe difficulty");
        }
        parsed
    });

    Ok(Recipe {
        id,
        name: row.try_get("name").map_err(decode)?,
        description: row.try_get("description").map_err(decode)?,
        category: row.try_get("category").map_err(decode)?,
        difficulty,
        prep_time_minutes: opt_i64_to_u32(row.try_get("prep_time").map_err(decode)?),
        cook_time_minutes: opt_i64_to_u32(row.try_get("cook_time").map_err(decode)?),
        servings: opt_i64_to_u32(row.try_get("servings").map_err(decode)?),
        image: row.try_get("image").map_err(decode)?,
        steps: Vec::new(),
        requirements: Vec::new(),
        created_at: parse_timestamp(created_at.as_deref()),
        updated_at: parse_timestamp(updated_at.as_deref()),
    })
}
