// ABOUTME: SQLite implementation of the recipe repository
// ABOUTME: Delegates to RecipeManager and logs failed writes before surfacing them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::RecipeRepository;
use crate::database::Database;
use crate::errors::DatabaseError;
use async_trait::async_trait;
use larder_core::models::{NewRecipe, Recipe, RecipeId, RecipePatch};
use tracing::{debug, error};

/// `SQLite` implementation of `RecipeRepository`
pub struct RecipeRepositoryImpl {
    db: Database,
}

impl RecipeRepositoryImpl {
    /// Create a new `RecipeRepository` with the given database connection
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecipeRepository for RecipeRepositoryImpl {
    async fn list(&self) -> Result<Vec<Recipe>, DatabaseError> {
        self.db.recipes().list().await
    }

    async fn get_by_id(&self, id: RecipeId) -> Result<Option<Recipe>, DatabaseError> {
        self.db.recipes().get(id).await
    }

    async fn create(&self, recipe: &NewRecipe) -> Result<RecipeId, DatabaseError> {
        debug!(name = %recipe.name, "Creating recipe");
        self.db
            .recipes()
            .create(recipe)
            .await
            .inspect_err(|e| error!(name = %recipe.name, error = %e, "Recipe create failed"))
    }

    async fn update(&self, id: RecipeId, patch: &RecipePatch) -> Result<(), DatabaseError> {
        debug!(recipe_id = %id, "Updating recipe");
        self.db
            .recipes()
            .update(id, patch)
            .await
            .inspect_err(|e| error!(recipe_id = %id, error = %e, "Recipe update failed"))
    }

    async fn delete(&self, id: RecipeId) -> Result<bool, DatabaseError> {
        let deleted = self
            .db
            .recipes()
            .delete(id)
            .await
            .inspect_err(|e| error!(recipe_id = %id, error = %e, "Recipe delete failed"))?;
        if !deleted {
            debug!(recipe_id = %id, "Recipe already absent, nothing deleted");
        }
        Ok(deleted)
    }
}
