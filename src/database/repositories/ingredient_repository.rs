// ABOUTME: SQLite implementation of the ingredient catalog repository
// ABOUTME: Delegates to IngredientManager and logs failed writes before surfacing them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::IngredientRepository;
use crate::database::Database;
use crate::errors::DatabaseError;
use async_trait::async_trait;
use larder_core::models::{Ingredient, IngredientId, IngredientPatch, NewIngredient};
use tracing::{debug, error};

/// `SQLite` implementation of `IngredientRepository`
pub struct IngredientRepositoryImpl {
    db: Database,
}

impl IngredientRepositoryImpl {
    /// Create a new `IngredientRepository` with the given database connection
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IngredientRepository for IngredientRepositoryImpl {
    async fn list(&self) -> Result<Vec<Ingredient>, DatabaseError> {
        self.db.ingredients().list().await
    }

    async fn get_by_id(&self, id: IngredientId) -> Result<Option<Ingredient>, DatabaseError> {
        self.db.ingredients().get(id).await
    }

    async fn create(&self, ingredient: &NewIngredient) -> Result<IngredientId, DatabaseError> {
        debug!(name = %ingredient.name, "Creating ingredient");
        self.db
            .ingredients()
            .create(ingredient)
            .await
            .inspect_err(|e| error!(name = %ingredient.name, error = %e, "Ingredient create failed"))
    }

    async fn update(&self, id: IngredientId, patch: &IngredientPatch) -> Result<(), DatabaseError> {
        debug!(ingredient_id = %id, "Updating ingredient");
        self.db
            .ingredients()
            .update(id, patch)
            .await
            .inspect_err(|e| error!(ingredient_id = %id, error = %e, "Ingredient update failed"))
    }

    async fn delete(&self, id: IngredientId) -> Result<bool, DatabaseError> {
        let deleted = self
            .db
            .ingredients()
            .delete(id)
            .await
            .inspect_err(|e| error!(ingredient_id = %id, error = %e, "Ingredient delete failed"))?;
        if !deleted {
            debug!(ingredient_id = %id, "Ingredient already absent, nothing deleted");
        }
        Ok(deleted)
    }
}
