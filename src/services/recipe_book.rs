// ABOUTME: Recipe storage service with validation of requirements and free-text search
// ABOUTME: Requirements keep their order and may repeat an ingredient
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use crate::database::repositories::RecipeRepository;
use crate::errors::{AppError, AppResult};
use larder_core::models::{NewRecipe, Recipe, RecipeId, RecipePatch, RecipeRequirement};
use tracing::info;

/// Recipes with their steps and requirements
pub struct RecipeBook {
    repository: Arc<dyn RecipeRepository>,
}

impl RecipeBook {
    /// Create a recipe book over `repository`
    pub fn new(repository: Arc<dyn RecipeRepository>) -> Self {
        Self { repository }
    }

    /// All recipes
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read
    pub async fn list(&self) -> AppResult<Vec<Recipe>> {
        Ok(self.repository.list().await?)
    }

    /// Recipe by id
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read
    pub async fn get(&self, id: RecipeId) -> AppResult<Option<Recipe>> {
        Ok(self.repository.get_by_id(id).await?)
    }

    /// Recipe by id, failing when it does not exist
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown id
    pub async fn require(&self, id: RecipeId) -> AppResult<Recipe> {
        self.get(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {id}")))
    }

    /// Recipes whose name, category or description contains `query`, case-insensitively
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read
    pub async fn search(&self, query: &str) -> AppResult<Vec<Recipe>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|recipe| recipe.matches_query(query))
            .collect())
    }

    /// Store a new recipe
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank name or a malformed requirement
    pub async fn create(&self, recipe: &NewRecipe) -> AppResult<RecipeId> {
        if recipe.name.trim().is_empty() {
            return Err(AppError::invalid_input("Recipe name must not be empty"));
        }
        validate_requirements(&recipe.requirements)?;

        let id = self.repository.create(recipe).await?;
        info!(recipe_id = %id, name = %recipe.name, "Recipe created");
        Ok(id)
    }

    /// Partially update a recipe
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank name or a malformed requirement,
    /// `ResourceNotFound` for an unknown id
    pub async fn update(&self, id: RecipeId, patch: &RecipePatch) -> AppResult<()> {
        if patch.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err(AppError::invalid_input("Recipe name must not be empty"));
        }
        if let Some(requirements) = &patch.requirements {
            validate_requirements(requirements)?;
        }
        Ok(self.repository.update(id, patch).await?)
    }

    /// Delete a recipe; an unknown id is a no-op returning `false`
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the delete
    pub async fn delete(&self, id: RecipeId) -> AppResult<bool> {
        Ok(self.repository.delete(id).await?)
    }
}

fn validate_requirements(requirements: &[RecipeRequirement]) -> AppResult<()> {
    for (index, requirement) in requirements.iter().enumerate() {
        if !(requirement.quantity.is_finite() && requirement.quantity > 0.0) {
            return Err(AppError::invalid_input(format!(
                "Requirement {} must have a positive quantity, got {}",
                index + 1,
                requirement.quantity
            )));
        }
        if requirement.unit.trim().is_empty() {
            return Err(AppError::invalid_input(format!(
                "Requirement {} must have a unit",
                index + 1
            )));
        }
    }
    Ok(())
}
