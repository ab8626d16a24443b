// ABOUTME: Ingredient catalog service with input validation and display-name resolution
// ABOUTME: Deleting an ingredient leaves stock, requirement and shopping references orphaned
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;
use std::sync::Arc;

use crate::constants::ingredients::{CATEGORIES, DELETED_INGREDIENT_PLACEHOLDER};
use crate::database::repositories::IngredientRepository;
use crate::errors::{AppError, AppResult};
use larder_core::models::{Ingredient, IngredientId, IngredientPatch, NewIngredient};
use tracing::info;

/// Registry of ingredient metadata
pub struct IngredientCatalog {
    repository: Arc<dyn IngredientRepository>,
}

impl IngredientCatalog {
    /// Create a catalog over `repository`
    pub fn new(repository: Arc<dyn IngredientRepository>) -> Self {
        Self { repository }
    }

    /// Categories offered for new ingredients
    #[must_use]
    pub const fn categories() -> &'static [&'static str] {
        CATEGORIES
    }

    /// All ingredients ordered by name
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read
    pub async fn list(&self) -> AppResult<Vec<Ingredient>> {
        Ok(self.repository.list().await?)
    }

    /// Ingredient by id
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read
    pub async fn get(&self, id: IngredientId) -> AppResult<Option<Ingredient>> {
        Ok(self.repository.get_by_id(id).await?)
    }

    /// Create an ingredient; a blank category becomes the default category
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank name, `ResourceAlreadyExists` for a duplicate
    pub async fn create(&self, ingredient: &NewIngredient) -> AppResult<IngredientId> {
        if ingredient.name.trim().is_empty() {
            return Err(AppError::invalid_input("Ingredient name must not be empty"));
        }
        validate_nutrition(
            ingredient.calories,
            ingredient.protein,
            ingredient.carbs,
            ingredient.fat,
        )?;

        let id = self.repository.create(ingredient).await?;
        info!(ingredient_id = %id, name = %ingredient.name, "Ingredient added to catalog");
        Ok(id)
    }

    /// Partially update an ingredient
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank name, `ResourceNotFound` for an unknown id
    pub async fn update(&self, id: IngredientId, patch: &IngredientPatch) -> AppResult<()> {
        if patch.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err(AppError::invalid_input("Ingredient name must not be empty"));
        }
        validate_nutrition(patch.calories, patch.protein, patch.carbs, patch.fat)?;
        Ok(self.repository.update(id, patch).await?)
    }

    /// Delete an ingredient; an unknown id is a no-op returning `false`
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the delete
    pub async fn delete(&self, id: IngredientId) -> AppResult<bool> {
        Ok(self.repository.delete(id).await?)
    }

    /// Name of an ingredient, or the deleted-ingredient placeholder
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read
    pub async fn display_name(&self, id: IngredientId) -> AppResult<String> {
        Ok(self
            .get(id)
            .await?
            .map_or_else(|| DELETED_INGREDIENT_PLACEHOLDER.to_owned(), |i| i.name))
    }

    /// Names of every ingredient keyed by id
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read
    pub async fn names(&self) -> AppResult<HashMap<IngredientId, String>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .map(|ingredient| (ingredient.id, ingredient.name))
            .collect())
    }
}

fn validate_nutrition(
    calories: Option<f64>,
    protein: Option<f64>,
    carbs: Option<f64>,
    fat: Option<f64>,
) -> AppResult<()> {
    for (field, value) in [
        ("calories", calories),
        ("protein", protein),
        ("carbs", carbs),
        ("fat", fat),
    ] {
        if let Some(value) = value {
            if !value.is_finite() || value < 0.0 {
                return Err(AppError::invalid_input(format!(
                    "{field} must be a non-negative number, got {value}"
                )));
            }
        }
    }
    Ok(())
}
