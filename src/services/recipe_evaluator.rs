// ABOUTME: Recipe availability evaluator over the stock ledger snapshot
// ABOUTME: Scales requirements by portions, classifies them and attaches ingredient display names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;
use std::sync::Arc;

use larder_core::constants::ingredients::DELETED_INGREDIENT_PLACEHOLDER;
use larder_core::models::{IngredientId, Recipe, RecipeId, RecipeRequirement};
use larder_inventory::{evaluate_requirements, RecipeEvaluation};
use serde::Serialize;
use tracing::debug;

use super::ingredient_catalog::IngredientCatalog;
use super::recipe_book::RecipeBook;
use super::stock_ledger::StockLedger;
use crate::errors::AppResult;

/// A recipe's evaluation with the names needed to display it
#[derive(Debug, Clone, Serialize)]
pub struct RecipeAvailabilityView {
    /// The evaluated recipe, unscaled
    pub recipe: Recipe,
    /// Verdict, shortfalls, per-ingredient lines and expiry advisories
    pub evaluation: RecipeEvaluation,
    /// Names of the ingredients that still exist
    pub ingredient_names: HashMap<IngredientId, String>,
}

impl RecipeAvailabilityView {
    /// Name of a required ingredient, or the deleted-ingredient placeholder
    #[must_use]
    pub fn ingredient_name(&self, id: IngredientId) -> &str {
        self.ingredient_names
            .get(&id)
            .map_or(DELETED_INGREDIENT_PLACEHOLDER, String::as_str)
    }
}

/// Computes availability verdicts for recipes
pub struct RecipeEvaluator {
    recipes: Arc<RecipeBook>,
    catalog: Arc<IngredientCatalog>,
    ledger: Arc<StockLedger>,
    urgency_days: u32,
}

impl RecipeEvaluator {
    /// Create an evaluator flagging lots within `urgency_days` of expiry
    pub fn new(
        recipes: Arc<RecipeBook>,
        catalog: Arc<IngredientCatalog>,
        ledger: Arc<StockLedger>,
        urgency_days: u32,
    ) -> Self {
        Self {
            recipes,
            catalog,
            ledger,
            urgency_days,
        }
    }

    /// Evaluate a requirement list at `portions` against current stock
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when `portions` is not finite and positive
    pub async fn evaluate(
        &self,
        requirements: &[RecipeRequirement],
        portions: f64,
    ) -> AppResult<RecipeEvaluation> {
        let snapshot = self.ledger.snapshot().await;
        Ok(evaluate_requirements(
            &snapshot,
            requirements,
            portions,
            self.ledger.today(),
            self.urgency_days,
        )?)
    }

    /// Load a recipe and evaluate it at `portions`
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown recipe, `InvalidInput` for bad portions
    pub async fn evaluate_recipe(
        &self,
        recipe_id: RecipeId,
        portions: f64,
    ) -> AppResult<RecipeAvailabilityView> {
        let recipe = self.recipes.require(recipe_id).await?;
        let evaluation = self.evaluate(&recipe.requirements, portions).await?;
        debug!(
            recipe_id = %recipe_id,
            portions,
            status = evaluation.status.as_str(),
            shortfalls = evaluation.shortfalls.len(),
            "Recipe evaluated"
        );

        let names = self.catalog.names().await?;
        let ingredient_names = recipe
            .requirements
            .iter()
            .filter_map(|r| {
                names
                    .get(&r.ingredient_id)
                    .map(|name| (r.ingredient_id, name.clone()))
            })
            .collect();

        Ok(RecipeAvailabilityView {
            recipe,
            evaluation,
            ingredient_names,
        })
    }

    /// Recipes whose single-portion requirements are fully covered by stock
    ///
    /// # Errors
    ///
    /// Returns an error if the recipes cannot be read
    pub async fn makeable_recipes(&self) -> AppResult<Vec<Recipe>> {
        let snapshot = self.ledger.snapshot().await;
        let today = self.ledger.today();
        Ok(self
            .recipes
            .list()
            .await?
            .into_iter()
            .filter(|recipe| snapshot.can_satisfy(&recipe.requirements, today))
            .collect())
    }
}
