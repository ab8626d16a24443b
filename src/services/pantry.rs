// ABOUTME: Pantry facade wiring every engine service around one database handle
// ABOUTME: Drives the make-recipe decision flow and recipe deletion with shopping-list cleanup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Pantry
//!
//! Owns one instance of each service and hands the same [`StockLedger`] to
//! everything that needs stock, so there is a single snapshot per process.

use std::sync::Arc;

use larder_core::models::{IngredientId, RecipeId};
use larder_inventory::{
    plan_make_recipe, DeductionReport, MakeRecipeEvent, MakeRecipePlan, MakeRecipeState,
    RecipeEvaluation, ShortfallChoice,
};
use serde::Serialize;
use tracing::info;

use super::ingredient_catalog::IngredientCatalog;
use super::recipe_book::RecipeBook;
use super::recipe_evaluator::RecipeEvaluator;
use super::shopping_list::ShoppingListReconciler;
use super::stock_ledger::StockLedger;
use super::unit_registry::UnitRegistry;
use crate::clock::{Clock, SystemClock};
use crate::config::{EngineSettings, LarderConfig};
use crate::database::demo_data::seed_demo_data;
use crate::database::repositories::{
    IngredientRepositoryImpl, RecipeRepositoryImpl, ShoppingListRepositoryImpl,
    StockRepositoryImpl, UnitRepositoryImpl,
};
use crate::database::{BulkInsertReport, Database};
use crate::errors::AppResult;

/// What a "make recipe" request ended with
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MakeRecipeOutcome {
    /// Stock was consumed
    Deducted {
        /// Evaluation the decision was based on
        evaluation: RecipeEvaluation,
        /// Lots changed and remainders left unmet
        report: DeductionReport,
        /// Whether the user chose to proceed despite a shortfall
        proceeded_with_shortfall: bool,
    },
    /// Shortfalls went to the shopping list; stock is unchanged
    AddedToShoppingList {
        /// Evaluation the decision was based on
        evaluation: RecipeEvaluation,
        /// Rows written and rows rejected
        report: BulkInsertReport,
    },
    /// Stock is short and the caller must choose how to continue
    NeedsDecision {
        /// Evaluation to show the user
        evaluation: RecipeEvaluation,
    },
}

impl MakeRecipeOutcome {
    /// Final state of the make-recipe flow
    #[must_use]
    pub const fn state(&self) -> MakeRecipeState {
        match self {
            Self::Deducted { .. } => MakeRecipeState::Deducted,
            Self::AddedToShoppingList { .. } => MakeRecipeState::AddShortfallToShoppingList,
            Self::NeedsDecision { .. } => MakeRecipeState::HasShortfall,
        }
    }

    /// Evaluation the outcome was decided on
    #[must_use]
    pub const fn evaluation(&self) -> &RecipeEvaluation {
        match self {
            Self::Deducted { evaluation, .. }
            | Self::AddedToShoppingList { evaluation, .. }
            | Self::NeedsDecision { evaluation } => evaluation,
        }
    }
}

/// Every engine service over one database
pub struct Pantry {
    database: Database,
    settings: EngineSettings,
    units: Arc<UnitRegistry>,
    ingredients: Arc<IngredientCatalog>,
    recipes: Arc<RecipeBook>,
    stock: Arc<StockLedger>,
    evaluator: Arc<RecipeEvaluator>,
    shopping_list: Arc<ShoppingListReconciler>,
}

impl Pantry {
    /// Wire the services over `database`
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid settings, or a store error
    /// if the first stock snapshot cannot be loaded
    pub async fn new(
        database: Database,
        settings: EngineSettings,
        clock: Arc<dyn Clock>,
    ) -> AppResult<Self> {
        settings.validate()?;

        let units = Arc::new(UnitRegistry::new(
            Arc::new(UnitRepositoryImpl::new(database.clone())),
            settings.default_unit.clone(),
        ));
        let ingredients = Arc::new(IngredientCatalog::new(Arc::new(
            IngredientRepositoryImpl::new(database.clone()),
        )));
        let recipes = Arc::new(RecipeBook::new(Arc::new(RecipeRepositoryImpl::new(
            database.clone(),
        ))));
        let stock = Arc::new(
            StockLedger::new(
                Arc::new(StockRepositoryImpl::new(database.clone())),
                clock,
                settings.expiring_within_days,
            )
            .await?,
        );
        let evaluator = Arc::new(RecipeEvaluator::new(
            Arc::clone(&recipes),
            Arc::clone(&ingredients),
            Arc::clone(&stock),
            settings.urgency_days,
        ));
        let shopping_list = Arc::new(ShoppingListReconciler::new(
            Arc::new(ShoppingListRepositoryImpl::new(database.clone())),
            Arc::clone(&stock),
            settings.purchase_shelf_life_days,
        ));

        Ok(Self {
            database,
            settings,
            units,
            ingredients,
            recipes,
            stock,
            evaluator,
            shopping_list,
        })
    }

    /// Connect to the configured database and wire the services on the system clock
    ///
    /// Loads the demo dataset first when `seed_demo_data` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or seeded
    pub async fn from_config(config: &LarderConfig) -> AppResult<Self> {
        let database = Database::from_config(&config.database).await?;
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        if config.seed_demo_data {
            seed_demo_data(&database, clock.today()).await?;
        }
        Self::new(database, config.engine.clone(), clock).await
    }

    /// Underlying database handle
    #[must_use]
    pub const fn database(&self) -> &Database {
        &self.database
    }

    /// Engine settings in effect
    #[must_use]
    pub const fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Unit registry
    #[must_use]
    pub fn units(&self) -> &UnitRegistry {
        &self.units
    }

    /// Ingredient catalog
    #[must_use]
    pub fn ingredients(&self) -> &IngredientCatalog {
        &self.ingredients
    }

    /// Recipe book
    #[must_use]
    pub fn recipes(&self) -> &RecipeBook {
        &self.recipes
    }

    /// Stock ledger
    #[must_use]
    pub fn stock(&self) -> &StockLedger {
        &self.stock
    }

    /// Recipe availability evaluator
    #[must_use]
    pub fn evaluator(&self) -> &RecipeEvaluator {
        &self.evaluator
    }

    /// Shopping list reconciler
    #[must_use]
    pub fn shopping_list(&self) -> &ShoppingListReconciler {
        &self.shopping_list
    }

    /// Make a recipe at `portions`
    ///
    /// With everything in stock the requirements are deducted right away.
    /// With a shortfall and no `choice`, nothing changes and
    /// [`MakeRecipeOutcome::NeedsDecision`] is returned.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown recipe, `InvalidInput` for bad
    /// portions, or a store error from the deduction
    pub async fn make_recipe(
        &self,
        recipe_id: RecipeId,
        portions: f64,
        choice: Option<ShortfallChoice>,
    ) -> AppResult<MakeRecipeOutcome> {
        let view = self.evaluator.evaluate_recipe(recipe_id, portions).await?;
        let evaluation = view.evaluation;

        match plan_make_recipe(&evaluation, choice)? {
            MakeRecipePlan::NeedsDecision => Ok(MakeRecipeOutcome::NeedsDecision { evaluation }),
            MakeRecipePlan::AddToShoppingList { shortfalls } => {
                let report = self
                    .shopping_list
                    .add_shortfalls(&view.recipe, &shortfalls)
                    .await;
                Ok(MakeRecipeOutcome::AddedToShoppingList { evaluation, report })
            }
            MakeRecipePlan::Deduct {
                state,
                requirements,
            } => {
                let report = self.stock.deduct(&requirements).await?;
                let finished = state.apply(MakeRecipeEvent::DeductionApplied)?;
                info!(
                    recipe_id = %recipe_id,
                    portions,
                    state = ?finished,
                    "Recipe made"
                );
                Ok(MakeRecipeOutcome::Deducted {
                    evaluation,
                    report,
                    proceeded_with_shortfall: state == MakeRecipeState::ProceedAnyway,
                })
            }
        }
    }

    /// Delete a recipe and the shopping rows it produced
    ///
    /// # Errors
    ///
    /// Returns an error if either delete is rejected by the store
    pub async fn delete_recipe(&self, recipe_id: RecipeId) -> AppResult<bool> {
        let deleted = self.recipes.delete(recipe_id).await?;
        let removed = self.shopping_list.remove_by_source_recipe(recipe_id).await?;
        info!(recipe_id = %recipe_id, deleted, shopping_rows_removed = removed, "Recipe deleted");
        Ok(deleted)
    }

    /// Delete an ingredient; its lots, requirements and shopping rows stay as orphans
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the delete
    pub async fn delete_ingredient(&self, ingredient_id: IngredientId) -> AppResult<bool> {
        let deleted = self.ingredients.delete(ingredient_id).await?;
        if deleted {
            self.stock.reload().await?;
        }
        Ok(deleted)
    }
}
