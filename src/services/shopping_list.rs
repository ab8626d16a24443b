// ABOUTME: Shopping list reconciler turning shortfalls into rows and purchases into stock
// ABOUTME: Rows are never merged; duplicates for the same ingredient are allowed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use chrono::NaiveDate;
use larder_core::models::{
    IngredientId, NewShoppingListItem, NewStockLot, Recipe, RecipeId, ShoppingItemId,
    ShoppingListItem, ShoppingListItemPatch, ShoppingListItemWithDetails, StockLotId,
};
use larder_inventory::{days_after, Shortfall};
use tracing::{info, warn};

use super::stock_ledger::StockLedger;
use crate::database::repositories::ShoppingListRepository;
use crate::database::{BulkInsertFailure, BulkInsertReport};
use crate::errors::{AppError, AppResult};

/// Persists shortfalls as shopping rows and moves purchases into stock
pub struct ShoppingListReconciler {
    repository: Arc<dyn ShoppingListRepository>,
    ledger: Arc<StockLedger>,
    purchase_shelf_life_days: u32,
}

impl ShoppingListReconciler {
    /// Create a reconciler; purchases without a date expire after `purchase_shelf_life_days`
    pub fn new(
        repository: Arc<dyn ShoppingListRepository>,
        ledger: Arc<StockLedger>,
        purchase_shelf_life_days: u32,
    ) -> Self {
        Self {
            repository,
            ledger,
            purchase_shelf_life_days,
        }
    }

    /// All rows
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read
    pub async fn list(&self) -> AppResult<Vec<ShoppingListItem>> {
        Ok(self.repository.list().await?)
    }

    /// Rows joined with ingredient details and the quantity currently in stock
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read
    pub async fn get_with_ingredient_details(&self) -> AppResult<Vec<ShoppingListItemWithDetails>> {
        let mut rows = self.repository.list_with_ingredient_details().await?;
        let snapshot = self.ledger.snapshot().await;
        let today = self.ledger.today();
        for row in &mut rows {
            row.in_stock = snapshot.total_available(row.item.ingredient_id, &row.item.unit, today);
        }
        Ok(rows)
    }

    /// Insert one row
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a non-positive quantity or blank unit, or a store error
    pub async fn add_one(&self, item: &NewShoppingListItem) -> AppResult<ShoppingItemId> {
        validate_item(item)?;
        Ok(self.repository.create(item).await?)
    }

    /// Insert rows one after another
    ///
    /// Invalid or rejected rows are reported in the returned
    /// [`BulkInsertReport`]; the others are still written.
    pub async fn add_bulk(&self, items: &[NewShoppingListItem]) -> BulkInsertReport {
        let mut rejected = Vec::new();
        let mut accepted = Vec::with_capacity(items.len());
        let mut positions = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match validate_item(item) {
                Ok(()) => {
                    accepted.push(item.clone());
                    positions.push(index);
                }
                Err(e) => rejected.push(BulkInsertFailure {
                    index,
                    item: item.clone(),
                    error: e.message,
                }),
            }
        }

        let mut report = self.repository.create_bulk(&accepted).await;
        for failure in &mut report.failed {
            failure.index = positions.get(failure.index).copied().unwrap_or(failure.index);
        }
        report.failed.extend(rejected);
        report.failed.sort_by_key(|failure| failure.index);

        if !report.is_complete() {
            warn!(
                inserted = report.inserted.len(),
                failed = report.failed.len(),
                "Bulk shopping list insert partially failed"
            );
        }
        report
    }

    /// Add one row per shortfall, for the missing quantity, tagged with the recipe
    pub async fn add_shortfalls(&self, recipe: &Recipe, shortfalls: &[Shortfall]) -> BulkInsertReport {
        let items: Vec<NewShoppingListItem> = shortfalls
            .iter()
            .map(|shortfall| NewShoppingListItem {
                ingredient_id: shortfall.ingredient_id,
                quantity_needed: shortfall.missing,
                unit: shortfall.unit.clone(),
                source_recipe_id: Some(recipe.id),
                source_recipe_name: Some(recipe.name.clone()),
            })
            .collect();

        let report = self.add_bulk(&items).await;
        info!(
            recipe_id = %recipe.id,
            added = report.inserted.len(),
            "Recipe shortfalls added to shopping list"
        );
        report
    }

    /// Change the quantity of a row
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a non-positive quantity, `ResourceNotFound` for an unknown id
    pub async fn update_quantity(&self, id: ShoppingItemId, quantity: f64) -> AppResult<()> {
        validate_quantity(quantity)?;
        Ok(self
            .repository
            .update(
                id,
                &ShoppingListItemPatch {
                    quantity_needed: Some(quantity),
                    unit: None,
                },
            )
            .await?)
    }

    /// Remove a row; an unknown id is a no-op returning `false`
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the delete
    pub async fn remove(&self, id: ShoppingItemId) -> AppResult<bool> {
        Ok(self.repository.delete(id).await?)
    }

    /// Remove every row for an ingredient
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the delete
    pub async fn remove_by_ingredient(&self, ingredient_id: IngredientId) -> AppResult<u64> {
        Ok(self.repository.delete_by_ingredient(ingredient_id).await?)
    }

    /// Remove every row produced by a recipe
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the delete
    pub async fn remove_by_source_recipe(&self, recipe_id: RecipeId) -> AppResult<u64> {
        let removed = self.repository.delete_by_source_recipe(recipe_id).await?;
        info!(recipe_id = %recipe_id, removed, "Shopping rows of recipe removed");
        Ok(removed)
    }

    /// Remove every row
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the delete
    pub async fn clear_all(&self) -> AppResult<u64> {
        Ok(self.repository.clear().await?)
    }

    /// Move a row into stock as a new lot, then remove the row
    ///
    /// `quantity` defaults to the row's quantity and `expiry` to today plus
    /// the configured shelf life.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown row, `InvalidInput` for a bad quantity,
    /// or a store error. If the lot is written but the row cannot be removed,
    /// the error is returned and the lot stays in stock.
    pub async fn purchase(
        &self,
        id: ShoppingItemId,
        quantity: Option<f64>,
        expiry: Option<NaiveDate>,
    ) -> AppResult<StockLotId> {
        let item = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Shopping list item {id}")))?;
        self.purchase_item(&item, quantity, expiry).await
    }

    /// Purchase every row with its own quantity and the default shelf life
    ///
    /// # Errors
    ///
    /// Stops at the first failure; rows purchased before it stay purchased
    pub async fn purchase_all(&self) -> AppResult<Vec<StockLotId>> {
        let items = self.repository.list().await?;
        let mut lots = Vec::with_capacity(items.len());
        for item in &items {
            lots.push(self.purchase_item(item, None, None).await?);
        }
        info!(purchased = lots.len(), "Shopping list purchased");
        Ok(lots)
    }

    async fn purchase_item(
        &self,
        item: &ShoppingListItem,
        quantity: Option<f64>,
        expiry: Option<NaiveDate>,
    ) -> AppResult<StockLotId> {
        let quantity = quantity.unwrap_or(item.quantity_needed);
        let expiry_date = expiry
            .unwrap_or_else(|| days_after(self.ledger.today(), self.purchase_shelf_life_days));

        let lot_id = self
            .ledger
            .add_lot(&NewStockLot {
                ingredient_id: item.ingredient_id,
                quantity,
                unit: item.unit.clone(),
                expiry_date,
            })
            .await?;
        self.repository.delete(item.id).await?;

        info!(item_id = %item.id, lot_id = %lot_id, quantity, "Shopping item purchased into stock");
        Ok(lot_id)
    }
}

fn validate_quantity(quantity: f64) -> AppResult<()> {
    if quantity.is_finite() && quantity > 0.0 {
        Ok(())
    } else {
        Err(AppError::invalid_input(format!(
            "Quantity needed must be a positive number, got {quantity}"
        )))
    }
}

fn validate_item(item: &NewShoppingListItem) -> AppResult<()> {
    validate_quantity(item.quantity_needed)?;
    if item.unit.trim().is_empty() {
        return Err(AppError::invalid_input("Shopping list unit must not be empty"));
    }
    Ok(())
}
