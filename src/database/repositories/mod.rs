// ABOUTME: Repository traits the engine services consume, one per stored aggregate
// ABOUTME: SQLite implementations live in sibling modules and take the Database handle at construction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Repositories
//!
//! Services never reach for a global connection. Each one is built with the
//! repository it reads and writes through, so tests and alternative stores
//! can hand in their own implementation.

/// Ingredient catalog repository
pub mod ingredient_repository;
/// Recipe repository
pub mod recipe_repository;
/// Shopping list repository
pub mod shopping_list_repository;
/// Stock lot repository
pub mod stock_repository;
/// Unit registry repository
pub mod unit_repository;

pub use ingredient_repository::IngredientRepositoryImpl;
pub use recipe_repository::RecipeRepositoryImpl;
pub use shopping_list_repository::ShoppingListRepositoryImpl;
pub use stock_repository::StockRepositoryImpl;
pub use unit_repository::UnitRepositoryImpl;

use super::BulkInsertReport;
use crate::errors::DatabaseError;
use async_trait::async_trait;
use chrono::NaiveDate;
use larder_core::models::{
    Ingredient, IngredientId, IngredientPatch, NewIngredient, NewRecipe, NewShoppingListItem,
    NewStockLot, Recipe, RecipeId, RecipePatch, ShoppingItemId, ShoppingListItem,
    ShoppingListItemPatch, ShoppingListItemWithDetails, StockLot, StockLotId, StockLotPatch,
    StockLotWithDetails, Unit, UnitId,
};
use larder_inventory::DeductionReport;

/// Read access to the unit registry
#[async_trait]
pub trait UnitRepository: Send + Sync {
    /// All units ordered by id
    async fn list(&self) -> Result<Vec<Unit>, DatabaseError>;

    /// Unit by id
    async fn find_by_id(&self, id: UnitId) -> Result<Option<Unit>, DatabaseError>;

    /// Unit by human name, case-insensitive
    async fn find_by_name(&self, name: &str) -> Result<Option<Unit>, DatabaseError>;

    /// Unit by normalized symbol
    async fn find_by_symbol(&self, symbol: &str) -> Result<Option<Unit>, DatabaseError>;
}

/// Ingredient catalog storage
#[async_trait]
pub trait IngredientRepository: Send + Sync {
    /// All ingredients ordered by name
    async fn list(&self) -> Result<Vec<Ingredient>, DatabaseError>;

    /// Ingredient by id
    async fn get_by_id(&self, id: IngredientId) -> Result<Option<Ingredient>, DatabaseError>;

    /// Insert an ingredient
    async fn create(&self, ingredient: &NewIngredient) -> Result<IngredientId, DatabaseError>;

    /// Partial update; `NotFound` when the id is unknown
    async fn update(&self, id: IngredientId, patch: &IngredientPatch) -> Result<(), DatabaseError>;

    /// Delete, returning whether the row existed
    async fn delete(&self, id: IngredientId) -> Result<bool, DatabaseError>;
}

/// Stock lot storage
#[async_trait]
pub trait StockRepository: Send + Sync {
    /// All lots, the snapshot source
    async fn list(&self) -> Result<Vec<StockLot>, DatabaseError>;

    /// All lots joined with ingredient name and category
    async fn list_with_details(&self) -> Result<Vec<StockLotWithDetails>, DatabaseError>;

    /// Insert a lot
    async fn create(&self, lot: &NewStockLot) -> Result<StockLotId, DatabaseError>;

    /// Partial update; `NotFound` when the id is unknown
    async fn update(&self, id: StockLotId, patch: &StockLotPatch) -> Result<(), DatabaseError>;

    /// Delete, returning whether the row existed
    async fn delete(&self, id: StockLotId) -> Result<bool, DatabaseError>;

    /// Lots expiring within `[today, today + days]`
    async fn list_expiring_within(
        &self,
        today: NaiveDate,
        days: u32,
    ) -> Result<Vec<StockLotWithDetails>, DatabaseError>;

    /// Delete lots whose ingredient no longer exists
    async fn delete_orphans(&self) -> Result<u64, DatabaseError>;

    /// Persist a planned deduction
    async fn apply_deduction(&self, report: &DeductionReport) -> Result<(), DatabaseError>;
}

/// Recipe storage, each recipe with its steps and requirements
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// All recipes
    async fn list(&self) -> Result<Vec<Recipe>, DatabaseError>;

    /// Recipe by id
    async fn get_by_id(&self, id: RecipeId) -> Result<Option<Recipe>, DatabaseError>;

    /// Insert a recipe
    async fn create(&self, recipe: &NewRecipe) -> Result<RecipeId, DatabaseError>;

    /// Partial update; `NotFound` when the id is unknown
    async fn update(&self, id: RecipeId, patch: &RecipePatch) -> Result<(), DatabaseError>;

    /// Delete, returning whether the row existed
    async fn delete(&self, id: RecipeId) -> Result<bool, DatabaseError>;
}

/// Shopping list storage
#[async_trait]
pub trait ShoppingListRepository: Send + Sync {
    /// All rows
    async fn list(&self) -> Result<Vec<ShoppingListItem>, DatabaseError>;

    /// Rows joined with ingredient name and category
    async fn list_with_ingredient_details(
        &self,
    ) -> Result<Vec<ShoppingListItemWithDetails>, DatabaseError>;

    /// Row by id
    async fn get_by_id(&self, id: ShoppingItemId) -> Result<Option<ShoppingListItem>, DatabaseError>;

    /// Insert a row
    async fn create(&self, item: &NewShoppingListItem) -> Result<ShoppingItemId, DatabaseError>;

    /// Sequential inserts; failures are reported per item
    async fn create_bulk(&self, items: &[NewShoppingListItem]) -> BulkInsertReport;

    /// Partial update; `NotFound` when the id is unknown
    async fn update(
        &self,
        id: ShoppingItemId,
        patch: &ShoppingListItemPatch,
    ) -> Result<(), DatabaseError>;

    /// Delete, returning whether the row existed
    async fn delete(&self, id: ShoppingItemId) -> Result<bool, DatabaseError>;

    /// Delete every row for an ingredient
    async fn delete_by_ingredient(&self, ingredient_id: IngredientId) -> Result<u64, DatabaseError>;

    /// Delete every row produced by a recipe
    async fn delete_by_source_recipe(&self, recipe_id: RecipeId) -> Result<u64, DatabaseError>;

    /// Delete every row
    async fn clear(&self) -> Result<u64, DatabaseError>;
}
