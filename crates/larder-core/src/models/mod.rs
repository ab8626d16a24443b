// ABOUTME: Domain models shared by the inventory engine and the persistence layer
// ABOUTME: Re-exports ids, units, ingredients, stock lots, recipes and shopping-list types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain models
//!
//! Plain data types with serde support. Behavior beyond small helpers lives
//! in `larder-inventory` (pure algorithms) and the main crate (persistence).

mod ids;
mod ingredient;
mod recipe;
mod shopping_list;
mod stock;
mod unit;

pub use ids::{IngredientId, RecipeId, ShoppingItemId, StockLotId, UnitId};
pub use ingredient::{Ingredient, IngredientPatch, NewIngredient};
pub use recipe::{Difficulty, NewRecipe, Recipe, RecipePatch, RecipeRequirement};
pub use shopping_list::{
    NewShoppingListItem, ShoppingListItem, ShoppingListItemPatch, ShoppingListItemWithDetails,
};
pub use stock::{AnnotatedStockLot, NewStockLot, StockLot, StockLotPatch, StockLotWithDetails};
pub use unit::{NewUnit, Unit};
