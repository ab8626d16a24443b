// ABOUTME: Shopping list models built from recipe shortfalls
// ABOUTME: Shopping rows with cached source recipe name, payloads, and the joined display view
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{IngredientId, RecipeId, ShoppingItemId};
use crate::constants::ingredients::DELETED_INGREDIENT_PLACEHOLDER;

/// A row on the shopping list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    /// Unique identifier
    pub id: ShoppingItemId,
    /// Ingredient to buy
    pub ingredient_id: IngredientId,
    /// Quantity to buy
    pub quantity_needed: f64,
    /// Unit string
    pub unit: String,
    /// Recipe that produced this row
    pub source_recipe_id: Option<RecipeId>,
    /// Recipe name cached at insertion so it survives recipe deletion
    pub source_recipe_name: Option<String>,
    /// Insertion timestamp
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for inserting a shopping-list row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewShoppingListItem {
    /// Ingredient to buy
    pub ingredient_id: IngredientId,
    /// Quantity to buy
    pub quantity_needed: f64,
    /// Unit string
    pub unit: String,
    /// Recipe that produced this row
    pub source_recipe_id: Option<RecipeId>,
    /// Cached recipe name
    pub source_recipe_name: Option<String>,
}

impl NewShoppingListItem {
    /// Row not attached to any recipe
    pub fn manual(ingredient_id: IngredientId, quantity_needed: f64, unit: impl Into<String>) -> Self {
        Self {
            ingredient_id,
            quantity_needed,
            unit: unit.into(),
            source_recipe_id: None,
            source_recipe_name: None,
        }
    }
}

/// Partial update for a shopping-list row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListItemPatch {
    /// New quantity
    pub quantity_needed: Option<f64>,
    /// New unit
    pub unit: Option<String>,
}

/// Shopping-list row joined with ingredient details and current stock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListItemWithDetails {
    /// The row itself
    #[serde(flatten)]
    pub item: ShoppingListItem,
    /// Ingredient name, if the ingredient still exists
    pub ingredient_name: Option<String>,
    /// Ingredient category, if the ingredient still exists
    pub ingredient_category: Option<String>,
    /// Non-expired quantity on hand in the row's unit
    pub in_stock: f64,
}

impl ShoppingListItemWithDetails {
    /// Name to show for the row's ingredient
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.ingredient_name
            .as_deref()
            .unwrap_or(DELETED_INGREDIENT_PLACEHOLDER)
    }
}
