// ABOUTME: Recipe models with ordered steps and per-portion ingredient requirements
// ABOUTME: Recipe, RecipeRequirement, Difficulty levels and create/patch payloads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{IngredientId, RecipeId};

/// One ingredient requirement of a recipe, for its nominal portion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeRequirement {
    /// Required ingredient
    pub ingredient_id: IngredientId,
    /// Quantity needed
    pub quantity: f64,
    /// Unit string
    pub unit: String,
}

impl RecipeRequirement {
    /// Create a requirement
    pub fn new(ingredient_id: IngredientId, quantity: f64, unit: impl Into<String>) -> Self {
        Self {
            ingredient_id,
            quantity,
            unit: unit.into(),
        }
    }

    /// Copy of this requirement with the quantity multiplied by `portions`
    #[must_use]
    pub fn scaled(&self, portions: f64) -> Self {
        Self {
            ingredient_id: self.ingredient_id,
            quantity: self.quantity * portions,
            unit: self.unit.clone(),
        }
    }
}

/// Recipe difficulty on a 1-5 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Level 1
    VeryEasy,
    /// Level 2
    Easy,
    /// Level 3
    Medium,
    /// Level 4
    Hard,
    /// Level 5
    VeryHard,
}

impl Difficulty {
    /// Numeric level as stored
    #[must_use]
    pub const fn level(self) -> i64 {
        match self {
            Self::VeryEasy => 1,
            Self::Easy => 2,
            Self::Medium => 3,
            Self::Hard => 4,
            Self::VeryHard => 5,
        }
    }

    /// Parse a stored level, returning `None` outside 1-5
    #[must_use]
    pub const fn from_level(level: i64) -> Option<Self> {
        match level {
            1 => Some(Self::VeryEasy),
            2 => Some(Self::Easy),
            3 => Some(Self::Medium),
            4 => Some(Self::Hard),
            5 => Some(Self::VeryHard),
            _ => None,
        }
    }

    /// Human label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::VeryEasy => "very easy",
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::VeryHard => "very hard",
        }
    }
}

/// A stored recipe with its steps and requirements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique identifier
    pub id: RecipeId,
    /// Recipe name
    pub name: String,
    /// Free-text description
    pub description: Option<String>,
    /// Category ("Main course", ...)
    pub category: Option<String>,
    /// Difficulty level
    pub difficulty: Option<Difficulty>,
    /// Preparation time in minutes
    pub prep_time_minutes: Option<u32>,
    /// Cooking time in minutes
    pub cook_time_minutes: Option<u32>,
    /// Nominal servings
    pub servings: Option<u32>,
    /// Opaque image payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Ordered preparation steps
    pub steps: Vec<String>,
    /// Ordered ingredient requirements
    pub requirements: Vec<RecipeRequirement>,
    /// Creation timestamp
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp
    pub updated_at: Option<DateTime<Utc>>,
}

impl Recipe {
    /// Requirements multiplied by `portions`; the recipe itself is not modified
    #[must_use]
    pub fn scaled_requirements(&self, portions: f64) -> Vec<RecipeRequirement> {
        self.requirements
            .iter()
            .map(|requirement| requirement.scaled(portions))
            .collect()
    }

    /// Case-insensitive substring match over name, category and description
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let contains = |field: Option<&str>| {
            field.is_some_and(|value| value.to_lowercase().contains(&needle))
        };
        contains(Some(&self.name))
            || contains(self.category.as_deref())
            || contains(self.description.as_deref())
    }
}

/// Payload for creating a recipe
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewRecipe {
    /// Recipe name
    pub name: String,
    /// Description
    pub description: Option<String>,
    /// Category
    pub category: Option<String>,
    /// Difficulty
    pub difficulty: Option<Difficulty>,
    /// Preparation time in minutes
    pub prep_time_minutes: Option<u32>,
    /// Cooking time in minutes
    pub cook_time_minutes: Option<u32>,
    /// Nominal servings
    pub servings: Option<u32>,
    /// Image payload
    pub image: Option<String>,
    /// Ordered steps
    pub steps: Vec<String>,
    /// Ordered requirements
    pub requirements: Vec<RecipeRequirement>,
}

/// Partial update for a recipe
///
/// Scalar `None` fields are left unchanged. `steps` and `requirements`
/// replace the whole list when present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipePatch {
    /// New name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New category
    pub category: Option<String>,
    /// New difficulty
    pub difficulty: Option<Difficulty>,
    /// New preparation time
    pub prep_time_minutes: Option<u32>,
    /// New cooking time
    pub cook_time_minutes: Option<u32>,
    /// New servings
    pub servings: Option<u32>,
    /// New image payload
    pub image: Option<String>,
    /// Replacement step list
    pub steps: Option<Vec<String>>,
    /// Replacement requirement list
    pub requirements: Option<Vec<RecipeRequirement>>,
}
