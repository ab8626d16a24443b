// ABOUTME: Ingredient catalog models with nutritional facts and canonical unit reference
// ABOUTME: Ingredient, NewIngredient and the COALESCE-style IngredientPatch
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{IngredientId, UnitId};
use crate::constants::ingredients::DEFAULT_CATEGORY;

/// Catalog entry for an ingredient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Unique identifier
    pub id: IngredientId,
    /// Ingredient name, unique across the catalog
    pub name: String,
    /// Free-form category
    pub category: String,
    /// Canonical unit reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<UnitId>,
    /// Energy per 100g (kcal)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    /// Protein per 100g (grams)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    /// Carbohydrates per 100g (grams)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbs: Option<f64>,
    /// Fat per 100g (grams)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fat: Option<f64>,
    /// Opaque image payload (base64 or path)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Creation timestamp
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for creating an ingredient
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewIngredient {
    /// Ingredient name
    pub name: String,
    /// Category; empty or missing falls back to the default category
    pub category: Option<String>,
    /// Canonical unit reference
    pub unit_id: Option<UnitId>,
    /// Energy per 100g (kcal)
    pub calories: Option<f64>,
    /// Protein per 100g (grams)
    pub protein: Option<f64>,
    /// Carbohydrates per 100g (grams)
    pub carbs: Option<f64>,
    /// Fat per 100g (grams)
    pub fat: Option<f64>,
    /// Opaque image payload
    pub image: Option<String>,
}

impl NewIngredient {
    /// Create a payload with just a name and category
    pub fn named(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: Some(category.into()),
            ..Self::default()
        }
    }

    /// Category to store, defaulting empty values to the sentinel category
    #[must_use]
    pub fn effective_category(&self) -> &str {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CATEGORY)
    }
}

/// Partial update for an ingredient; `None` fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngredientPatch {
    /// New name
    pub name: Option<String>,
    /// New category
    pub category: Option<String>,
    /// New canonical unit
    pub unit_id: Option<UnitId>,
    /// New energy value
    pub calories: Option<f64>,
    /// New protein value
    pub protein: Option<f64>,
    /// New carbohydrate value
    pub carbs: Option<f64>,
    /// New fat value
    pub fat: Option<f64>,
    /// New image payload
    pub image: Option<String>,
}
