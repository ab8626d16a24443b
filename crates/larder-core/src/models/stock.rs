// ABOUTME: Stock lot models for perishable inventory batches
// ABOUTME: StockLot, creation and patch payloads, and the ingredient-joined display view
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{IngredientId, StockLotId};
use crate::constants::ingredients::DELETED_INGREDIENT_PLACEHOLDER;

/// A single physical batch of an ingredient in stock
///
/// The unit is a free-form string; it does not have to match the
/// ingredient's canonical unit. Quantity arithmetic only combines lots whose
/// normalized unit strings are equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockLot {
    /// Unique identifier
    pub id: StockLotId,
    /// Ingredient this lot belongs to (may reference a deleted ingredient)
    pub ingredient_id: IngredientId,
    /// Remaining quantity
    pub quantity: f64,
    /// Unit as entered
    pub unit: String,
    /// Calendar expiry date
    pub expiry_date: NaiveDate,
    /// When the lot entered stock
    pub added_date: Option<DateTime<Utc>>,
}

impl StockLot {
    /// Whether the lot is expired on `today` (expiry strictly before today)
    #[must_use]
    pub fn is_expired_on(&self, today: NaiveDate) -> bool {
        self.expiry_date < today
    }

    /// Whole days from `today` until expiry; negative once expired
    #[must_use]
    pub fn days_to_expiry(&self, today: NaiveDate) -> i64 {
        (self.expiry_date - today).num_days()
    }
}

/// Payload for adding a lot to stock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStockLot {
    /// Ingredient reference
    pub ingredient_id: IngredientId,
    /// Positive quantity
    pub quantity: f64,
    /// Unit string
    pub unit: String,
    /// Calendar expiry date
    pub expiry_date: NaiveDate,
}

/// Partial update for a lot; `None` fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockLotPatch {
    /// New ingredient reference
    pub ingredient_id: Option<IngredientId>,
    /// New quantity
    pub quantity: Option<f64>,
    /// New unit
    pub unit: Option<String>,
    /// New expiry date
    pub expiry_date: Option<NaiveDate>,
}

impl StockLotPatch {
    /// Patch that only changes the quantity
    #[must_use]
    pub const fn quantity(quantity: f64) -> Self {
        Self {
            ingredient_id: None,
            quantity: Some(quantity),
            unit: None,
            expiry_date: None,
        }
    }
}

/// Stock lot joined with its ingredient for display
///
/// `ingredient_name` is `None` for orphaned lots whose ingredient was deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockLotWithDetails {
    /// The lot itself
    #[serde(flatten)]
    pub lot: StockLot,
    /// Ingredient name, if the ingredient still exists
    pub ingredient_name: Option<String>,
    /// Ingredient category, if the ingredient still exists
    pub ingredient_category: Option<String>,
}

impl StockLotWithDetails {
    /// Name to show for the lot's ingredient
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.ingredient_name
            .as_deref()
            .unwrap_or(DELETED_INGREDIENT_PLACEHOLDER)
    }

    /// Whether the referenced ingredient no longer exists
    #[must_use]
    pub const fn is_orphaned(&self) -> bool {
        self.ingredient_name.is_none()
    }
}

/// A lot annotated with its expiry position relative to a given day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedStockLot {
    /// The lot itself
    #[serde(flatten)]
    pub lot: StockLot,
    /// Whole days until expiry (negative once expired)
    pub days_to_expiry: i64,
    /// Expiry strictly before the reference day
    pub is_expired: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn lot(expiry: NaiveDate) -> StockLot {
        StockLot {
            id: StockLotId(1),
            ingredient_id: IngredientId(1),
            quantity: 1.0,
            unit: "g".to_owned(),
            expiry_date: expiry,
            added_date: None,
        }
    }

    #[test]
    fn test_expiry_boundaries() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();

        let expires_today = lot(today);
        assert!(!expires_today.is_expired_on(today));
        assert_eq!(expires_today.days_to_expiry(today), 0);

        let yesterday = lot(today.pred_opt().unwrap());
        assert!(yesterday.is_expired_on(today));
        assert_eq!(yesterday.days_to_expiry(today), -1);

        let next_week = lot(NaiveDate::from_ymd_opt(2025, 3, 17).unwrap());
        assert_eq!(next_week.days_to_expiry(today), 7);
    }

    #[test]
    fn test_orphan_display_name() {
        let details = StockLotWithDetails {
            lot: lot(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()),
            ingredient_name: None,
            ingredient_category: None,
        };
        assert!(details.is_orphaned());
        assert_eq!(details.display_name(), "deleted ingredient");
    }
}
