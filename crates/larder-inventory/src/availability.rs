// ABOUTME: Recipe availability evaluation on top of the stock ledger
// ABOUTME: Portion scaling, per-requirement OK/PARTIAL/NONE badges and "expiring soon" advisories
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::NaiveDate;
use larder_core::models::{RecipeRequirement, StockLot};
use serde::{Deserialize, Serialize};

use crate::error::{InventoryError, InventoryResult};
use crate::ledger::{AvailabilityStatus, Shortfall, StockSnapshot};

/// Per-requirement availability badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IngredientBadge {
    /// Available quantity covers the requirement
    #[serde(rename = "OK")]
    Sufficient,
    /// Some, but not enough, is available
    #[serde(rename = "PARTIAL")]
    Partial,
    /// Nothing is available
    #[serde(rename = "NONE")]
    Missing,
}

impl IngredientBadge {
    /// Badge for an available/needed pair
    #[must_use]
    pub fn classify(available: f64, needed: f64) -> Self {
        if available >= needed {
            Self::Sufficient
        } else if available > 0.0 {
            Self::Partial
        } else {
            Self::Missing
        }
    }

    /// Wire label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sufficient => "OK",
            Self::Partial => "PARTIAL",
            Self::Missing => "NONE",
        }
    }
}

/// Availability of one scaled requirement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementAvailability {
    /// Requirement after portion scaling
    pub requirement: RecipeRequirement,
    /// Non-expired quantity on hand in the requirement's unit
    pub available: f64,
    /// `max(0, needed - available)`
    pub missing: f64,
    /// Badge for display
    pub badge: IngredientBadge,
    /// Some lot of this ingredient expires within the urgency window
    pub expiring_soon: bool,
}

/// Full verdict for a recipe at a given portion multiplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeEvaluation {
    /// Portion multiplier applied
    pub portions: f64,
    /// Overall status from the ledger classification
    pub status: AvailabilityStatus,
    /// Short requirements, in requirement order
    pub shortfalls: Vec<Shortfall>,
    /// One line per scaled requirement
    pub lines: Vec<RequirementAvailability>,
    /// Lots of required ingredients expiring within the urgency window, earliest first
    pub expiring_soon: Vec<StockLot>,
}

impl RecipeEvaluation {
    /// Scaled requirements in recipe order
    #[must_use]
    pub fn requirements(&self) -> Vec<RecipeRequirement> {
        self.lines.iter().map(|line| line.requirement.clone()).collect()
    }

    /// Whether nothing is short
    #[must_use]
    pub fn is_fully_available(&self) -> bool {
        self.shortfalls.is_empty()
    }

    /// Whether any required lot is close to expiry
    #[must_use]
    pub fn has_expiring_soon(&self) -> bool {
        !self.expiring_soon.is_empty()
    }
}

/// Check that a portion multiplier is finite and positive
///
/// # Errors
///
/// Returns [`InventoryError::InvalidPortions`] for zero, negative, NaN or infinite values.
pub fn validate_portions(portions: f64) -> InventoryResult<f64> {
    if portions.is_finite() && portions > 0.0 {
        Ok(portions)
    } else {
        Err(InventoryError::InvalidPortions(portions))
    }
}

/// Multiply every requirement by `portions` without touching the input
///
/// # Errors
///
/// Returns [`InventoryError::InvalidPortions`] when `portions` is not finite and positive.
pub fn scale_requirements(
    requirements: &[RecipeRequirement],
    portions: f64,
) -> InventoryResult<Vec<RecipeRequirement>> {
    let portions = validate_portions(portions)?;
    Ok(requirements
        .iter()
        .map(|requirement| requirement.scaled(portions))
        .collect())
}

/// Evaluate requirements against the snapshot at `portions`
///
/// The overall verdict comes from [`StockSnapshot::classify_availability`].
/// Expiry advisories never change it.
///
/// # Errors
///
/// Returns [`InventoryError::InvalidPortions`] when `portions` is not finite and positive.
pub fn evaluate_requirements(
    snapshot: &StockSnapshot,
    requirements: &[RecipeRequirement],
    portions: f64,
    today: NaiveDate,
    urgency_days: u32,
) -> InventoryResult<RecipeEvaluation> {
    let scaled = scale_requirements(requirements, portions)?;
    let report = snapshot.classify_availability(&scaled, today);
    let urgency = i64::from(urgency_days);

    let mut expiring_soon: Vec<StockLot> = Vec::new();
    let mut lines = Vec::with_capacity(scaled.len());

    for requirement in scaled {
        let available = snapshot.total_available(requirement.ingredient_id, &requirement.unit, today);

        let mut flagged = false;
        for lot in snapshot.lots_for(requirement.ingredient_id) {
            let days = lot.days_to_expiry(today);
            if (0..=urgency).contains(&days) {
                flagged = true;
                if !expiring_soon.iter().any(|seen| seen.id == lot.id) {
                    expiring_soon.push(lot.clone());
                }
            }
        }

        lines.push(RequirementAvailability {
            available,
            missing: (requirement.quantity - available).max(0.0),
            badge: IngredientBadge::classify(available, requirement.quantity),
            expiring_soon: flagged,
            requirement,
        });
    }

    expiring_soon.sort_by(|a, b| a.expiry_date.cmp(&b.expiry_date).then(a.id.cmp(&b.id)));

    Ok(RecipeEvaluation {
        portions,
        status: report.status,
        shortfalls: report.shortfalls,
        lines,
        expiring_soon,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use larder_core::models::{IngredientId, StockLotId};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn lot(id: i64, ingredient: i64, quantity: f64, unit: &str, expiry: NaiveDate) -> StockLot {
        StockLot {
            id: StockLotId(id),
            ingredient_id: IngredientId(ingredient),
            quantity,
            unit: unit.to_owned(),
            expiry_date: expiry,
            added_date: None,
        }
    }

    #[test]
    fn test_badges() {
        assert_eq!(IngredientBadge::classify(5.0, 5.0), IngredientBadge::Sufficient);
        assert_eq!(IngredientBadge::classify(2.0, 5.0), IngredientBadge::Partial);
        assert_eq!(IngredientBadge::classify(0.0, 5.0), IngredientBadge::Missing);
        assert_eq!(IngredientBadge::Sufficient.as_str(), "OK");
    }

    #[test]
    fn test_invalid_portions_rejected() {
        let requirements = vec![RecipeRequirement::new(IngredientId(1), 100.0, "g")];
        for portions in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(scale_requirements(&requirements, portions).is_err());
        }
        let scaled = scale_requirements(&requirements, 1.5).unwrap();
        assert_eq!(scaled[0].quantity, 150.0);
    }

    #[test]
    fn test_portion_scaling_boundary() {
        let today = day(10);
        let snapshot = StockSnapshot::new(vec![lot(1, 1, 300.0, "g", day(30))]);
        let requirements = vec![RecipeRequirement::new(IngredientId(1), 100.0, "g")];

        let exact = evaluate_requirements(&snapshot, &requirements, 3.0, today, 3).unwrap();
        assert_eq!(exact.status, AvailabilityStatus::Full);
        assert_eq!(exact.lines[0].badge, IngredientBadge::Sufficient);

        let over = vec![RecipeRequirement::new(IngredientId(1), 301.0, "g")];
        let short = evaluate_requirements(&snapshot, &over, 1.0, today, 3).unwrap();
        assert_eq!(short.status, AvailabilityStatus::Partial);
        assert_eq!(short.shortfalls[0].missing, 1.0);
        assert_eq!(short.lines[0].badge, IngredientBadge::Partial);
    }

    #[test]
    fn test_expiring_soon_is_advisory() {
        let today = day(10);
        let snapshot = StockSnapshot::new(vec![
            lot(1, 1, 500.0, "g", day(13)),
            lot(2, 1, 500.0, "g", day(14)),
            lot(3, 2, 1.0, "unité", day(9)),
        ]);
        let requirements = vec![
            RecipeRequirement::new(IngredientId(1), 100.0, "g"),
            RecipeRequirement::new(IngredientId(2), 1.0, "unité"),
        ];

        let evaluation = evaluate_requirements(&snapshot, &requirements, 1.0, today, 3).unwrap();
        assert!(evaluation.lines[0].expiring_soon);
        assert!(!evaluation.lines[1].expiring_soon);
        assert_eq!(evaluation.expiring_soon.len(), 1);
        assert_eq!(evaluation.expiring_soon[0].id, StockLotId(1));
        assert_eq!(evaluation.status, AvailabilityStatus::Partial);
        assert_eq!(evaluation.lines[1].badge, IngredientBadge::Missing);
    }
}
