// ABOUTME: Stock ledger computations over an immutable snapshot of stock lots
// ABOUTME: Unit-exact aggregation, availability classification, FEFO deduction planning and expiry views
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::{BTreeMap, HashMap};

use chrono::{Days, NaiveDate};
use larder_core::constants::quantities::DEPLETED_EPSILON;
use larder_core::models::{
    AnnotatedStockLot, IngredientId, RecipeRequirement, StockLot, StockLotId,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::units::{normalize_unit, units_match};

/// Overall availability of a requirement list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AvailabilityStatus {
    /// Every requirement is covered
    #[serde(rename = "FULL")]
    Full,
    /// Some requirements are short, or every one is short but some stock is on hand
    #[serde(rename = "PARTIAL")]
    Partial,
    /// Every requirement is short and none has any stock
    #[serde(rename = "NONE")]
    Unavailable,
}

impl AvailabilityStatus {
    /// Wire label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Full => "FULL",
            Self::Partial => "PARTIAL",
            Self::Unavailable => "NONE",
        }
    }
}

/// Gap between a requirement and what stock currently holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shortfall {
    /// Ingredient that is short
    pub ingredient_id: IngredientId,
    /// Quantity required
    pub quantity: f64,
    /// Requirement unit as given
    pub unit: String,
    /// Quantity available in that unit
    pub available: f64,
    /// `quantity - available`
    pub missing: f64,
}

/// Result of classifying a requirement list against stock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityReport {
    /// Overall verdict
    pub status: AvailabilityStatus,
    /// One entry per short requirement, in requirement order
    pub shortfalls: Vec<Shortfall>,
}

/// New quantity for a partially consumed lot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LotUpdate {
    /// Lot to update
    pub lot_id: StockLotId,
    /// Remaining quantity after deduction
    pub remaining: f64,
}

/// Part of a requirement that stock could not cover during deduction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmetRequirement {
    /// Ingredient that ran out
    pub ingredient_id: IngredientId,
    /// Requirement unit as given
    pub unit: String,
    /// Quantity that could not be deducted
    pub missing: f64,
}

/// Mutations needed to consume a requirement list from stock
///
/// `unmet` is informational. Deduction is best effort and never drives a
/// lot below zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeductionReport {
    /// Lots that keep a positive balance
    pub updated: Vec<LotUpdate>,
    /// Lots consumed to zero
    pub deleted: Vec<StockLotId>,
    /// Requirements that could not be fully covered
    pub unmet: Vec<UnmetRequirement>,
}

impl DeductionReport {
    /// Whether the plan touches no lot at all
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.updated.is_empty() && self.deleted.is_empty()
    }

    /// Whether every requirement was covered
    #[must_use]
    pub fn fully_met(&self) -> bool {
        self.unmet.is_empty()
    }
}

/// Immutable view of all stock lots
///
/// Built from whatever the store returned. Lots with a non-finite or negative
/// quantity are dropped at construction, so every computation below can
/// assume well-formed quantities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockSnapshot {
    lots: Vec<StockLot>,
}

impl StockSnapshot {
    /// Build a snapshot, skipping malformed lots
    #[must_use]
    pub fn new(lots: Vec<StockLot>) -> Self {
        let lots = lots
            .into_iter()
            .filter(|lot| {
                let well_formed = lot.quantity.is_finite() && lot.quantity >= 0.0;
                if !well_formed {
                    warn!(
                        lot_id = %lot.id,
                        quantity = lot.quantity,
                        "Skipping stock lot with malformed quantity"
                    );
                }
                well_formed
            })
            .collect();
        Self { lots }
    }

    /// All lots in the snapshot
    #[must_use]
    pub fn lots(&self) -> &[StockLot] {
        &self.lots
    }

    /// Number of lots
    #[must_use]
    pub fn len(&self) -> usize {
        self.lots.len()
    }

    /// Whether the snapshot holds no lot
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lots.is_empty()
    }

    /// Lot lookup by id
    #[must_use]
    pub fn get(&self, lot_id: StockLotId) -> Option<&StockLot> {
        self.lots.iter().find(|lot| lot.id == lot_id)
    }

    /// All lots of one ingredient, expired ones included
    pub fn lots_for(&self, ingredient_id: IngredientId) -> impl Iterator<Item = &StockLot> {
        self.lots
            .iter()
            .filter(move |lot| lot.ingredient_id == ingredient_id)
    }

    fn usable_lots(
        &self,
        ingredient_id: IngredientId,
        today: NaiveDate,
    ) -> impl Iterator<Item = &StockLot> {
        self.lots_for(ingredient_id)
            .filter(move |lot| !lot.is_expired_on(today))
    }

    /// Sum of non-expired quantities per normalized unit for one ingredient
    ///
    /// Keys are normalized unit strings; `"G"` and `" g "` share the `"g"` key
    /// while `"kg"` gets its own.
    #[must_use]
    pub fn aggregate_by_unit(
        &self,
        ingredient_id: IngredientId,
        today: NaiveDate,
    ) -> BTreeMap<String, f64> {
        let mut totals = BTreeMap::new();
        for lot in self.usable_lots(ingredient_id, today) {
            *totals.entry(normalize_unit(&lot.unit)).or_insert(0.0) += lot.quantity;
        }
        totals
    }

    /// Non-expired quantity of an ingredient in a unit; zero when nothing matches
    #[must_use]
    pub fn total_available(&self, ingredient_id: IngredientId, unit: &str, today: NaiveDate) -> f64 {
        self.usable_lots(ingredient_id, today)
            .filter(|lot| units_match(&lot.unit, unit))
            .map(|lot| lot.quantity)
            .sum()
    }

    /// Whether every requirement is covered
    ///
    /// An empty requirement list is never satisfiable, so a recipe without
    /// ingredients is not reported as always makeable.
    #[must_use]
    pub fn can_satisfy(&self, requirements: &[RecipeRequirement], today: NaiveDate) -> bool {
        !requirements.is_empty()
            && requirements.iter().all(|requirement| {
                self.total_available(requirement.ingredient_id, &requirement.unit, today)
                    >= requirement.quantity
            })
    }

    /// Classify a requirement list as fully, partially or not available
    ///
    /// `Full` means no shortfall. `Unavailable` means every requirement is
    /// short with nothing of it in stock. Anything in between is `Partial`.
    #[must_use]
    pub fn classify_availability(
        &self,
        requirements: &[RecipeRequirement],
        today: NaiveDate,
    ) -> AvailabilityReport {
        let shortfalls: Vec<Shortfall> = requirements
            .iter()
            .filter_map(|requirement| {
                let available =
                    self.total_available(requirement.ingredient_id, &requirement.unit, today);
                (available < requirement.quantity).then(|| Shortfall {
                    ingredient_id: requirement.ingredient_id,
                    quantity: requirement.quantity,
                    unit: requirement.unit.clone(),
                    available,
                    missing: requirement.quantity - available,
                })
            })
            .collect();

        let status = if shortfalls.is_empty() {
            AvailabilityStatus::Full
        } else if shortfalls.len() == requirements.len()
            && shortfalls.iter().all(|shortfall| shortfall.available <= 0.0)
        {
            AvailabilityStatus::Unavailable
        } else {
            AvailabilityStatus::Partial
        };

        AvailabilityReport { status, shortfalls }
    }

    /// Plan the lot mutations that consume `requirements`, earliest expiry first
    ///
    /// Candidate lots are non-expired lots of the same ingredient whose
    /// normalized unit equals the requirement's. They are consumed in expiry
    /// order (ties by lot id). Requirements are applied in order against a
    /// working balance, so two requirements for the same ingredient never
    /// consume the same quantity twice. Lots whose balance ends at or below
    /// [`DEPLETED_EPSILON`] are deleted; the rest get their new balance.
    #[must_use]
    pub fn plan_deduction(
        &self,
        requirements: &[RecipeRequirement],
        today: NaiveDate,
    ) -> DeductionReport {
        let mut balances: HashMap<StockLotId, f64> = HashMap::new();
        let mut touched: Vec<StockLotId> = Vec::new();
        let mut unmet = Vec::new();

        for requirement in requirements {
            if !(requirement.quantity.is_finite() && requirement.quantity > 0.0) {
                debug!(
                    ingredient_id = %requirement.ingredient_id,
                    quantity = requirement.quantity,
                    "Ignoring non-positive requirement during deduction"
                );
                continue;
            }

            let mut candidates: Vec<&StockLot> = self
                .usable_lots(requirement.ingredient_id, today)
                .filter(|lot| units_match(&lot.unit, &requirement.unit))
                .collect();
            candidates.sort_by(|a, b| a.expiry_date.cmp(&b.expiry_date).then(a.id.cmp(&b.id)));

            let mut remaining_need = requirement.quantity;
            for lot in candidates {
                if remaining_need <= DEPLETED_EPSILON {
                    break;
                }
                let balance = balances.entry(lot.id).or_insert(lot.quantity);
                if *balance <= DEPLETED_EPSILON {
                    continue;
                }
                let taken = remaining_need.min(*balance);
                *balance -= taken;
                remaining_need -= taken;
                if !touched.contains(&lot.id) {
                    touched.push(lot.id);
                }
            }

            if remaining_need > DEPLETED_EPSILON {
                warn!(
                    ingredient_id = %requirement.ingredient_id,
                    unit = %requirement.unit,
                    missing = remaining_need,
                    "Stock exhausted before requirement was covered"
                );
                unmet.push(UnmetRequirement {
                    ingredient_id: requirement.ingredient_id,
                    unit: requirement.unit.clone(),
                    missing: remaining_need,
                });
            }
        }

        let mut report = DeductionReport {
            unmet,
            ..DeductionReport::default()
        };
        for lot_id in touched {
            let remaining = balances.get(&lot_id).copied().unwrap_or(0.0);
            if remaining <= DEPLETED_EPSILON {
                report.deleted.push(lot_id);
            } else {
                report.updated.push(LotUpdate { lot_id, remaining });
            }
        }
        report
    }

    /// Snapshot with a deduction plan applied, for previewing its effect
    #[must_use]
    pub fn after_deduction(&self, report: &DeductionReport) -> Self {
        let lots = self
            .lots
            .iter()
            .filter(|lot| !report.deleted.contains(&lot.id))
            .map(|lot| {
                let mut lot = lot.clone();
                if let Some(update) = report.updated.iter().find(|u| u.lot_id == lot.id) {
                    lot.quantity = update.remaining;
                }
                lot
            })
            .collect();
        Self { lots }
    }

    /// Lots expiring within `[today, today + days]`, earliest first
    #[must_use]
    pub fn expiring_within(&self, days: u32, today: NaiveDate) -> Vec<StockLot> {
        let horizon = days_after(today, days);
        let mut lots: Vec<StockLot> = self
            .lots
            .iter()
            .filter(|lot| lot.expiry_date >= today && lot.expiry_date <= horizon)
            .cloned()
            .collect();
        lots.sort_by(|a, b| a.expiry_date.cmp(&b.expiry_date).then(a.id.cmp(&b.id)));
        lots
    }

    /// Every lot with its days to expiry and expired flag
    #[must_use]
    pub fn annotated_lots(&self, today: NaiveDate) -> Vec<AnnotatedStockLot> {
        self.lots
            .iter()
            .map(|lot| AnnotatedStockLot {
                lot: lot.clone(),
                days_to_expiry: lot.days_to_expiry(today),
                is_expired: lot.is_expired_on(today),
            })
            .collect()
    }
}

/// `today` moved forward by `days`, clamped to the last representable date
///
/// A window too large for the calendar therefore covers everything from
/// `today` on.
#[must_use]
pub fn days_after(today: NaiveDate, days: u32) -> NaiveDate {
    today
        .checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX)
}

/// Whole days between `today` and the lot's expiry; negative once expired
#[must_use]
pub fn days_to_expiry(lot: &StockLot, today: NaiveDate) -> i64 {
    lot.days_to_expiry(today)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn today() -> NaiveDate {
        day(10)
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

    fn req(ingredient: i64, quantity: f64, unit: &str) -> RecipeRequirement {
        RecipeRequirement::new(IngredientId(ingredient), quantity, unit)
    }

    // ========================================================================
    // Aggregation
    // ========================================================================

    #[test]
    fn test_aggregation_normalizes_units() {
        let snapshot = StockSnapshot::new(vec![
            lot(1, 1, 100.0, "G", day(20)),
            lot(2, 1, 50.0, " g", day(20)),
            lot(3, 1, 25.0, "g ", day(20)),
            lot(4, 1, 2.0, "kg", day(20)),
        ]);

        let totals = snapshot.aggregate_by_unit(IngredientId(1), today());
        assert_eq!(totals.len(), 2);
        assert_eq!(totals["g"], 175.0);
        assert_eq!(totals["kg"], 2.0);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let snapshot = StockSnapshot::new(vec![
            lot(1, 1, 100.0, "g", day(20)),
            lot(2, 1, 3.0, "unité", day(12)),
        ]);
        let first = snapshot.aggregate_by_unit(IngredientId(1), today());
        let second = snapshot.aggregate_by_unit(IngredientId(1), today());
        assert_eq!(first, second);
    }

    #[test]
    fn test_expired_lot_excluded() {
        let snapshot = StockSnapshot::new(vec![
            lot(1, 1, 100.0, "g", day(9)),
            lot(2, 1, 40.0, "g", day(10)),
        ]);
        assert_eq!(snapshot.total_available(IngredientId(1), "g", today()), 40.0);
        assert_eq!(snapshot.aggregate_by_unit(IngredientId(1), today())["g"], 40.0);
    }

    #[test]
    fn test_total_available_zero_when_nothing_matches() {
        let snapshot = StockSnapshot::new(vec![lot(1, 1, 100.0, "g", day(20))]);
        assert_eq!(snapshot.total_available(IngredientId(1), "kg", today()), 0.0);
        assert_eq!(snapshot.total_available(IngredientId(2), "g", today()), 0.0);
    }

    #[test]
    fn test_malformed_lots_skipped() {
        let snapshot = StockSnapshot::new(vec![
            lot(1, 1, f64::NAN, "g", day(20)),
            lot(2, 1, -5.0, "g", day(20)),
            lot(3, 1, 10.0, "g", day(20)),
        ]);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.total_available(IngredientId(1), "g", today()), 10.0);
    }

    // ========================================================================
    // Availability
    // ========================================================================

    #[test]
    fn test_can_satisfy_empty_is_false() {
        let snapshot = StockSnapshot::new(vec![lot(1, 1, 100.0, "g", day(20))]);
        assert!(!snapshot.can_satisfy(&[], today()));
        assert!(snapshot.can_satisfy(&[req(1, 100.0, "g")], today()));
        assert!(!snapshot.can_satisfy(&[req(1, 100.5, "g")], today()));
    }

    #[test]
    fn test_classification_statuses() {
        let snapshot = StockSnapshot::new(vec![lot(1, 1, 200.0, "g", day(20))]);

        let full = snapshot.classify_availability(&[req(1, 150.0, "g")], today());
        assert_eq!(full.status, AvailabilityStatus::Full);
        assert!(full.shortfalls.is_empty());

        let every_short =
            snapshot.classify_availability(&[req(1, 400.0, "g"), req(2, 3.0, "unité")], today());
        assert_eq!(every_short.status, AvailabilityStatus::Partial);
        assert_eq!(every_short.shortfalls.len(), 2);
        assert_eq!(every_short.shortfalls[0].missing, 200.0);
        assert_eq!(every_short.shortfalls[1].missing, 3.0);

        let nothing =
            snapshot.classify_availability(&[req(2, 3.0, "unité"), req(3, 1.0, "l")], today());
        assert_eq!(nothing.status, AvailabilityStatus::Unavailable);
        assert_eq!(nothing.shortfalls.len(), 2);

        let mixed =
            snapshot.classify_availability(&[req(1, 100.0, "g"), req(2, 3.0, "unité")], today());
        assert_eq!(mixed.status, AvailabilityStatus::Partial);
        assert_eq!(mixed.shortfalls.len(), 1);
        assert_eq!(mixed.shortfalls[0].ingredient_id, IngredientId(2));
        assert_eq!(mixed.shortfalls[0].available, 0.0);
        assert_eq!(mixed.shortfalls[0].missing, 3.0);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(AvailabilityStatus::Full.as_str(), "FULL");
        assert_eq!(AvailabilityStatus::Unavailable.as_str(), "NONE");
        assert_eq!(
            serde_json::to_string(&AvailabilityStatus::Partial).unwrap(),
            "\"PARTIAL\""
        );
    }

    // ========================================================================
    // Deduction
    // ========================================================================

    #[test]
    fn test_fefo_deduction() {
        let snapshot = StockSnapshot::new(vec![
            lot(2, 1, 200.0, "g", day(20)),
            lot(1, 1, 100.0, "g", day(11)),
        ]);

        let report = snapshot.plan_deduction(&[req(1, 150.0, "g")], today());
        assert_eq!(report.deleted, vec![StockLotId(1)]);
        assert_eq!(
            report.updated,
            vec![LotUpdate {
                lot_id: StockLotId(2),
                remaining: 150.0
            }]
        );
        assert!(report.fully_met());
    }

    #[test]
    fn test_deduction_never_goes_negative() {
        let snapshot = StockSnapshot::new(vec![
            lot(1, 1, 100.0, "g", day(11)),
            lot(2, 1, 50.0, "g", day(12)),
        ]);

        let report = snapshot.plan_deduction(&[req(1, 500.0, "g")], today());
        assert!(report.updated.is_empty());
        assert_eq!(report.deleted, vec![StockLotId(1), StockLotId(2)]);
        assert_eq!(report.unmet.len(), 1);
        assert_eq!(report.unmet[0].missing, 350.0);

        let after = snapshot.after_deduction(&report);
        assert!(after.is_empty());
    }

    #[test]
    fn test_deduction_uses_normalized_units_and_skips_expired() {
        let snapshot = StockSnapshot::new(vec![
            lot(1, 1, 100.0, " G", day(11)),
            lot(2, 1, 100.0, "g", day(5)),
            lot(3, 1, 100.0, "kg", day(11)),
        ]);

        let report = snapshot.plan_deduction(&[req(1, 60.0, "g")], today());
        assert_eq!(
            report.updated,
            vec![LotUpdate {
                lot_id: StockLotId(1),
                remaining: 40.0
            }]
        );
        assert!(report.deleted.is_empty());
    }

    #[test]
    fn test_repeated_requirements_share_balance() {
        let snapshot = StockSnapshot::new(vec![lot(1, 1, 100.0, "g", day(11))]);
        let report =
            snapshot.plan_deduction(&[req(1, 60.0, "g"), req(1, 60.0, "g")], today());
        assert_eq!(report.deleted, vec![StockLotId(1)]);
        assert_eq!(report.unmet.len(), 1);
        assert!((report.unmet[0].missing - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_equal_expiry_breaks_ties_by_id() {
        let snapshot = StockSnapshot::new(vec![
            lot(7, 1, 10.0, "g", day(11)),
            lot(3, 1, 10.0, "g", day(11)),
        ]);
        let report = snapshot.plan_deduction(&[req(1, 10.0, "g")], today());
        assert_eq!(report.deleted, vec![StockLotId(3)]);
        assert!(report.updated.is_empty());
    }

    // ========================================================================
    // Expiry views
    // ========================================================================

    #[test]
    fn test_expiring_within_inclusive_window() {
        let snapshot = StockSnapshot::new(vec![
            lot(1, 1, 1.0, "g", day(17)),
            lot(2, 1, 1.0, "g", day(10)),
            lot(3, 1, 1.0, "g", day(9)),
            lot(4, 1, 1.0, "g", day(18)),
            lot(5, 2, 1.0, "g", day(12)),
        ]);

        let ids: Vec<i64> = snapshot
            .expiring_within(7, today())
            .iter()
            .map(|lot| lot.id.get())
            .collect();
        assert_eq!(ids, vec![2, 5, 1]);
    }

    #[test]
    fn test_huge_expiry_window_covers_everything_ahead() {
        let far = NaiveDate::from_ymd_opt(9000, 1, 1).unwrap();
        let snapshot = StockSnapshot::new(vec![
            lot(1, 1, 1.0, "g", far),
            lot(2, 1, 1.0, "g", day(9)),
            lot(3, 1, 1.0, "g", day(11)),
        ]);

        let ids: Vec<i64> = snapshot
            .expiring_within(u32::MAX, today())
            .iter()
            .map(|lot| lot.id.get())
            .collect();
        assert_eq!(ids, vec![3, 1]);

        assert_eq!(days_after(today(), u32::MAX), NaiveDate::MAX);
        assert_eq!(days_after(today(), 7), day(17));
        assert!(StockSnapshot::new(vec![])
            .expiring_within(u32::MAX, today())
            .is_empty());
    }

    #[test]
    fn test_annotated_lots() {
        let snapshot = StockSnapshot::new(vec![
            lot(1, 1, 1.0, "g", day(8)),
            lot(2, 1, 1.0, "g", day(13)),
        ]);
        let annotated = snapshot.annotated_lots(today());
        assert_eq!(annotated[0].days_to_expiry, -2);
        assert!(annotated[0].is_expired);
        assert_eq!(annotated[1].days_to_expiry, 3);
        assert!(!annotated[1].is_expired);
        assert_eq!(days_to_expiry(&annotated[1].lot, today()), 3);
    }
}
