// ABOUTME: State machine for a single "make recipe" action
// ABOUTME: Evaluating, then deduct directly or branch on the user's choice when stock is short
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! "Make recipe" flow
//!
//! ```text
//! Evaluating ──► FullyAvailable ─────────────────────────────► Deducted
//!     │
//!     └────────► HasShortfall ──► ProceedAnyway ─────────────► Deducted
//!                     │
//!                     └─────────► AddShortfallToShoppingList
//! ```

use larder_core::models::RecipeRequirement;
use serde::{Deserialize, Serialize};

use crate::availability::RecipeEvaluation;
use crate::error::{InventoryError, InventoryResult};
use crate::ledger::Shortfall;

/// What the user wants when stock is short
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortfallChoice {
    /// Put the missing quantities on the shopping list and leave stock alone
    AddToShoppingList,
    /// Consume whatever is available
    ProceedAnyway,
}

impl ShortfallChoice {
    /// Parse a CLI/config value
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "add-to-list" | "add_to_list" | "add-to-shopping-list" | "shopping-list" => {
                Some(Self::AddToShoppingList)
            }
            "proceed" | "proceed-anyway" | "proceed_anyway" => Some(Self::ProceedAnyway),
            _ => None,
        }
    }
}

/// States of one "make recipe" action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MakeRecipeState {
    /// Availability is being computed
    Evaluating,
    /// Nothing is short
    FullyAvailable,
    /// At least one requirement is short; waiting for a choice
    HasShortfall,
    /// User chose to consume what is available
    ProceedAnyway,
    /// Shortfalls went to the shopping list; stock unchanged (terminal)
    AddShortfallToShoppingList,
    /// Stock was deducted (terminal)
    Deducted,
}

/// Inputs that move the flow forward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MakeRecipeEvent {
    /// Evaluation finished
    Evaluated {
        /// Whether every requirement is covered
        fully_available: bool,
    },
    /// User picked a branch
    Chose(ShortfallChoice),
    /// Deduction was persisted
    DeductionApplied,
}

impl MakeRecipeState {
    /// Apply an event, rejecting transitions the flow does not allow
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::InvalidTransition`] for any event not valid in the current state.
    pub const fn apply(self, event: MakeRecipeEvent) -> InventoryResult<Self> {
        match (self, event) {
            (Self::Evaluating, MakeRecipeEvent::Evaluated { fully_available: true }) => {
                Ok(Self::FullyAvailable)
            }
            (Self::Evaluating, MakeRecipeEvent::Evaluated { fully_available: false }) => {
                Ok(Self::HasShortfall)
            }
            (Self::HasShortfall, MakeRecipeEvent::Chose(ShortfallChoice::AddToShoppingList)) => {
                Ok(Self::AddShortfallToShoppingList)
            }
            (Self::HasShortfall, MakeRecipeEvent::Chose(ShortfallChoice::ProceedAnyway)) => {
                Ok(Self::ProceedAnyway)
            }
            (Self::FullyAvailable | Self::ProceedAnyway, MakeRecipeEvent::DeductionApplied) => {
                Ok(Self::Deducted)
            }
            (state, event) => Err(InventoryError::InvalidTransition { state, event }),
        }
    }

    /// Whether no further event is accepted
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::AddShortfallToShoppingList | Self::Deducted)
    }
}

/// Side effect the caller must perform next
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MakeRecipePlan {
    /// Deduct these scaled requirements from stock
    Deduct {
        /// State reached before deduction (`FullyAvailable` or `ProceedAnyway`)
        state: MakeRecipeState,
        /// Scaled requirements to consume
        requirements: Vec<RecipeRequirement>,
    },
    /// Insert these shortfalls into the shopping list; stock stays untouched
    AddToShoppingList {
        /// Shortfalls from the evaluation
        shortfalls: Vec<Shortfall>,
    },
    /// Stock is short and no choice was given
    NeedsDecision,
}

/// Decide the next step of a "make recipe" action from its evaluation
///
/// # Errors
///
/// Returns [`InventoryError::NoRequirements`] for a recipe without
/// requirements, matching its absence from the makeable list.
/// [`InventoryError::InvalidTransition`] cannot happen for a fresh evaluation.
pub fn plan_make_recipe(
    evaluation: &RecipeEvaluation,
    choice: Option<ShortfallChoice>,
) -> InventoryResult<MakeRecipePlan> {
    if evaluation.lines.is_empty() {
        return Err(InventoryError::NoRequirements);
    }

    let state = MakeRecipeState::Evaluating.apply(MakeRecipeEvent::Evaluated {
        fully_available: evaluation.is_fully_available(),
    })?;

    let state = match (state, choice) {
        (MakeRecipeState::HasShortfall, None) => return Ok(MakeRecipePlan::NeedsDecision),
        (MakeRecipeState::HasShortfall, Some(choice)) => state.apply(MakeRecipeEvent::Chose(choice))?,
        (state, _) => state,
    };

    Ok(match state {
        MakeRecipeState::AddShortfallToShoppingList => MakeRecipePlan::AddToShoppingList {
            shortfalls: evaluation.shortfalls.clone(),
        },
        state => MakeRecipePlan::Deduct {
            state,
            requirements: evaluation.requirements(),
        },
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::availability::evaluate_requirements;
    use crate::ledger::{AvailabilityStatus, StockSnapshot};
    use chrono::NaiveDate;
    use larder_core::models::{IngredientId, StockLot, StockLotId};

    fn evaluation(stock: f64) -> RecipeEvaluation {
        let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let snapshot = StockSnapshot::new(vec![StockLot {
            id: StockLotId(1),
            ingredient_id: IngredientId(1),
            quantity: stock,
            unit: "g".to_owned(),
            expiry_date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            added_date: None,
        }]);
        let requirements = vec![RecipeRequirement::new(IngredientId(1), 100.0, "g")];
        evaluate_requirements(&snapshot, &requirements, 2.0, today, 3).unwrap()
    }

    #[test]
    fn test_full_availability_deducts_without_choice() {
        let plan = plan_make_recipe(&evaluation(500.0), None).unwrap();
        match plan {
            MakeRecipePlan::Deduct {
                state,
                requirements,
            } => {
                assert_eq!(state, MakeRecipeState::FullyAvailable);
                assert_eq!(requirements[0].quantity, 200.0);
            }
            other => panic!("unexpected plan: {other:?}"),
        }
    }

    #[test]
    fn test_shortfall_requires_decision() {
        let evaluation = evaluation(50.0);
        assert_eq!(evaluation.status, AvailabilityStatus::Partial);
        assert_eq!(
            plan_make_recipe(&evaluation, None).unwrap(),
            MakeRecipePlan::NeedsDecision
        );
    }

    #[test]
    fn test_shortfall_branches() {
        let evaluation = evaluation(50.0);

        let add = plan_make_recipe(&evaluation, Some(ShortfallChoice::AddToShoppingList)).unwrap();
        match add {
            MakeRecipePlan::AddToShoppingList { shortfalls } => {
                assert_eq!(shortfalls[0].missing, 150.0);
            }
            other => panic!("unexpected plan: {other:?}"),
        }

        let proceed = plan_make_recipe(&evaluation, Some(ShortfallChoice::ProceedAnyway)).unwrap();
        assert!(matches!(
            proceed,
            MakeRecipePlan::Deduct {
                state: MakeRecipeState::ProceedAnyway,
                ..
            }
        ));
    }

    #[test]
    fn test_recipe_without_requirements_cannot_be_planned() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let empty = evaluate_requirements(&StockSnapshot::default(), &[], 1.0, today, 3).unwrap();
        assert!(empty.is_fully_available());

        for choice in [None, Some(ShortfallChoice::ProceedAnyway)] {
            assert_eq!(
                plan_make_recipe(&empty, choice),
                Err(InventoryError::NoRequirements)
            );
        }
    }

    #[test]
    fn test_transitions() {
        let state = MakeRecipeState::Evaluating
            .apply(MakeRecipeEvent::Evaluated {
                fully_available: true,
            })
            .unwrap();
        let done = state.apply(MakeRecipeEvent::DeductionApplied).unwrap();
        assert_eq!(done, MakeRecipeState::Deducted);
        assert!(done.is_terminal());

        let short = MakeRecipeState::Evaluating
            .apply(MakeRecipeEvent::Evaluated {
                fully_available: false,
            })
            .unwrap();
        assert!(short.apply(MakeRecipeEvent::DeductionApplied).is_err());

        let listed = short
            .apply(MakeRecipeEvent::Chose(ShortfallChoice::AddToShoppingList))
            .unwrap();
        assert!(listed.is_terminal());
        assert!(listed.apply(MakeRecipeEvent::DeductionApplied).is_err());
    }

    #[test]
    fn test_choice_parsing() {
        assert_eq!(
            ShortfallChoice::parse("add-to-list"),
            Some(ShortfallChoice::AddToShoppingList)
        );
        assert_eq!(
            ShortfallChoice::parse(" Proceed "),
            Some(ShortfallChoice::ProceedAnyway)
        );
        assert_eq!(ShortfallChoice::parse("later"), None);
    }
}
