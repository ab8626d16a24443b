// ABOUTME: Error type for invalid engine inputs and illegal make-recipe transitions
// ABOUTME: Availability shortfalls are data, never errors, so this enum stays small
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use larder_core::errors::AppError;
use thiserror::Error;

use crate::make_recipe::{MakeRecipeEvent, MakeRecipeState};

/// Errors raised by the inventory engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InventoryError {
    /// Portion multiplier is not a finite positive number
    #[error("Invalid portion multiplier: {0} (must be finite and greater than zero)")]
    InvalidPortions(f64),

    /// Recipe has nothing to consume, so it cannot be made
    #[error("Recipe has no ingredient requirements")]
    NoRequirements,

    /// Event not allowed in the current make-recipe state
    #[error("Cannot apply {event:?} while {state:?}")]
    InvalidTransition {
        /// State the flow was in
        state: MakeRecipeState,
        /// Rejected event
        event: MakeRecipeEvent,
    },
}

/// Result alias for engine operations
pub type InventoryResult<T> = Result<T, InventoryError>;

impl From<InventoryError> for AppError {
    fn from(error: InventoryError) -> Self {
        match error {
            InventoryError::InvalidPortions(_) | InventoryError::NoRequirements => {
                Self::invalid_input(error.to_string())
            }
            InventoryError::InvalidTransition { .. } => Self::internal(error.to_string()),
        }
    }
}
