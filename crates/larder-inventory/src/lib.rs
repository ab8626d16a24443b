// ABOUTME: Pure inventory engine for the Larder pantry manager
// ABOUTME: Synchronous algorithms over an in-memory stock snapshot, with "today" always passed in
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Larder Inventory
//!
//! The availability and consumption engine. Everything here is a pure
//! function over a [`StockSnapshot`]: no I/O, no async, no clock access.
//! Persistence and snapshot refresh live in the main `larder` crate.
//!
//! ## Modules
//!
//! - **units**: unit string normalization shared by every quantity comparison
//! - **ledger**: aggregation, availability classification, FEFO deduction planning, expiry views
//! - **availability**: portion scaling, per-ingredient badges and "expiring soon" advisories
//! - **make_recipe**: the "make recipe" state machine

/// Unit string normalization
pub mod units;

/// Stock ledger computations over a snapshot of lots
pub mod ledger;

/// Recipe availability evaluation
pub mod availability;

/// "Make recipe" decision flow
pub mod make_recipe;

/// Engine error type
pub mod error;

pub use availability::{
    evaluate_requirements, scale_requirements, IngredientBadge, RecipeEvaluation,
    RequirementAvailability,
};
pub use error::{InventoryError, InventoryResult};
pub use ledger::{
    days_after, AvailabilityReport, AvailabilityStatus, DeductionReport, LotUpdate, Shortfall,
    StockSnapshot, UnmetRequirement,
};
pub use make_recipe::{
    plan_make_recipe, MakeRecipeEvent, MakeRecipePlan, MakeRecipeState, ShortfallChoice,
};
pub use units::normalize_unit;
