// ABOUTME: Engine service layer over the repositories and the pure inventory algorithms
// ABOUTME: Unit registry, ingredient catalog, recipe book, stock ledger, evaluator, reconciler and facade
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Engine service layer
//!
//! Each service takes its repository at construction and returns
//! [`AppResult`](crate::errors::AppResult). Availability shortfalls come back
//! as data, never as errors. [`pantry::Pantry`] wires them all together.

/// Canonical units and the default-unit sentinel
pub mod unit_registry;

/// Ingredient metadata and display names
pub mod ingredient_catalog;

/// Recipe storage and search
pub mod recipe_book;

/// In-memory stock snapshot with write-through mutations
pub mod stock_ledger;

/// Availability verdicts for recipes
pub mod recipe_evaluator;

/// Shortfalls into shopping rows, purchases into stock
pub mod shopping_list;

/// Facade wiring every service and the make-recipe flow
pub mod pantry;

pub use ingredient_catalog::IngredientCatalog;
pub use pantry::{MakeRecipeOutcome, Pantry};
pub use recipe_book::RecipeBook;
pub use recipe_evaluator::{RecipeAvailabilityView, RecipeEvaluator};
pub use shopping_list::ShoppingListReconciler;
pub use stock_ledger::StockLedger;
pub use unit_registry::UnitRegistry;
