// ABOUTME: Core types and constants for the Larder recipe and pantry manager
// ABOUTME: Foundation crate with error handling, domain models, identifiers, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Larder Core
//!
//! Foundation crate providing shared types and constants for the Larder pantry
//! manager. This crate is designed to change infrequently, enabling incremental
//! compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `DatabaseError`
//! - **constants**: Seed units, default category, default unit sentinel, expiry windows
//! - **models**: Units, ingredients, stock lots, recipes and shopping-list rows

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (Unit, Ingredient, `StockLot`, Recipe, `ShoppingListItem`)
pub mod models;
