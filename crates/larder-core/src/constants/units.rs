// ABOUTME: Canonical cooking units seeded into an empty unit registry
// ABOUTME: Defines the default unit sentinel symbol used instead of a numeric fallback id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Symbol of the unit used when an ingredient has no canonical unit
pub const DEFAULT_UNIT_SYMBOL: &str = "g";

/// Seed definition for a unit: (name, symbol, description)
pub type UnitSeed = (&'static str, &'static str, &'static str);

/// Units inserted when the backing store has none
pub const SEED_UNITS: &[UnitSeed] = &[
    ("Gram", "g", "Unit of mass"),
    ("Kilogram", "kg", "Kilogram"),
    ("Milliliter", "ml", "Unit of volume"),
    ("Liter", "L", "Liter"),
    ("Centiliter", "cl", "Centiliter"),
    ("Teaspoon", "cac", "Teaspoon (~5ml)"),
    ("Tablespoon", "cas", "Tablespoon (~15ml)"),
    ("Glass", "verre", "Glass (~250ml)"),
    ("Piece", "unité", "Number of items"),
    ("Pinch", "pincée", "Pinch"),
];
