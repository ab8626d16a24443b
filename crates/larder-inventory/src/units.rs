// ABOUTME: Unit string normalization used by aggregation, availability and deduction alike
// ABOUTME: Trim plus lowercase; no conversion between different units is ever attempted
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Normalize a unit string for comparison
///
/// `" G "` and `"g"` both become `"g"`. `"kg"` stays `"kg"`: units are matched
/// exactly after normalization and never converted.
#[must_use]
pub fn normalize_unit(unit: &str) -> String {
    unit.trim().to_lowercase()
}

/// Whether two unit strings are equal after normalization
#[must_use]
pub fn units_match(left: &str, right: &str) -> bool {
    left.trim().to_lowercase() == right.trim().to_lowercase()
}
