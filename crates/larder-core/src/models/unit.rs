// ABOUTME: Unit of measure model for the unit registry
// ABOUTME: Unit identifier, human name, canonical symbol and optional description
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use super::ids::UnitId;

/// A unit of measure known to the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Unique identifier
    pub id: UnitId,
    /// Human name ("Gram")
    pub name: String,
    /// Canonical symbol ("g"), unique across the registry
    pub symbol: String,
    /// Optional description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Payload for inserting a unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUnit {
    /// Human name
    pub name: String,
    /// Canonical symbol
    pub symbol: String,
    /// Optional description
    pub description: Option<String>,
}
