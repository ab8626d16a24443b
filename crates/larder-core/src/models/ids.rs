// ABOUTME: Strongly-typed row identifiers for units, ingredients, lots, recipes and shopping rows
// ABOUTME: Thin i64 newtypes so ids of different tables cannot be mixed up
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Raw integer value as stored in the database
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Identifier of a unit in the registry
    UnitId
);
define_id!(
    /// Identifier of a catalog ingredient
    IngredientId
);
define_id!(
    /// Identifier of a stock lot
    StockLotId
);
define_id!(
    /// Identifier of a recipe
    RecipeId
);
define_id!(
    /// Identifier of a shopping-list row
    ShoppingItemId
);
