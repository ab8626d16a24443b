// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Seed units, ingredient categories, sentinels, and expiry windows for the pantry engine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Pure data constants grouped by domain. Runtime-tunable values (expiry
//! windows, default unit) have their defaults here and are overridden by
//! environment configuration in the main crate.

/// Canonical cooking units seeded into an empty unit registry
pub mod units;

/// Ingredient catalog constants
pub mod ingredients {
    /// Category assigned to ingredients created without one
    pub const DEFAULT_CATEGORY: &str = "Other";

    /// Display placeholder for references to an ingredient that no longer exists
    pub const DELETED_INGREDIENT_PLACEHOLDER: &str = "deleted ingredient";

    /// Categories offered by the catalog
    pub const CATEGORIES: &[&str] = &[
        "Fruits",
        "Vegetables",
        "Proteins",
        "Dairy",
        "Starches",
        "Condiments",
        DEFAULT_CATEGORY,
    ];
}

/// Recipe constants
pub mod recipes {
    /// Recipe categories offered by the catalog
    pub const CATEGORIES: &[&str] = &[
        "Starter",
        "Main course",
        "Dishes",
        "Salads",
        "Dessert",
        "Drink",
        "Sauce",
    ];
}

/// Stock expiry windows (in days)
pub mod expiry {
    /// Window for the "expiring stock" listing
    pub const DEFAULT_EXPIRING_WITHIN_DAYS: u32 = 7;

    /// Window in which a required lot is flagged as "expiring soon"
    pub const DEFAULT_URGENCY_DAYS: u32 = 3;

    /// Shelf life given to purchased shopping items when no expiry is supplied
    pub const DEFAULT_PURCHASE_SHELF_LIFE_DAYS: u32 = 7;
}

/// Quantity arithmetic tolerances
pub mod quantities {
    /// Lots whose remaining balance falls at or below this value are deleted
    pub const DEPLETED_EPSILON: f64 = 1e-9;
}

/// Environment variable names read by the configuration layer
pub mod env_config {
    /// Database connection URL
    pub const DATABASE_URL: &str = "LARDER_DATABASE_URL";
    /// Default unit sentinel symbol
    pub const DEFAULT_UNIT: &str = "LARDER_DEFAULT_UNIT";
    /// Expiring listing window
    pub const EXPIRING_WITHIN_DAYS: &str = "LARDER_EXPIRING_WITHIN_DAYS";
    /// Evaluator urgency window
    pub const URGENCY_DAYS: &str = "LARDER_URGENCY_DAYS";
    /// Purchase shelf life
    pub const PURCHASE_SHELF_LIFE_DAYS: &str = "LARDER_PURCHASE_SHELF_LIFE_DAYS";
    /// Seed demo data on first start
    pub const SEED_DEMO_DATA: &str = "LARDER_SEED_DEMO_DATA";
    /// Log level override
    pub const LOG_LEVEL: &str = "LARDER_LOG_LEVEL";
}

/// Default values for configuration
pub mod defaults {
    /// Default `SQLite` database location
    pub const DATABASE_URL: &str = "sqlite:./data/larder.db";
}

/// Service names used in structured logs
pub mod service_names {
    /// Main service name
    pub const LARDER: &str = "larder";
}
