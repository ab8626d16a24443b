// ABOUTME: Demo dataset of twelve ingredients and three recipes with steps
// ABOUTME: Seeding is idempotent and skipped entirely once any recipe exists
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::Database;
use crate::errors::{DatabaseError, DatabaseResult};
use chrono::{Duration, NaiveDate};
use larder_core::models::{
    Difficulty, IngredientId, NewIngredient, NewRecipe, NewStockLot, RecipeRequirement,
};
use serde::Serialize;
use std::collections::HashMap;
use tracing::info;

/// (name, category, unit symbol, kcal, protein, carbs, fat) per 100 g or per piece
type IngredientSeed = (&'static str, &'static str, &'static str, f64, f64, f64, f64);

const INGREDIENTS: &[IngredientSeed] = &[
    ("Pâtes", "Starches", "g", 131.0, 5.0, 25.0, 1.1),
    ("Lard", "Proteins", "g", 541.0, 37.0, 0.0, 43.0),
    ("Œuf", "Dairy", "unité", 155.0, 13.0, 1.1, 11.0),
    ("Fromage Parmesan", "Dairy", "g", 392.0, 38.0, 4.0, 26.0),
    ("Laitue", "Vegetables", "g", 15.0, 1.2, 2.9, 0.2),
    ("Tomate", "Fruits", "g", 18.0, 0.9, 3.9, 0.2),
    ("Anchois", "Proteins", "g", 210.0, 29.0, 0.0, 11.0),
    ("Olives", "Fruits", "g", 115.0, 1.5, 3.0, 11.0),
    ("Crème fraîche", "Dairy", "g", 340.0, 2.5, 3.0, 36.0),
    ("Champignons", "Vegetables", "g", 22.0, 3.1, 3.3, 0.3),
    ("Oignon", "Vegetables", "g", 40.0, 1.1, 9.0, 0.1),
    ("Ail", "Condiments", "g", 149.0, 6.4, 33.0, 0.5),
];

struct RecipeSeed {
    name: &'static str,
    description: &'static str,
    category: &'static str,
    difficulty: Difficulty,
    prep: u32,
    cook: u32,
    servings: u32,
    requirements: &'static [(&'static str, f64, &'static str)],
    steps: &'static [&'static str],
}

const RECIPES: &[RecipeSeed] = &[
    RecipeSeed {
        name: "Pâtes Carbonara",
        description: "Classic Italian pasta with crispy lard, eggs and parmesan",
        category: "Main course",
        difficulty: Difficulty::Medium,
        prep: 10,
        cook: 20,
        servings: 4,
        requirements: &[
            ("Pâtes", 400.0, "g"),
            ("Lard", 200.0, "g"),
            ("Œuf", 3.0, "unité"),
            ("Fromage Parmesan", 100.0, "g"),
        ],
        steps: &[
            "Bring a large pot of salted water to the boil.",
            "Cook the pasta al dente following the package timing.",
            "Meanwhile, brown the lard in a pan until crisp.",
            "Beat the eggs with the grated parmesan.",
            "Drain the pasta, toss with the lard off the heat, then stir in the egg mixture.",
        ],
    },
    RecipeSeed {
        name: "Salade Niçoise",
        description: "Fresh salad with tomatoes, anchovies, olives and eggs",
        category: "Salads",
        difficulty: Difficulty::Easy,
        prep: 15,
        cook: 0,
        servings: 2,
        requirements: &[
            ("Laitue", 200.0, "g"),
            ("Tomate", 200.0, "g"),
            ("Anchois", 100.0, "g"),
            ("Olives", 100.0, "g"),
            ("Œuf", 2.0, "unité"),
        ],
        steps: &[
            "Hard-boil the eggs for ten minutes, then cool them.",
            "Wash and dry the lettuce.",
            "Cut the tomatoes into quarters.",
            "Arrange the lettuce, tomatoes, anchovies and olives in a bowl.",
            "Add the halved eggs and dress just before serving.",
        ],
    },
    RecipeSeed {
        name: "Champignons à la Crème",
        description: "Mushrooms simmered in cream with onion and garlic",
        category: "Dishes",
        difficulty: Difficulty::Easy,
        prep: 10,
        cook: 15,
        servings: 3,
        requirements: &[
            ("Champignons", 500.0, "g"),
            ("Oignon", 1.0, "unité"),
            ("Ail", 3.0, "g"),
            ("Crème fraîche", 200.0, "g"),
        ],
        steps: &[
            "Clean and slice the mushrooms.",
            "Chop the onion and the garlic.",
            "Soften the onion and garlic in a pan.",
            "Add the mushrooms and cook until their water has evaporated.",
            "Stir in the crème fraîche and simmer for five minutes.",
        ],
    },
];

/// Lots placed in stock by the demo: (ingredient, quantity, unit, days until expiry)
const STOCK: &[(&str, f64, &str, i64)] = &[
    ("Pâtes", 500.0, "g", 180),
    ("Lard", 150.0, "g", 2),
    ("Œuf", 6.0, "unité", 10),
    ("Fromage Parmesan", 120.0, "g", 20),
    ("Laitue", 300.0, "g", 1),
    ("Tomate", 400.0, "g", 5),
    ("Champignons", 250.0, "g", 3),
    ("Oignon", 3.0, "unité", 30),
];

/// Counts of rows written by [`seed_demo_data`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DemoSeedSummary {
    /// Ingredients inserted
    pub ingredients: usize,
    /// Recipes inserted
    pub recipes: usize,
    /// Stock lots inserted
    pub stock_lots: usize,
}

impl DemoSeedSummary {
    /// Whether seeding was skipped
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ingredients == 0 && self.recipes == 0 && self.stock_lots == 0
    }
}

/// Load the demo ingredients, recipes and stock
///
/// Does nothing when any recipe already exists. Ingredients already present
/// by name are reused. Stock expiry dates are relative to `today`.
///
/// # Errors
///
/// Returns an error if a write fails
pub async fn seed_demo_data(db: &Database, today: NaiveDate) -> DatabaseResult<DemoSeedSummary> {
    let recipes = db.recipes();
    if !recipes.list().await?.is_empty() {
        info!("Recipes already present, skipping demo data");
        return Ok(DemoSeedSummary::default());
    }

    let mut summary = DemoSeedSummary::default();
    let units = db.units();
    let ingredients = db.ingredients();
    let mut ids: HashMap<&str, IngredientId> = HashMap::new();

    for (name, category, unit, calories, protein, carbs, fat) in INGREDIENTS {
        if let Some(existing) = ingredients.find_by_name(name).await? {
            ids.insert(*name, existing.id);
            continue;
        }
        let unit_id = units.find_by_symbol(unit).await?.map(|u| u.id);
        let id = ingredients
            .create(&NewIngredient {
                name: (*name).to_owned(),
                category: Some((*category).to_owned()),
                unit_id,
                calories: Some(*calories),
                protein: Some(*protein),
                carbs: Some(*carbs),
                fat: Some(*fat),
                image: None,
            })
            .await?;
        ids.insert(*name, id);
        summary.ingredients += 1;
    }

    let lookup = |name: &str| {
        ids.get(name)
            .copied()
            .ok_or_else(|| DatabaseError::not_found("ingredient", name))
    };

    for seed in RECIPES {
        let requirements = seed
            .requirements
            .iter()
            .map(|(name, quantity, unit)| Ok(RecipeRequirement::new(lookup(*name)?, *quantity, *unit)))
            .collect::<DatabaseResult<Vec<_>>>()?;

        recipes
            .create(&NewRecipe {
                name: seed.name.to_owned(),
                description: Some(seed.description.to_owned()),
                category: Some(seed.category.to_owned()),
                difficulty: Some(seed.difficulty),
                prep_time_minutes: Some(seed.prep),
                cook_time_minutes: Some(seed.cook),
                servings: Some(seed.servings),
                image: None,
                steps: seed.steps.iter().map(|s| (*s).to_owned()).collect(),
                requirements,
            })
            .await?;
        summary.recipes += 1;
    }

    let stock = db.stock();
    for (name, quantity, unit, days) in STOCK {
        stock
            .create(&NewStockLot {
                ingredient_id: lookup(*name)?,
                quantity: *quantity,
                unit: (*unit).to_owned(),
                expiry_date: today + Duration::days(*days),
            })
            .await?;
        summary.stock_lots += 1;
    }

    info!(
        ingredients = summary.ingredients,
        recipes = summary.recipes,
        stock_lots = summary.stock_lots,
        "Demo data seeded"
    );
    Ok(summary)
}
