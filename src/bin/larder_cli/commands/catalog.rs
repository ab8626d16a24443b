// ABOUTME: Unit and ingredient catalog commands for larder-cli
// ABOUTME: Lists units, lists and adds ingredients, deletes ingredients leaving their lots orphaned
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use larder::errors::{AppError, AppResult};
use larder::models::{IngredientId, NewIngredient};
use larder::services::Pantry;
use tracing::info;

use crate::helpers::display::display_header;

type Result<T> = AppResult<T>;

/// List the unit registry
pub async fn list_units(pantry: &Pantry) -> Result<()> {
    let units = pantry.units().list().await?;
    display_header("Units");
    for unit in &units {
        let marker = if unit.symbol.eq_ignore_ascii_case(pantry.units().default_symbol()) {
            "  (default)"
        } else {
            ""
        };
        println!("   {:<4} {:<10} {}{marker}", unit.id, unit.symbol, unit.name);
    }
    Ok(())
}

/// List the ingredient catalog with canonical units
pub async fn list_ingredients(pantry: &Pantry) -> Result<()> {
    let ingredients = pantry.ingredients().list().await?;
    let units = pantry.units().list().await?;

    display_header("Ingredients");
    if ingredients.is_empty() {
        println!("   (catalog is empty)");
        return Ok(());
    }
    for ingredient in &ingredients {
        let unit = ingredient
            .unit_id
            .and_then(|id| units.iter().find(|unit| unit.id == id))
            .map_or("-", |unit| unit.symbol.as_str());
        println!(
            "   {:<5} {:<30} {:<18} {unit}",
            ingredient.id, ingredient.name, ingredient.category
        );
    }
    Ok(())
}

/// Add an ingredient to the catalog
pub async fn add_ingredient(
    pantry: &Pantry,
    name: String,
    category: Option<String>,
    unit: Option<String>,
) -> Result<()> {
    let unit_id = match unit.as_deref() {
        Some(symbol) => Some(
            pantry
                .units()
                .find_by_symbol(symbol)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Unit '{symbol}'")))?
                .id,
        ),
        None => None,
    };

    let id = pantry
        .ingredients()
        .create(&NewIngredient {
            name,
            category,
            unit_id,
            ..NewIngredient::default()
        })
        .await?;

    info!(ingredient_id = %id, "Ingredient added from CLI");
    println!("Ingredient #{id} added");
    Ok(())
}

/// Delete an ingredient; its stock lots stay and show as deleted
pub async fn delete_ingredient(pantry: &Pantry, id: i64) -> Result<()> {
    if pantry.delete_ingredient(IngredientId(id)).await? {
        println!("Ingredient #{id} deleted");
    } else {
        println!("No ingredient #{id}");
    }
    Ok(())
}
