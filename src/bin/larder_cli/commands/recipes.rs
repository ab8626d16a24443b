// ABOUTME: Recipe commands for larder-cli
// ABOUTME: Lists recipes with verdicts, shows per-ingredient availability and cooks recipes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use larder::errors::AppResult;
use larder::models::RecipeId;
use larder::services::{MakeRecipeOutcome, Pantry};
use larder_inventory::ShortfallChoice;
use tracing::info;

use crate::helpers::display::{
    display_availability, display_bulk_report, display_deduction, display_header,
};

type Result<T> = AppResult<T>;

/// List recipes with their single-portion availability
pub async fn list(pantry: &Pantry, search: Option<&str>) -> Result<()> {
    let recipes = match search {
        Some(query) => pantry.recipes().search(query).await?,
        None => pantry.recipes().list().await?,
    };

    display_header("Recipes");
    if recipes.is_empty() {
        println!("   (no recipes)");
        return Ok(());
    }
    for recipe in &recipes {
        let report = pantry
            .stock()
            .classify_availability(&recipe.requirements)
            .await;
        println!(
            "   {:<5} {:<36} {:<8} {}",
            recipe.id,
            recipe.name,
            report.status.as_str(),
            recipe.category.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

/// Recipes that can be made right now
pub async fn makeable(pantry: &Pantry) -> Result<()> {
    let recipes = pantry.evaluator().makeable_recipes().await?;
    display_header("Ready to cook");
    if recipes.is_empty() {
        println!("   (nothing can be made with the current stock)");
    }
    for recipe in &recipes {
        println!("   {:<5} {}", recipe.id, recipe.name);
    }
    Ok(())
}

/// Show a recipe's steps and availability at `portions`
pub async fn show(pantry: &Pantry, id: i64, portions: f64) -> Result<()> {
    let view = pantry
        .evaluator()
        .evaluate_recipe(RecipeId(id), portions)
        .await?;
    display_availability(&view);

    if !view.recipe.steps.is_empty() {
        println!("\n   Steps:");
        for (index, step) in view.recipe.steps.iter().enumerate() {
            println!("   {}. {step}", index + 1);
        }
    }
    Ok(())
}

/// Cook a recipe
pub async fn make(
    pantry: &Pantry,
    id: i64,
    portions: f64,
    choice: Option<ShortfallChoice>,
) -> Result<()> {
    let outcome = pantry.make_recipe(RecipeId(id), portions, choice).await?;
    info!(recipe_id = id, state = ?outcome.state(), "Make recipe finished");

    match &outcome {
        MakeRecipeOutcome::Deducted {
            report,
            proceeded_with_shortfall,
            ..
        } => {
            let names = pantry.ingredients().names().await?;
            if *proceeded_with_shortfall {
                println!("Cooked with what was available");
            } else {
                println!("Recipe #{id} cooked");
            }
            display_deduction(report, &names);
        }
        MakeRecipeOutcome::AddedToShoppingList { report, .. } => {
            println!("Stock is short; nothing was taken from stock");
            display_bulk_report(report);
        }
        MakeRecipeOutcome::NeedsDecision { .. } => {
            let view = pantry
                .evaluator()
                .evaluate_recipe(RecipeId(id), portions)
                .await?;
            display_availability(&view);
            println!("\nStock is short. Re-run with --on-shortfall add-to-list or --on-shortfall proceed");
        }
    }
    Ok(())
}

/// Delete a recipe together with the shopping rows it produced
pub async fn delete(pantry: &Pantry, id: i64) -> Result<()> {
    if pantry.delete_recipe(RecipeId(id)).await? {
        println!("Recipe #{id} deleted");
    } else {
        println!("No recipe #{id}");
    }
    Ok(())
}
