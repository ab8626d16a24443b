// ABOUTME: Shopping list commands for larder-cli
// ABOUTME: Lists rows, adds a recipe's shortfalls and moves purchases into stock
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::NaiveDate;
use larder::errors::AppResult;
use larder::models::{RecipeId, ShoppingItemId};
use larder::services::Pantry;

use crate::helpers::display::{display_bulk_report, display_header, format_quantity};

type Result<T> = AppResult<T>;

/// List the shopping list with what is already in stock
pub async fn list(pantry: &Pantry) -> Result<()> {
    let rows = pantry.shopping_list().get_with_ingredient_details().await?;
    display_header("Shopping list");
    if rows.is_empty() {
        println!("   (nothing to buy)");
        return Ok(());
    }
    for row in &rows {
        println!(
            "   {:<5} {:<28} {:>8} {:<6} in stock {:>8}   {}",
            row.item.id,
            row.display_name(),
            format_quantity(row.item.quantity_needed),
            row.item.unit,
            format_quantity(row.in_stock),
            row.item.source_recipe_name.as_deref().unwrap_or("manual")
        );
    }
    Ok(())
}

/// Add a recipe's missing quantities without touching stock
pub async fn add_missing(pantry: &Pantry, recipe: i64, portions: f64) -> Result<()> {
    let view = pantry
        .evaluator()
        .evaluate_recipe(RecipeId(recipe), portions)
        .await?;
    if view.evaluation.shortfalls.is_empty() {
        println!("Everything for {} is in stock", view.recipe.name);
        return Ok(());
    }
    let report = pantry
        .shopping_list()
        .add_shortfalls(&view.recipe, &view.evaluation.shortfalls)
        .await;
    display_bulk_report(&report);
    Ok(())
}

/// Buy one row
pub async fn buy(
    pantry: &Pantry,
    item: i64,
    quantity: Option<f64>,
    expiry: Option<NaiveDate>,
) -> Result<()> {
    let lot_id = pantry
        .shopping_list()
        .purchase(ShoppingItemId(item), quantity, expiry)
        .await?;
    println!("Item #{item} bought and stored as lot #{lot_id}");
    Ok(())
}

/// Buy every row
pub async fn buy_all(pantry: &Pantry) -> Result<()> {
    let lots = pantry.shopping_list().purchase_all().await?;
    println!("{} item(s) bought and moved into stock", lots.len());
    Ok(())
}

/// Remove one row
pub async fn remove(pantry: &Pantry, item: i64) -> Result<()> {
    if pantry.shopping_list().remove(ShoppingItemId(item)).await? {
        println!("Item #{item} removed");
    } else {
        println!("No shopping list item #{item}");
    }
    Ok(())
}

/// Empty the list
pub async fn clear(pantry: &Pantry) -> Result<()> {
    let removed = pantry.shopping_list().clear_all().await?;
    println!("{removed} item(s) removed from the shopping list");
    Ok(())
}
