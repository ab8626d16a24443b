// ABOUTME: Stock lot commands for larder-cli
// ABOUTME: Lists, adds and removes lots, shows expiring stock and purges orphaned lots
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::NaiveDate;
use larder::errors::{AppError, AppResult};
use larder::models::{IngredientId, NewStockLot, StockLotId};
use larder::services::Pantry;

use crate::helpers::display::{display_header, display_lots, format_quantity};

type Result<T> = AppResult<T>;

/// List every lot, orphans included
pub async fn list(pantry: &Pantry) -> Result<()> {
    let lots = pantry.stock().list_with_details().await?;
    display_header("Stock");
    display_lots(&lots, pantry.stock().today());
    Ok(())
}

/// Add a lot; the unit defaults to the ingredient's canonical unit, then the default unit
pub async fn add(
    pantry: &Pantry,
    ingredient: i64,
    quantity: f64,
    unit: Option<String>,
    expiry: NaiveDate,
) -> Result<()> {
    let ingredient_id = IngredientId(ingredient);
    let found = pantry
        .ingredients()
        .get(ingredient_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Ingredient {ingredient_id}")))?;

    let unit = match unit {
        Some(unit) => unit,
        None => match found.unit_id {
            Some(unit_id) => match pantry.units().find_by_id(unit_id).await? {
                Some(unit) => unit.symbol,
                None => pantry.units().default_unit().await?.symbol,
            },
            None => pantry.units().default_unit().await?.symbol,
        },
    };

    let id = pantry
        .stock()
        .add_lot(&NewStockLot {
            ingredient_id,
            quantity,
            unit: unit.clone(),
            expiry_date: expiry,
        })
        .await?;

    println!(
        "Lot #{id} added: {} {unit} of {} expiring {expiry}",
        format_quantity(quantity),
        found.name
    );
    Ok(())
}

/// Remove a lot
pub async fn remove(pantry: &Pantry, id: i64) -> Result<()> {
    if pantry.stock().remove_lot(StockLotId(id)).await? {
        println!("Lot #{id} removed");
    } else {
        println!("No lot #{id}");
    }
    Ok(())
}

/// Lots expiring within `days`, earliest first
pub async fn expiring(pantry: &Pantry, days: Option<u32>) -> Result<()> {
    let window = days.unwrap_or(pantry.settings().expiring_within_days);
    let lots = pantry.stock().expiring_with_details(Some(window)).await?;
    display_header(&format!("Expiring within {window} day(s)"));
    display_lots(&lots, pantry.stock().today());
    Ok(())
}

/// Delete lots whose ingredient is gone
pub async fn purge_orphans(pantry: &Pantry) -> Result<()> {
    let purged = pantry.stock().purge_orphans().await?;
    println!("{purged} orphaned lot(s) removed");
    Ok(())
}
