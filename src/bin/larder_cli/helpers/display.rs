// ABOUTME: Output formatting helpers for larder-cli
// ABOUTME: Renders availability verdicts, deduction reports and lot tables on stdout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;

use larder::database::BulkInsertReport;
use larder::models::{IngredientId, StockLotWithDetails};
use larder::services::RecipeAvailabilityView;
use larder_core::constants::ingredients::DELETED_INGREDIENT_PLACEHOLDER;
use larder_inventory::DeductionReport;

/// Print a section title underlined to its width
pub fn display_header(title: &str) {
    println!("\n{title}");
    println!("{}", "=".repeat(title.chars().count()));
}

/// Quantity without trailing zeros (`2`, `0.25`)
pub fn format_quantity(quantity: f64) -> String {
    let formatted = format!("{quantity:.3}");
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_owned()
}

/// Show a recipe's verdict with one line per scaled requirement
pub fn display_availability(view: &RecipeAvailabilityView) {
    let evaluation = &view.evaluation;
    display_header(&format!(
        "#{} {} (x{})",
        view.recipe.id,
        view.recipe.name,
        format_quantity(evaluation.portions)
    ));
    println!("   Availability: {}", evaluation.status.as_str());

    for line in &evaluation.lines {
        let requirement = &line.requirement;
        println!(
            "   [{:<7}] {:<28} {:>8} / {:>8} {}{}",
            line.badge.as_str(),
            view.ingredient_name(requirement.ingredient_id),
            format_quantity(line.available),
            format_quantity(requirement.quantity),
            requirement.unit,
            if line.expiring_soon { "  (expiring soon)" } else { "" }
        );
    }

    if !evaluation.shortfalls.is_empty() {
        println!("\n   Missing:");
        for shortfall in &evaluation.shortfalls {
            println!(
                "   - {} {} {}",
                format_quantity(shortfall.missing),
                shortfall.unit,
                view.ingredient_name(shortfall.ingredient_id)
            );
        }
    }

    if evaluation.has_expiring_soon() {
        println!("\n   Use soon:");
        for lot in &evaluation.expiring_soon {
            println!(
                "   - lot #{} {} {} of {} expires {}",
                lot.id,
                format_quantity(lot.quantity),
                lot.unit,
                view.ingredient_name(lot.ingredient_id),
                lot.expiry_date
            );
        }
    }
}

/// Summarize what a deduction changed
pub fn display_deduction(report: &DeductionReport, names: &HashMap<IngredientId, String>) {
    println!(
        "\nStock updated: {} lot(s) reduced, {} lot(s) used up",
        report.updated.len(),
        report.deleted.len()
    );
    for unmet in &report.unmet {
        let name = names
            .get(&unmet.ingredient_id)
            .map_or(DELETED_INGREDIENT_PLACEHOLDER, String::as_str);
        println!(
            "   Not enough {name}: {} {} could not be taken from stock",
            format_quantity(unmet.missing),
            unmet.unit
        );
    }
}

/// Summarize a bulk shopping list insert
pub fn display_bulk_report(report: &BulkInsertReport) {
    println!("\nAdded {} item(s) to the shopping list", report.inserted.len());
    for failure in &report.failed {
        println!(
            "   Skipped item {} ({} {}): {}",
            failure.index + 1,
            format_quantity(failure.item.quantity_needed),
            failure.item.unit,
            failure.error
        );
    }
}

/// Table of lots with their ingredient and expiry
pub fn display_lots(lots: &[StockLotWithDetails], today: chrono::NaiveDate) {
    if lots.is_empty() {
        println!("   (no stock)");
        return;
    }
    println!(
        "   {:<6} {:<28} {:>10} {:<8} {:<12} {:>5}",
        "ID", "Ingredient", "Quantity", "Unit", "Expires", "Days"
    );
    for row in lots {
        let days = row.lot.days_to_expiry(today);
        println!(
            "   {:<6} {:<28} {:>10} {:<8} {:<12} {:>5}{}",
            row.lot.id,
            row.display_name(),
            format_quantity(row.lot.quantity),
            row.lot.unit,
            row.lot.expiry_date,
            days,
            if row.lot.is_expired_on(today) { "  EXPIRED" } else { "" }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_quantity_trims_zeros() {
        assert_eq!(format_quantity(2.0), "2");
        assert_eq!(format_quantity(0.25), "0.25");
        assert_eq!(format_quantity(1.5), "1.5");
        assert_eq!(format_quantity(0.0), "0");
    }
}
