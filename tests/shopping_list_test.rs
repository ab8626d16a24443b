// ABOUTME: Integration tests for the shopping list reconciler
// ABOUTME: Shortfall round trip, bulk partial failure, purchases into stock and recipe cleanup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{
    add_ingredient, add_lot, add_recipe, assert_quantity, create_test_pantry, day, test_today,
};
use chrono::Duration;
use larder::errors::ErrorCode;
use larder::models::{NewShoppingListItem, RecipeRequirement, ShoppingItemId};
use larder_inventory::AvailabilityStatus;

#[tokio::test]
async fn test_shortfall_round_trip() {
    let test = create_test_pantry().await.unwrap();
    let pantry = &test.pantry;
    let a = add_ingredient(pantry, "Flour").await.unwrap();
    add_lot(pantry, a, 150.0, "g", 20).await.unwrap();
    let recipe_id = add_recipe(pantry, "Crêpes", vec![RecipeRequirement::new(a, 200.0, "g")])
        .await
        .unwrap();

    let view = pantry.evaluator().evaluate_recipe(recipe_id, 1.0).await.unwrap();
    assert_eq!(view.evaluation.shortfalls.len(), 1);
    assert_quantity(view.evaluation.shortfalls[0].missing, 50.0);

    let report = pantry
        .shopping_list()
        .add_shortfalls(&view.recipe, &view.evaluation.shortfalls)
        .await;
    assert!(report.is_complete());
    assert_eq!(report.inserted.len(), 1);

    let rows = pantry.shopping_list().list().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].ingredient_id, a);
    assert_quantity(rows[0].quantity_needed, 50.0);
    assert_eq!(rows[0].source_recipe_id, Some(recipe_id));
    assert_eq!(rows[0].source_recipe_name.as_deref(), Some("Crêpes"));

    let lot = pantry
        .shopping_list()
        .purchase(rows[0].id, None, Some(day(30)))
        .await
        .unwrap();
    assert!(pantry.shopping_list().list().await.unwrap().is_empty());

    let snapshot = pantry.stock().snapshot().await;
    let purchased = snapshot.get(lot).unwrap();
    assert_quantity(purchased.quantity, 50.0);
    assert_eq!(purchased.expiry_date, day(30));

    let report = pantry
        .stock()
        .classify_availability(&[RecipeRequirement::new(a, 200.0, "g")])
        .await;
    assert_eq!(report.status, AvailabilityStatus::Full);
}

#[tokio::test]
async fn test_purchase_defaults_to_shelf_life() {
    let test = create_test_pantry().await.unwrap();
    let pantry = &test.pantry;
    let a = add_ingredient(pantry, "Lemons").await.unwrap();

    let item = pantry
        .shopping_list()
        .add_one(&NewShoppingListItem::manual(a, 3.0, "unité"))
        .await
        .unwrap();
    let lot = pantry
        .shopping_list()
        .purchase(item, Some(4.0), None)
        .await
        .unwrap();

    let snapshot = pantry.stock().snapshot().await;
    let stored = snapshot.get(lot).unwrap();
    assert_quantity(stored.quantity, 4.0);
    let shelf_life = i64::from(pantry.settings().purchase_shelf_life_days);
    assert_eq!(stored.expiry_date, test_today() + Duration::days(shelf_life));
}

#[tokio::test]
async fn test_purchase_unknown_item_not_found() {
    let test = create_test_pantry().await.unwrap();
    let err = test
        .pantry
        .shopping_list()
        .purchase(ShoppingItemId(42), None, None)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_bulk_insert_reports_invalid_rows() {
    let test = create_test_pantry().await.unwrap();
    let pantry = &test.pantry;
    let a = add_ingredient(pantry, "Onions").await.unwrap();
    let b = add_ingredient(pantry, "Garlic").await.unwrap();

    let report = pantry
        .shopping_list()
        .add_bulk(&[
            NewShoppingListItem::manual(a, 2.0, "unité"),
            NewShoppingListItem::manual(b, -1.0, "gousse"),
            NewShoppingListItem::manual(b, 3.0, "gousse"),
            NewShoppingListItem::manual(a, 1.0, " "),
        ])
        .await;

    assert!(!report.is_complete());
    assert_eq!(report.inserted.len(), 2);
    let failed: Vec<_> = report.failed.iter().map(|failure| failure.index).collect();
    assert_eq!(failed, vec![1, 3]);
    assert_eq!(pantry.shopping_list().list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_rows_are_never_merged() {
    let test = create_test_pantry().await.unwrap();
    let pantry = &test.pantry;
    let a = add_ingredient(pantry, "Butter").await.unwrap();

    for _ in 0..2 {
        pantry
            .shopping_list()
            .add_one(&NewShoppingListItem::manual(a, 100.0, "g"))
            .await
            .unwrap();
    }
    assert_eq!(pantry.shopping_list().list().await.unwrap().len(), 2);

    assert_eq!(pantry.shopping_list().remove_by_ingredient(a).await.unwrap(), 2);
    assert!(pantry.shopping_list().list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_details_include_stock_on_hand() {
    let test = create_test_pantry().await.unwrap();
    let pantry = &test.pantry;
    let a = add_ingredient(pantry, "Milk").await.unwrap();
    let gone = add_ingredient(pantry, "Saffron").await.unwrap();
    add_lot(pantry, a, 0.25, "L", 3).await.unwrap();

    pantry
        .shopping_list()
        .add_one(&NewShoppingListItem::manual(a, 1.0, "l"))
        .await
        .unwrap();
    pantry
        .shopping_list()
        .add_one(&NewShoppingListItem::manual(gone, 1.0, "pincée"))
        .await
        .unwrap();
    pantry.delete_ingredient(gone).await.unwrap();

    let rows = pantry
        .shopping_list()
        .get_with_ingredient_details()
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);

    let milk = rows.iter().find(|row| row.item.ingredient_id == a).unwrap();
    assert_eq!(milk.display_name(), "Milk");
    assert_quantity(milk.in_stock, 0.25);

    let orphan = rows
        .iter()
        .find(|row| row.item.ingredient_id == gone)
        .unwrap();
    assert!(orphan.ingredient_name.is_none());
    assert_eq!(
        orphan.display_name(),
        larder_core::constants::ingredients::DELETED_INGREDIENT_PLACEHOLDER
    );
}

#[tokio::test]
async fn test_update_quantity_and_clear() {
    let test = create_test_pantry().await.unwrap();
    let pantry = &test.pantry;
    let a = add_ingredient(pantry, "Cheese").await.unwrap();
    let item = pantry
        .shopping_list()
        .add_one(&NewShoppingListItem::manual(a, 100.0, "g"))
        .await
        .unwrap();

    pantry
        .shopping_list()
        .update_quantity(item, 250.0)
        .await
        .unwrap();
    let rows = pantry.shopping_list().list().await.unwrap();
    assert_quantity(rows[0].quantity_needed, 250.0);

    let err = pantry
        .shopping_list()
        .update_quantity(item, 0.0)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    let err = pantry
        .shopping_list()
        .update_quantity(ShoppingItemId(999), 1.0)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);

    assert_eq!(pantry.shopping_list().clear_all().await.unwrap(), 1);
    assert!(!pantry.shopping_list().remove(item).await.unwrap());
}

#[tokio::test]
async fn test_delete_recipe_removes_its_rows() {
    let test = create_test_pantry().await.unwrap();
    let pantry = &test.pantry;
    let a = add_ingredient(pantry, "Anchovies").await.unwrap();
    let recipe_id = add_recipe(pantry, "Niçoise", vec![RecipeRequirement::new(a, 8.0, "unité")])
        .await
        .unwrap();

    let view = pantry.evaluator().evaluate_recipe(recipe_id, 1.0).await.unwrap();
    pantry
        .shopping_list()
        .add_shortfalls(&view.recipe, &view.evaluation.shortfalls)
        .await;
    pantry
        .shopping_list()
        .add_one(&NewShoppingListItem::manual(a, 1.0, "boîte"))
        .await
        .unwrap();

    assert!(pantry.delete_recipe(recipe_id).await.unwrap());
    let rows = pantry.shopping_list().list().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].source_recipe_id, None);
    assert!(pantry.recipes().get(recipe_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_purchase_all_moves_every_row() {
    let test = create_test_pantry().await.unwrap();
    let pantry = &test.pantry;
    let a = add_ingredient(pantry, "Potatoes").await.unwrap();
    let b = add_ingredient(pantry, "Leeks").await.unwrap();

    pantry
        .shopping_list()
        .add_bulk(&[
            NewShoppingListItem::manual(a, 1.0, "kg"),
            NewShoppingListItem::manual(b, 2.0, "unité"),
        ])
        .await;

    let lots = pantry.shopping_list().purchase_all().await.unwrap();
    assert_eq!(lots.len(), 2);
    assert!(pantry.shopping_list().list().await.unwrap().is_empty());
    assert_quantity(pantry.stock().total_available(a, "kg").await, 1.0);
    assert_quantity(pantry.stock().total_available(b, "unité").await, 2.0);
}
