// ABOUTME: End-to-end tests for the make-recipe flow through the pantry facade
// ABOUTME: Full deduction, decision required, add-to-list and proceed-anyway branches on a seeded database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use common::{
    add_ingredient, add_lot, add_recipe, assert_quantity, create_test_database, create_test_pantry,
    test_today,
};
use larder::clock::FixedClock;
use larder::config::EngineSettings;
use larder::database::demo_data::seed_demo_data;
use larder::models::{RecipeId, RecipeRequirement};
use larder::services::{MakeRecipeOutcome, Pantry};
use larder_inventory::{AvailabilityStatus, MakeRecipeState, ShortfallChoice};
use std::sync::Arc;

#[tokio::test]
async fn test_make_fully_available_recipe_deducts() {
    let test = create_test_pantry().await.unwrap();
    let pantry = &test.pantry;
    let pasta = add_ingredient(pantry, "Spaghetti").await.unwrap();
    let eggs = add_ingredient(pantry, "Eggs").await.unwrap();
    add_lot(pantry, pasta, 500.0, "g", 100).await.unwrap();
    let first_eggs = add_lot(pantry, eggs, 2.0, "unité", 2).await.unwrap();
    let later_eggs = add_lot(pantry, eggs, 6.0, "unité", 12).await.unwrap();

    let recipe = add_recipe(
        pantry,
        "Carbonara",
        vec![
            RecipeRequirement::new(pasta, 100.0, "g"),
            RecipeRequirement::new(eggs, 1.5, "unité"),
        ],
    )
    .await
    .unwrap();

    let outcome = pantry.make_recipe(recipe, 2.0, None).await.unwrap();
    assert_eq!(outcome.state(), MakeRecipeState::Deducted);
    assert_eq!(outcome.evaluation().status, AvailabilityStatus::Full);

    let MakeRecipeOutcome::Deducted {
        report,
        proceeded_with_shortfall,
        ..
    } = outcome
    else {
        panic!("expected a deduction");
    };
    assert!(!proceeded_with_shortfall);
    assert!(report.fully_met());
    assert_eq!(report.deleted, vec![first_eggs]);

    assert_quantity(pantry.stock().total_available(pasta, "g").await, 300.0);
    assert_quantity(pantry.stock().total_available(eggs, "unité").await, 5.0);
    let snapshot = pantry.stock().snapshot().await;
    assert_quantity(snapshot.get(later_eggs).unwrap().quantity, 5.0);
}

#[tokio::test]
async fn test_shortfall_without_choice_changes_nothing() {
    let test = create_test_pantry().await.unwrap();
    let pantry = &test.pantry;
    let rice = add_ingredient(pantry, "Rice").await.unwrap();
    add_lot(pantry, rice, 100.0, "g", 30).await.unwrap();
    let recipe = add_recipe(pantry, "Risotto", vec![RecipeRequirement::new(rice, 300.0, "g")])
        .await
        .unwrap();

    let outcome = pantry.make_recipe(recipe, 1.0, None).await.unwrap();
    assert_eq!(outcome.state(), MakeRecipeState::HasShortfall);
    assert!(matches!(outcome, MakeRecipeOutcome::NeedsDecision { .. }));
    assert_eq!(outcome.evaluation().shortfalls.len(), 1);

    assert_quantity(pantry.stock().total_available(rice, "g").await, 100.0);
    assert!(pantry.shopping_list().list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_shortfall_added_to_shopping_list() {
    let test = create_test_pantry().await.unwrap();
    let pantry = &test.pantry;
    let rice = add_ingredient(pantry, "Rice").await.unwrap();
    let stock = add_ingredient(pantry, "Stock").await.unwrap();
    add_lot(pantry, rice, 100.0, "g", 30).await.unwrap();
    let recipe = add_recipe(
        pantry,
        "Risotto",
        vec![
            RecipeRequirement::new(rice, 300.0, "g"),
            RecipeRequirement::new(stock, 1.0, "l"),
        ],
    )
    .await
    .unwrap();

    let outcome = pantry
        .make_recipe(recipe, 1.0, Some(ShortfallChoice::AddToShoppingList))
        .await
        .unwrap();
    assert_eq!(outcome.state(), MakeRecipeState::AddShortfallToShoppingList);
    let MakeRecipeOutcome::AddedToShoppingList { report, .. } = &outcome else {
        panic!("expected shopping list insert");
    };
    assert_eq!(report.inserted.len(), 2);

    // Stock untouched
    assert_quantity(pantry.stock().total_available(rice, "g").await, 100.0);

    let rows = pantry.shopping_list().list().await.unwrap();
    let rice_row = rows.iter().find(|row| row.ingredient_id == rice).unwrap();
    assert_quantity(rice_row.quantity_needed, 200.0);
    assert_eq!(rice_row.source_recipe_id, Some(recipe));
    let stock_row = rows.iter().find(|row| row.ingredient_id == stock).unwrap();
    assert_quantity(stock_row.quantity_needed, 1.0);

    // Buying everything makes the recipe fully available
    pantry.shopping_list().purchase_all().await.unwrap();
    let outcome = pantry.make_recipe(recipe, 1.0, None).await.unwrap();
    assert_eq!(outcome.state(), MakeRecipeState::Deducted);
}

#[tokio::test]
async fn test_proceed_anyway_consumes_what_exists() {
    let test = create_test_pantry().await.unwrap();
    let pantry = &test.pantry;
    let flour = add_ingredient(pantry, "Flour").await.unwrap();
    let sugar = add_ingredient(pantry, "Sugar").await.unwrap();
    add_lot(pantry, flour, 120.0, "g", 50).await.unwrap();
    add_lot(pantry, sugar, 500.0, "g", 300).await.unwrap();
    let recipe = add_recipe(
        pantry,
        "Cake",
        vec![
            RecipeRequirement::new(flour, 200.0, "g"),
            RecipeRequirement::new(sugar, 100.0, "g"),
        ],
    )
    .await
    .unwrap();

    let outcome = pantry
        .make_recipe(recipe, 1.0, Some(ShortfallChoice::ProceedAnyway))
        .await
        .unwrap();
    let MakeRecipeOutcome::Deducted {
        report,
        proceeded_with_shortfall,
        ..
    } = outcome
    else {
        panic!("expected a deduction");
    };
    assert!(proceeded_with_shortfall);
    assert_eq!(report.unmet.len(), 1);
    assert_eq!(report.unmet[0].ingredient_id, flour);
    assert_quantity(report.unmet[0].missing, 80.0);

    assert_quantity(pantry.stock().total_available(flour, "g").await, 0.0);
    assert_quantity(pantry.stock().total_available(sugar, "g").await, 400.0);
    assert!(pantry.shopping_list().list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_make_unknown_recipe_fails() {
    let test = create_test_pantry().await.unwrap();
    let err = test
        .pantry
        .make_recipe(RecipeId(12), 1.0, Some(ShortfallChoice::ProceedAnyway))
        .await
        .unwrap_err();
    assert_eq!(err.code, larder::errors::ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_recipe_without_requirements_cannot_be_made() {
    let test = create_test_pantry().await.unwrap();
    let pantry = &test.pantry;
    let rice = add_ingredient(pantry, "Rice").await.unwrap();
    let lot = add_lot(pantry, rice, 300.0, "g", 20).await.unwrap();
    let water = add_recipe(pantry, "Boiled water", vec![]).await.unwrap();

    let makeable = pantry.evaluator().makeable_recipes().await.unwrap();
    assert!(makeable.iter().all(|recipe| recipe.id != water));

    for choice in [None, Some(ShortfallChoice::ProceedAnyway)] {
        let err = pantry.make_recipe(water, 1.0, choice).await.unwrap_err();
        assert_eq!(err.code, larder::errors::ErrorCode::InvalidInput);
    }

    let snapshot = pantry.stock().snapshot().await;
    assert_quantity(snapshot.get(lot).unwrap().quantity, 300.0);
    assert!(pantry.shopping_list().list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_demo_data_recipe_flow() {
    let database = create_test_database().await.unwrap();
    let summary = seed_demo_data(&database, test_today()).await.unwrap();
    assert_eq!(summary.ingredients, 12);
    assert_eq!(summary.recipes, 3);
    assert!(summary.stock_lots > 0);

    // Seeding twice does nothing
    let again = seed_demo_data(&database, test_today()).await.unwrap();
    assert!(again.is_empty());

    let clock = Arc::new(FixedClock::new(test_today()));
    let pantry = Pantry::new(database, EngineSettings::default(), clock)
        .await
        .unwrap();

    let recipes = pantry.recipes().list().await.unwrap();
    assert_eq!(recipes.len(), 3);
    assert!(recipes.iter().all(|recipe| recipe.steps.len() == 5));

    let carbonara = pantry.recipes().search("carbonara").await.unwrap();
    assert_eq!(carbonara.len(), 1);

    let view = pantry
        .evaluator()
        .evaluate_recipe(carbonara[0].id, 1.0)
        .await
        .unwrap();
    assert_eq!(view.recipe.requirements.len(), view.evaluation.lines.len());
    assert!(view
        .recipe
        .requirements
        .iter()
        .all(|requirement| view.ingredient_names.contains_key(&requirement.ingredient_id)));

    let outcome = pantry
        .make_recipe(carbonara[0].id, 1.0, Some(ShortfallChoice::AddToShoppingList))
        .await
        .unwrap();
    assert!(outcome.state().is_terminal());
}
