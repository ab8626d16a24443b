// ABOUTME: Integration tests for the stock ledger service over SQLite
// ABOUTME: Covers aggregation, expiry exclusion, FEFO deduction and snapshot reloads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{add_ingredient, add_lot, assert_quantity, create_test_pantry, day};
use larder::errors::ErrorCode;
use larder::models::{NewStockLot, RecipeRequirement, StockLotPatch};
use larder_inventory::AvailabilityStatus;

#[tokio::test]
async fn test_aggregation_merges_normalized_units() {
    let test = create_test_pantry().await.unwrap();
    let pantry = &test.pantry;
    let flour = add_ingredient(pantry, "Flour").await.unwrap();

    add_lot(pantry, flour, 100.0, "G", 5).await.unwrap();
    add_lot(pantry, flour, 50.0, " g", 5).await.unwrap();
    add_lot(pantry, flour, 25.0, "g ", 5).await.unwrap();
    add_lot(pantry, flour, 1.0, "kg", 5).await.unwrap();

    let first = pantry.stock().aggregate_by_unit(flour).await;
    let second = pantry.stock().aggregate_by_unit(flour).await;
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert_quantity(first["g"], 175.0);
    assert_quantity(first["kg"], 1.0);
    assert_quantity(pantry.stock().total_available(flour, "G").await, 175.0);
}

#[tokio::test]
async fn test_expired_lot_contributes_nothing() {
    let test = create_test_pantry().await.unwrap();
    let pantry = &test.pantry;
    let milk = add_ingredient(pantry, "Milk").await.unwrap();

    add_lot(pantry, milk, 1.0, "l", -1).await.unwrap();
    assert_quantity(pantry.stock().total_available(milk, "l").await, 0.0);
    assert!(pantry.stock().aggregate_by_unit(milk).await.is_empty());

    // Expiring today still counts
    add_lot(pantry, milk, 0.5, "l", 0).await.unwrap();
    assert_quantity(pantry.stock().total_available(milk, "l").await, 0.5);
}

#[tokio::test]
async fn test_lot_expires_when_clock_moves() {
    let test = create_test_pantry().await.unwrap();
    let pantry = &test.pantry;
    let cream = add_ingredient(pantry, "Cream").await.unwrap();
    add_lot(pantry, cream, 200.0, "ml", 2).await.unwrap();

    assert_quantity(pantry.stock().total_available(cream, "ml").await, 200.0);
    test.clock.advance(3);
    assert_quantity(pantry.stock().total_available(cream, "ml").await, 0.0);
}

#[tokio::test]
async fn test_can_satisfy_empty_requirements_is_false() {
    let test = create_test_pantry().await.unwrap();
    assert!(!test.pantry.stock().can_satisfy(&[]).await);
}

#[tokio::test]
async fn test_fefo_deduction_persists() {
    let test = create_test_pantry().await.unwrap();
    let pantry = &test.pantry;
    let rice = add_ingredient(pantry, "Rice").await.unwrap();

    let early = add_lot(pantry, rice, 100.0, "g", 1).await.unwrap();
    let late = add_lot(pantry, rice, 200.0, "g", 10).await.unwrap();

    let report = pantry
        .stock()
        .deduct(&[RecipeRequirement::new(rice, 150.0, "g")])
        .await
        .unwrap();

    assert_eq!(report.deleted, vec![early]);
    assert_eq!(report.updated.len(), 1);
    assert_eq!(report.updated[0].lot_id, late);
    assert_quantity(report.updated[0].remaining, 150.0);
    assert!(report.fully_met());

    // Both the snapshot and the store reflect the deduction
    let snapshot = pantry.stock().snapshot().await;
    assert!(snapshot.get(early).is_none());
    assert_quantity(snapshot.get(late).unwrap().quantity, 150.0);

    let stored = pantry.database().stock().get(late).await.unwrap().unwrap();
    assert_quantity(stored.quantity, 150.0);
    assert!(pantry.database().stock().get(early).await.unwrap().is_none());
}

#[tokio::test]
async fn test_deduction_never_goes_negative() {
    let test = create_test_pantry().await.unwrap();
    let pantry = &test.pantry;
    let eggs = add_ingredient(pantry, "Eggs").await.unwrap();

    add_lot(pantry, eggs, 2.0, "unité", 3).await.unwrap();
    add_lot(pantry, eggs, 1.0, "Unité ", 4).await.unwrap();

    let report = pantry
        .stock()
        .deduct(&[RecipeRequirement::new(eggs, 5.0, "unité")])
        .await
        .unwrap();

    assert_eq!(report.deleted.len(), 2);
    assert!(report.updated.is_empty());
    assert_eq!(report.unmet.len(), 1);
    assert_quantity(report.unmet[0].missing, 2.0);

    let lots = pantry.database().stock().list().await.unwrap();
    assert!(lots.iter().all(|lot| lot.quantity >= 0.0));
    assert!(lots.iter().all(|lot| lot.ingredient_id != eggs));
}

#[tokio::test]
async fn test_deduction_skips_expired_and_other_units() {
    let test = create_test_pantry().await.unwrap();
    let pantry = &test.pantry;
    let butter = add_ingredient(pantry, "Butter").await.unwrap();

    let expired = add_lot(pantry, butter, 100.0, "g", -2).await.unwrap();
    let other_unit = add_lot(pantry, butter, 1.0, "kg", 5).await.unwrap();
    let usable = add_lot(pantry, butter, 80.0, "g", 6).await.unwrap();

    let report = pantry
        .stock()
        .deduct(&[RecipeRequirement::new(butter, 30.0, "g")])
        .await
        .unwrap();

    assert!(report.deleted.is_empty());
    assert_eq!(report.updated.len(), 1);
    assert_eq!(report.updated[0].lot_id, usable);

    let snapshot = pantry.stock().snapshot().await;
    assert_quantity(snapshot.get(expired).unwrap().quantity, 100.0);
    assert_quantity(snapshot.get(other_unit).unwrap().quantity, 1.0);
    assert_quantity(snapshot.get(usable).unwrap().quantity, 50.0);
}

#[tokio::test]
async fn test_classification_statuses_against_store() {
    let test = create_test_pantry().await.unwrap();
    let pantry = &test.pantry;
    let pasta = add_ingredient(pantry, "Pasta").await.unwrap();
    let bacon = add_ingredient(pantry, "Bacon").await.unwrap();
    add_lot(pantry, pasta, 500.0, "g", 30).await.unwrap();

    let full = pantry
        .stock()
        .classify_availability(&[RecipeRequirement::new(pasta, 400.0, "g")])
        .await;
    assert_eq!(full.status, AvailabilityStatus::Full);
    assert!(full.shortfalls.is_empty());

    let partial = pantry
        .stock()
        .classify_availability(&[
            RecipeRequirement::new(pasta, 400.0, "g"),
            RecipeRequirement::new(bacon, 150.0, "g"),
        ])
        .await;
    assert_eq!(partial.status, AvailabilityStatus::Partial);
    assert_eq!(partial.shortfalls.len(), 1);

    let none = pantry
        .stock()
        .classify_availability(&[RecipeRequirement::new(bacon, 150.0, "g")])
        .await;
    assert_eq!(none.status, AvailabilityStatus::Unavailable);
    assert_eq!(none.shortfalls.len(), 1);
}

#[tokio::test]
async fn test_add_lot_rejects_bad_input() {
    let test = create_test_pantry().await.unwrap();
    let pantry = &test.pantry;
    let salt = add_ingredient(pantry, "Salt").await.unwrap();

    let err = add_lot(pantry, salt, 0.0, "g", 10).await.unwrap_err();
    let err = err.downcast::<larder::errors::AppError>().unwrap();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    let err = add_lot(pantry, salt, 5.0, "   ", 10).await.unwrap_err();
    let err = err.downcast::<larder::errors::AppError>().unwrap();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    assert!(pantry.stock().snapshot().await.is_empty());
}

#[tokio::test]
async fn test_update_and_remove_lot_refresh_snapshot() {
    let test = create_test_pantry().await.unwrap();
    let pantry = &test.pantry;
    let oil = add_ingredient(pantry, "Olive oil").await.unwrap();
    let lot = add_lot(pantry, oil, 0.5, "l", 90).await.unwrap();

    pantry
        .stock()
        .update_lot(lot, &StockLotPatch::quantity(0.75))
        .await
        .unwrap();
    assert_quantity(pantry.stock().total_available(oil, "l").await, 0.75);

    assert!(pantry.stock().remove_lot(lot).await.unwrap());
    assert!(!pantry.stock().remove_lot(lot).await.unwrap());
    assert_quantity(pantry.stock().total_available(oil, "l").await, 0.0);

    let err = pantry
        .stock()
        .update_lot(lot, &StockLotPatch::quantity(1.0))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_expiring_within_window() {
    let test = create_test_pantry().await.unwrap();
    let pantry = &test.pantry;
    let herbs = add_ingredient(pantry, "Parsley").await.unwrap();

    let soon = add_lot(pantry, herbs, 1.0, "botte", 2).await.unwrap();
    let today_lot = add_lot(pantry, herbs, 1.0, "botte", 0).await.unwrap();
    add_lot(pantry, herbs, 1.0, "botte", 9).await.unwrap();
    add_lot(pantry, herbs, 1.0, "botte", -1).await.unwrap();

    let expiring = pantry.stock().expiring_within(Some(3)).await;
    let ids: Vec<_> = expiring.iter().map(|lot| lot.id).collect();
    assert_eq!(ids, vec![today_lot, soon]);

    let detailed = pantry.stock().expiring_with_details(Some(3)).await.unwrap();
    assert_eq!(detailed.len(), 2);
    assert_eq!(detailed[0].display_name(), "Parsley");

    let annotated = pantry.stock().annotated_lots().await;
    assert_eq!(annotated.len(), 4);
    assert_eq!(annotated.iter().filter(|lot| lot.is_expired).count(), 1);
    assert_eq!(
        pantry.stock().days_to_expiry(&expiring[1]),
        (day(2) - day(0)).num_days()
    );
}

#[tokio::test]
async fn test_unbounded_expiry_window_lists_all_future_lots() {
    let test = create_test_pantry().await.unwrap();
    let pantry = &test.pantry;
    let honey = add_ingredient(pantry, "Honey").await.unwrap();

    let near = add_lot(pantry, honey, 1.0, "pot", 5).await.unwrap();
    let far = add_lot(pantry, honey, 1.0, "pot", 3000).await.unwrap();
    add_lot(pantry, honey, 1.0, "pot", -4).await.unwrap();

    let ids: Vec<_> = pantry
        .stock()
        .expiring_within(Some(u32::MAX))
        .await
        .iter()
        .map(|lot| lot.id)
        .collect();
    assert_eq!(ids, vec![near, far]);

    let detailed = pantry
        .stock()
        .expiring_with_details(Some(u32::MAX))
        .await
        .unwrap();
    let ids: Vec<_> = detailed.iter().map(|lot| lot.lot.id).collect();
    assert_eq!(ids, vec![near, far]);
}

#[tokio::test]
async fn test_failed_writes_leave_snapshot_untouched() {
    let test = create_test_pantry().await.unwrap();
    let pantry = &test.pantry;
    let rice = add_ingredient(pantry, "Rice").await.unwrap();
    let lot = add_lot(pantry, rice, 100.0, "g", 10).await.unwrap();

    pantry.database().close().await;

    let err = pantry
        .stock()
        .deduct(&[RecipeRequirement::new(rice, 40.0, "g")])
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::StorageUnavailable);
    assert_quantity(pantry.stock().total_available(rice, "g").await, 100.0);

    let err = pantry
        .stock()
        .add_lot(&NewStockLot {
            ingredient_id: rice,
            quantity: 50.0,
            unit: "g".to_owned(),
            expiry_date: day(20),
        })
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::StorageUnavailable);
    assert_quantity(pantry.stock().total_available(rice, "g").await, 100.0);

    assert!(pantry.stock().remove_lot(lot).await.is_err());
    assert!(pantry.stock().update_lot(lot, &StockLotPatch::quantity(1.0)).await.is_err());

    let snapshot = pantry.stock().snapshot().await;
    assert_eq!(snapshot.len(), 1);
    assert_quantity(snapshot.get(lot).unwrap().quantity, 100.0);
}

#[tokio::test]
async fn test_deleted_ingredient_leaves_orphaned_lots() {
    let test = create_test_pantry().await.unwrap();
    let pantry = &test.pantry;
    let tuna = add_ingredient(pantry, "Tuna").await.unwrap();
    add_lot(pantry, tuna, 2.0, "boîte", 200).await.unwrap();

    assert!(pantry.delete_ingredient(tuna).await.unwrap());

    let lots = pantry.stock().list_with_details().await.unwrap();
    assert_eq!(lots.len(), 1);
    assert!(lots[0].is_orphaned());
    assert_eq!(
        lots[0].display_name(),
        larder_core::constants::ingredients::DELETED_INGREDIENT_PLACEHOLDER
    );

    assert_eq!(pantry.stock().purge_orphans().await.unwrap(), 1);
    assert!(pantry.stock().snapshot().await.is_empty());
}
