// ABOUTME: SQLite implementation of the shopping list repository
// ABOUTME: Delegates to ShoppingListManager and logs failed writes before surfacing them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::ShoppingListRepository;
use crate::database::{BulkInsertReport, Database};
use crate::errors::DatabaseError;
use async_trait::async_trait;
use larder_core::models::{
    IngredientId, NewShoppingListItem, RecipeId, ShoppingItemId, ShoppingListItem,
    ShoppingListItemPatch, ShoppingListItemWithDetails,
};
use tracing::{debug, error};

/// `SQLite` implementation of `ShoppingListRepository`
pub struct ShoppingListRepositoryImpl {
    db: Database,
}

impl ShoppingListRepositoryImpl {
    /// Create a new `ShoppingListRepository` with the given database connection
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ShoppingListRepository for ShoppingListRepositoryImpl {
    async fn list(&self) -> Result<Vec<ShoppingListItem>, DatabaseError> {
        self.db.shopping_list().list().await
    }

    async fn list_with_ingredient_details(
        &self,
    ) -> Result<Vec<ShoppingListItemWithDetails>, DatabaseError> {
        self.db.shopping_list().list_with_details().await
    }

    async fn get_by_id(&self, id: ShoppingItemId) -> Result<Option<ShoppingListItem>, DatabaseError> {
        self.db.shopping_list().get(id).await
    }

    async fn create(&self, item: &NewShoppingListItem) -> Result<ShoppingItemId, DatabaseError> {
        self.db
            .shopping_list()
            .create(item)
            .await
            .inspect_err(|e| error!(ingredient_id = %item.ingredient_id, error = %e, "Shopping list create failed"))
    }

    async fn create_bulk(&self, items: &[NewShoppingListItem]) -> BulkInsertReport {
        debug!(count = items.len(), "Bulk inserting shopping list items");
        self.db.shopping_list().create_bulk(items).await
    }

    async fn update(
        &self,
        id: ShoppingItemId,
        patch: &ShoppingListItemPatch,
    ) -> Result<(), DatabaseError> {
        self.db
            .shopping_list()
            .update(id, patch)
            .await
            .inspect_err(|e| error!(item_id = %id, error = %e, "Shopping list update failed"))
    }

    async fn delete(&self, id: ShoppingItemId) -> Result<bool, DatabaseError> {
        let deleted = self
            .db
            .shopping_list()
            .delete(id)
            .await
            .inspect_err(|e| error!(item_id = %id, error = %e, "Shopping list delete failed"))?;
        if !deleted {
            debug!(item_id = %id, "Shopping list item already absent, nothing deleted");
        }
        Ok(deleted)
    }

    async fn delete_by_ingredient(&self, ingredient_id: IngredientId) -> Result<u64, DatabaseError> {
        self.db.shopping_list().delete_by_ingredient(ingredient_id).await
    }

    async fn delete_by_source_recipe(&self, recipe_id: RecipeId) -> Result<u64, DatabaseError> {
        self.db.shopping_list().delete_by_source_recipe(recipe_id).await
    }

    async fn clear(&self) -> Result<u64, DatabaseError> {
        self.db.shopping_list().clear().await
    }
}
