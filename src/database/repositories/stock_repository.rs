// ABOUTME: SQLite implementation of the stock lot repository
// ABOUTME: Delegates to StockManager and logs failed writes before surfacing them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::StockRepository;
use crate::database::Database;
use crate::errors::DatabaseError;
use async_trait::async_trait;
use chrono::NaiveDate;
use larder_core::models::{NewStockLot, StockLot, StockLotId, StockLotPatch, StockLotWithDetails};
use larder_inventory::DeductionReport;
use tracing::{debug, error};

/// `SQLite` implementation of `StockRepository`
pub struct StockRepositoryImpl {
    db: Database,
}

impl StockRepositoryImpl {
    /// Create a new `StockRepository` with the given database connection
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StockRepository for StockRepositoryImpl {
    async fn list(&self) -> Result<Vec<StockLot>, DatabaseError> {
        self.db.stock().list().await
    }

    async fn list_with_details(&self) -> Result<Vec<StockLotWithDetails>, DatabaseError> {
        self.db.stock().list_with_details().await
    }

    async fn create(&self, lot: &NewStockLot) -> Result<StockLotId, DatabaseError> {
        debug!(ingredient_id = %lot.ingredient_id, quantity = lot.quantity, unit = %lot.unit, "Adding stock lot");
        self.db
            .stock()
            .create(lot)
            .await
            .inspect_err(|e| error!(ingredient_id = %lot.ingredient_id, error = %e, "Stock lot create failed"))
    }

    async fn update(&self, id: StockLotId, patch: &StockLotPatch) -> Result<(), DatabaseError> {
        debug!(lot_id = %id, "Updating stock lot");
        self.db
            .stock()
            .update(id, patch)
            .await
            .inspect_err(|e| error!(lot_id = %id, error = %e, "Stock lot update failed"))
    }

    async fn delete(&self, id: StockLotId) -> Result<bool, DatabaseError> {
        let deleted = self
            .db
            .stock()
            .delete(id)
            .await
            .inspect_err(|e| error!(lot_id = %id, error = %e, "Stock lot delete failed"))?;
        if !deleted {
            debug!(lot_id = %id, "Stock lot already absent, nothing deleted");
        }
        Ok(deleted)
    }

    async fn list_expiring_within(
        &self,
        today: NaiveDate,
        days: u32,
    ) -> Result<Vec<StockLotWithDetails>, DatabaseError> {
        self.db.stock().list_expiring_within(today, days).await
    }

    async fn delete_orphans(&self) -> Result<u64, DatabaseError> {
        self.db
            .stock()
            .delete_orphans()
            .await
            .inspect_err(|e| error!(error = %e, "Orphaned stock purge failed"))
    }

    async fn apply_deduction(&self, report: &DeductionReport) -> Result<(), DatabaseError> {
        self.db
            .stock()
            .apply_deduction(report)
            .await
            .inspect_err(|e| error!(error = %e, "Stock deduction failed"))
    }
}
