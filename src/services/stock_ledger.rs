// ABOUTME: Stock ledger service holding the in-memory lot snapshot and writing through the repository
// ABOUTME: Every mutation persists first and reloads the snapshot only after the store accepted it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Stock Ledger
//!
//! The only component that mutates lot quantities. Reads run the pure
//! algorithms from `larder_inventory` over the current [`StockSnapshot`].
//! Writes are serialized through a single writer lock, go to the store, and
//! then replace the snapshot with a fresh read. A failed write leaves the
//! snapshot exactly as it was.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use larder_core::models::{
    AnnotatedStockLot, IngredientId, NewStockLot, RecipeRequirement, StockLot, StockLotId,
    StockLotPatch, StockLotWithDetails,
};
use larder_inventory::{AvailabilityReport, DeductionReport, StockSnapshot};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::database::repositories::StockRepository;
use crate::errors::{AppError, AppResult};

/// Authoritative view of stock lots
pub struct StockLedger {
    repository: Arc<dyn StockRepository>,
    clock: Arc<dyn Clock>,
    snapshot: RwLock<Arc<StockSnapshot>>,
    writer: Mutex<()>,
    expiring_within_days: u32,
}

impl StockLedger {
    /// Build the ledger and load its first snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if the lots cannot be read
    pub async fn new(
        repository: Arc<dyn StockRepository>,
        clock: Arc<dyn Clock>,
        expiring_within_days: u32,
    ) -> AppResult<Self> {
        let lots = repository.list().await?;
        Ok(Self {
            repository,
            clock,
            snapshot: RwLock::new(Arc::new(StockSnapshot::new(lots))),
            writer: Mutex::new(()),
            expiring_within_days,
        })
    }

    /// Current calendar day according to the ledger's clock
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Current snapshot
    pub async fn snapshot(&self) -> Arc<StockSnapshot> {
        Arc::clone(&*self.snapshot.read().await)
    }

    /// Replace the snapshot with a fresh read from the store
    ///
    /// # Errors
    ///
    /// Returns an error if the lots cannot be read; the previous snapshot is kept
    pub async fn reload(&self) -> AppResult<()> {
        let lots = self.repository.list().await?;
        let fresh = Arc::new(StockSnapshot::new(lots));
        debug!(lots = fresh.len(), "Stock snapshot reloaded");
        *self.snapshot.write().await = fresh;
        Ok(())
    }

    /// Non-expired quantity per normalized unit for one ingredient
    pub async fn aggregate_by_unit(&self, ingredient_id: IngredientId) -> BTreeMap<String, f64> {
        self.snapshot()
            .await
            .aggregate_by_unit(ingredient_id, self.today())
    }

    /// Non-expired quantity of an ingredient in one unit
    pub async fn total_available(&self, ingredient_id: IngredientId, unit: &str) -> f64 {
        self.snapshot()
            .await
            .total_available(ingredient_id, unit, self.today())
    }

    /// Whether every requirement is covered; never true for an empty list
    pub async fn can_satisfy(&self, requirements: &[RecipeRequirement]) -> bool {
        self.snapshot()
            .await
            .can_satisfy(requirements, self.today())
    }

    /// Full, partial or no availability, with per-requirement shortfalls
    pub async fn classify_availability(
        &self,
        requirements: &[RecipeRequirement],
    ) -> AvailabilityReport {
        self.snapshot()
            .await
            .classify_availability(requirements, self.today())
    }

    /// Consume `requirements` from stock, earliest expiry first
    ///
    /// Whatever cannot be covered is reported in [`DeductionReport::unmet`]
    /// and otherwise ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the writes; stock is unchanged in that case
    pub async fn deduct(&self, requirements: &[RecipeRequirement]) -> AppResult<DeductionReport> {
        let _guard = self.writer.lock().await;
        let report = self
            .snapshot()
            .await
            .plan_deduction(requirements, self.today());

        if report.is_noop() {
            debug!("Deduction touched no stock lot");
        } else {
            self.repository.apply_deduction(&report).await?;
            self.reload().await?;
        }

        for unmet in &report.unmet {
            warn!(
                ingredient_id = %unmet.ingredient_id,
                unit = %unmet.unit,
                missing = unmet.missing,
                "Stock ran out before the requirement was covered"
            );
        }
        info!(
            updated = report.updated.len(),
            deleted = report.deleted.len(),
            unmet = report.unmet.len(),
            "Stock deducted"
        );
        Ok(report)
    }

    /// Lots expiring within `days` (or the configured window), earliest first
    pub async fn expiring_within(&self, days: Option<u32>) -> Vec<StockLot> {
        let days = days.unwrap_or(self.expiring_within_days);
        self.snapshot()
            .await
            .expiring_within(days, self.today())
    }

    /// Expiring lots joined with ingredient details, read from the store
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read
    pub async fn expiring_with_details(
        &self,
        days: Option<u32>,
    ) -> AppResult<Vec<StockLotWithDetails>> {
        let days = days.unwrap_or(self.expiring_within_days);
        Ok(self
            .repository
            .list_expiring_within(self.today(), days)
            .await?)
    }

    /// Whole days until a lot expires; negative once expired
    #[must_use]
    pub fn days_to_expiry(&self, lot: &StockLot) -> i64 {
        lot.days_to_expiry(self.today())
    }

    /// Every lot with its days to expiry and expired flag
    pub async fn annotated_lots(&self) -> Vec<AnnotatedStockLot> {
        self.snapshot().await.annotated_lots(self.today())
    }

    /// Every lot joined with ingredient name and category, orphans included
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read
    pub async fn list_with_details(&self) -> AppResult<Vec<StockLotWithDetails>> {
        Ok(self.repository.list_with_details().await?)
    }

    /// Put a new lot into stock
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a non-positive quantity or blank unit, or a store error
    pub async fn add_lot(&self, lot: &NewStockLot) -> AppResult<StockLotId> {
        validate_quantity(lot.quantity)?;
        validate_unit(&lot.unit)?;

        let _guard = self.writer.lock().await;
        let id = self.repository.create(lot).await?;
        self.reload().await?;
        info!(lot_id = %id, ingredient_id = %lot.ingredient_id, quantity = lot.quantity, "Stock lot added");
        Ok(id)
    }

    /// Partially update a lot
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a bad quantity or unit, `ResourceNotFound` for an unknown id
    pub async fn update_lot(&self, id: StockLotId, patch: &StockLotPatch) -> AppResult<()> {
        if let Some(quantity) = patch.quantity {
            validate_quantity(quantity)?;
        }
        if let Some(unit) = &patch.unit {
            validate_unit(unit)?;
        }

        let _guard = self.writer.lock().await;
        self.repository.update(id, patch).await?;
        self.reload().await
    }

    /// Remove a lot; an unknown id is a no-op returning `false`
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the delete
    pub async fn remove_lot(&self, id: StockLotId) -> AppResult<bool> {
        let _guard = self.writer.lock().await;
        let removed = self.repository.delete(id).await?;
        if removed {
            self.reload().await?;
        }
        Ok(removed)
    }

    /// Delete lots whose ingredient no longer exists
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the delete
    pub async fn purge_orphans(&self) -> AppResult<u64> {
        let _guard = self.writer.lock().await;
        let purged = self.repository.delete_orphans().await?;
        if purged > 0 {
            info!(purged, "Orphaned stock lots removed");
            self.reload().await?;
        }
        Ok(purged)
    }
}

fn validate_quantity(quantity: f64) -> AppResult<()> {
    if quantity.is_finite() && quantity > 0.0 {
        Ok(())
    } else {
        Err(AppError::invalid_input(format!(
            "Stock quantity must be a positive number, got {quantity}"
        )))
    }
}

fn validate_unit(unit: &str) -> AppResult<()> {
    if unit.trim().is_empty() {
        Err(AppError::invalid_input("Stock unit must not be empty"))
    } else {
        Ok(())
    }
}
