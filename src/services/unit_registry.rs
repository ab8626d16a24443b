// ABOUTME: Unit registry service over the unit repository
// ABOUTME: Symbol lookups and resolution of the configured default-unit sentinel
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use crate::database::repositories::UnitRepository;
use crate::errors::{AppError, AppResult};
use larder_core::models::{Unit, UnitId};
use tracing::warn;

/// Read access to units plus the default-unit sentinel
pub struct UnitRegistry {
    repository: Arc<dyn UnitRepository>,
    default_symbol: String,
}

impl UnitRegistry {
    /// Create a registry that resolves `default_symbol` as the default unit
    pub fn new(repository: Arc<dyn UnitRepository>, default_symbol: impl Into<String>) -> Self {
        Self {
            repository,
            default_symbol: default_symbol.into(),
        }
    }

    /// Configured default unit symbol
    #[must_use]
    pub fn default_symbol(&self) -> &str {
        &self.default_symbol
    }

    /// All units ordered by id
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read
    pub async fn list(&self) -> AppResult<Vec<Unit>> {
        Ok(self.repository.list().await?)
    }

    /// Unit by id
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read
    pub async fn find_by_id(&self, id: UnitId) -> AppResult<Option<Unit>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Unit by human name, case-insensitive
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Unit>> {
        Ok(self.repository.find_by_name(name).await?)
    }

    /// Unit by symbol, after trimming and lowercasing both sides
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read
    pub async fn find_by_symbol(&self, symbol: &str) -> AppResult<Option<Unit>> {
        Ok(self.repository.find_by_symbol(symbol).await?)
    }

    /// Resolve the default unit
    ///
    /// Falls back to the first registered unit when the configured symbol is
    /// unknown.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when the registry is empty
    pub async fn default_unit(&self) -> AppResult<Unit> {
        if let Some(unit) = self.find_by_symbol(&self.default_symbol).await? {
            return Ok(unit);
        }

        let fallback = self
            .list()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::not_found("Default unit"))?;
        warn!(
            configured = %self.default_symbol,
            fallback = %fallback.symbol,
            "Configured default unit is not registered, using first unit"
        );
        Ok(fallback)
    }
}
