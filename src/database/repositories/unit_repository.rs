// ABOUTME: SQLite implementation of the unit registry repository
// ABOUTME: Delegates to UnitManager over the shared connection pool
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::UnitRepository;
use crate::database::Database;
use crate::errors::DatabaseError;
use async_trait::async_trait;
use larder_core::models::{Unit, UnitId};

/// `SQLite` implementation of `UnitRepository`
pub struct UnitRepositoryImpl {
    db: Database,
}

impl UnitRepositoryImpl {
    /// Create a new `UnitRepository` with the given database connection
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UnitRepository for UnitRepositoryImpl {
    async fn list(&self) -> Result<Vec<Unit>, DatabaseError> {
        self.db.units().list().await
    }

    async fn find_by_id(&self, id: UnitId) -> Result<Option<Unit>, DatabaseError> {
        self.db.units().get(id).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Unit>, DatabaseError> {
        self.db.units().find_by_name(name).await
    }

    async fn find_by_symbol(&self, symbol: &str) -> Result<Option<Unit>, DatabaseError> {
        self.db.units().find_by_symbol(symbol).await
    }
}
