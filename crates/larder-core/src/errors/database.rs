// ABOUTME: Structured error types for persistence operations
// ABOUTME: NotInitialized, NotFound, ConstraintViolation and malformed-row errors with context
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::Display;

/// Errors raised by the backing store
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// The store connection has not been established or was closed
    #[error("Database not initialized")]
    NotInitialized,

    /// A lookup by id yielded nothing where a row was required
    #[error("{entity} {id} not found")]
    NotFound {
        /// Kind of record that was looked up
        entity: &'static str,
        /// Identifier that was looked up
        id: String,
    },

    /// A uniqueness or integrity constraint rejected the write
    #[error("Constraint violation on {entity}: {details}")]
    ConstraintViolation {
        /// Kind of record that was written
        entity: &'static str,
        /// Backend message
        details: String,
    },

    /// A stored row could not be decoded
    #[error("Malformed {entity} record: {details}")]
    MalformedRecord {
        /// Kind of record that was read
        entity: &'static str,
        /// What was wrong with it
        details: String,
    },

    /// Any other query failure
    #[error("Query failed: {context}")]
    QueryError {
        /// Operation and backend message
        context: String,
    },

    /// Schema migration failed
    #[error("Migration failed: {context}")]
    MigrationError {
        /// Statement and backend message
        context: String,
    },
}

impl DatabaseError {
    /// Build a `NotFound` error for the given entity and id
    pub fn not_found(entity: &'static str, id: impl Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Build a `MalformedRecord` error
    pub fn malformed(entity: &'static str, details: impl Into<String>) -> Self {
        Self::MalformedRecord {
            entity,
            details: details.into(),
        }
    }

    /// Classify a driver error raised while operating on `entity`
    #[cfg(feature = "database-errors")]
    #[must_use]
    pub fn from_sqlx(entity: &'static str, operation: &str, error: sqlx::Error) -> Self {
        use sqlx::error::ErrorKind;

        match error {
            sqlx::Error::PoolClosed => Self::NotInitialized,
            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::UniqueViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation => Self::ConstraintViolation {
                    entity,
                    details: db_err.message().to_owned(),
                },
                _ => Self::QueryError {
                    context: format!("{operation}: {}", db_err.message()),
                },
            },
            other => Self::QueryError {
                context: format!("{operation}: {other}"),
            },
        }
    }
}

/// Result type for persistence operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;
