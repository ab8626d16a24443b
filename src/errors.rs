// ABOUTME: Error handling entry point for the main crate
// ABOUTME: Re-exports the foundation error taxonomy so services and binaries share one error type
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling
//!
//! `DatabaseError` is returned by the persistence layer and repositories.
//! `AppError` is returned by services; every `DatabaseError` converts into it
//! with a matching `ErrorCode`.

pub use larder_core::errors::{AppError, AppResult, DatabaseError, DatabaseResult, ErrorCode};
