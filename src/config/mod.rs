// ABOUTME: Configuration module for the pantry engine
// ABOUTME: Environment-only configuration; no config files are read
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module
//!
//! - **Environment**: database location, engine windows, default unit sentinel

/// Environment configuration
pub mod environment;

pub use environment::{DatabaseUrl, EngineSettings, Environment, LarderConfig, LogLevel};
