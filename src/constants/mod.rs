// ABOUTME: Application constants re-exported from the foundation crate
// ABOUTME: Seed units, categories, expiry windows, environment variable names and defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use larder_core::constants::*;
