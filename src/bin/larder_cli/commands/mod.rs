// ABOUTME: Re-exports command modules for larder-cli
// ABOUTME: Catalog, stock, recipe and shopping list commands
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod catalog;
pub mod recipes;
pub mod shopping;
pub mod stock;
