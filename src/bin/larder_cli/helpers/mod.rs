// ABOUTME: Re-exports helper modules for larder-cli
// ABOUTME: Provides access to table and report formatting utilities
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod display;
