// ABOUTME: Unit tests for environment-driven configuration
// ABOUTME: Database URL parsing, engine settings from LARDER_* variables, fallbacks and validation errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use larder::config::{DatabaseUrl, EngineSettings, Environment, LarderConfig, LogLevel};
use larder::constants::env_config;
use larder::errors::ErrorCode;
use serial_test::serial;
use std::env;
use std::path::PathBuf;

const ALL_VARS: &[&str] = &[
    env_config::DATABASE_URL,
    env_config::DEFAULT_UNIT,
    env_config::EXPIRING_WITHIN_DAYS,
    env_config::URGENCY_DAYS,
    env_config::PURCHASE_SHELF_LIFE_DAYS,
    env_config::SEED_DEMO_DATA,
    env_config::LOG_LEVEL,
    "ENVIRONMENT",
];

fn clear_env() {
    for key in ALL_VARS {
        env::remove_var(key);
    }
}

#[test]
fn test_log_level_and_environment_parsing() {
    assert_eq!(LogLevel::from_str_or_default("error"), LogLevel::Error);
    assert_eq!(LogLevel::from_str_or_default("TRACE"), LogLevel::Trace);
    assert_eq!(LogLevel::from_str_or_default("loud"), LogLevel::Info);

    assert_eq!(
        Environment::from_str_or_default("PROD"),
        Environment::Production
    );
    assert_eq!(Environment::from_str_or_default("test"), Environment::Testing);
    assert_eq!(
        Environment::from_str_or_default("anything"),
        Environment::Development
    );
}

#[test]
fn test_database_url_parsing() {
    assert_eq!(DatabaseUrl::parse_url("sqlite::memory:"), DatabaseUrl::Memory);
    assert!(DatabaseUrl::parse_url("sqlite::memory:").is_memory());

    let file = DatabaseUrl::parse_url("sqlite:./data/larder.db");
    assert_eq!(
        file,
        DatabaseUrl::SQLite {
            path: PathBuf::from("./data/larder.db")
        }
    );
    assert_eq!(file.to_string(), "sqlite:./data/larder.db");

    // Bare paths and query strings
    assert_eq!(
        DatabaseUrl::parse_url("/tmp/pantry.db?mode=rwc"),
        DatabaseUrl::SQLite {
            path: PathBuf::from("/tmp/pantry.db")
        }
    );
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_env();
    let config = LarderConfig::from_env().unwrap();
    assert_eq!(config.engine, EngineSettings::default());
    assert_eq!(config.engine.default_unit, "g");
    assert_eq!(config.engine.expiring_within_days, 7);
    assert_eq!(config.engine.urgency_days, 3);
    assert_eq!(config.engine.purchase_shelf_life_days, 7);
    assert!(!config.seed_demo_data);
    assert_eq!(config.database, DatabaseUrl::default());
}

#[test]
#[serial]
fn test_values_read_from_environment() {
    clear_env();
    env::set_var(env_config::DATABASE_URL, "sqlite::memory:");
    env::set_var(env_config::DEFAULT_UNIT, " unité ");
    env::set_var(env_config::EXPIRING_WITHIN_DAYS, "14");
    env::set_var(env_config::URGENCY_DAYS, "2");
    env::set_var(env_config::PURCHASE_SHELF_LIFE_DAYS, "30");
    env::set_var(env_config::SEED_DEMO_DATA, "yes");
    env::set_var(env_config::LOG_LEVEL, "debug");
    env::set_var("ENVIRONMENT", "production");

    let config = LarderConfig::from_env().unwrap();
    clear_env();

    assert!(config.database.is_memory());
    assert_eq!(config.engine.default_unit, "unité");
    assert_eq!(config.engine.expiring_within_days, 14);
    assert_eq!(config.engine.urgency_days, 2);
    assert_eq!(config.engine.purchase_shelf_life_days, 30);
    assert!(config.seed_demo_data);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert!(config.environment.is_production());

    let summary = config.summary();
    assert!(summary.contains("sqlite::memory:"));
    assert!(summary.contains("urgency_days=2"));
}

#[test]
#[serial]
fn test_invalid_numbers_fall_back() {
    clear_env();
    env::set_var(env_config::EXPIRING_WITHIN_DAYS, "a week");
    env::set_var(env_config::PURCHASE_SHELF_LIFE_DAYS, "-3");
    env::set_var(env_config::SEED_DEMO_DATA, "maybe");

    let config = LarderConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.engine.expiring_within_days, 7);
    assert_eq!(config.engine.purchase_shelf_life_days, 7);
    assert!(!config.seed_demo_data);
}

#[test]
#[serial]
fn test_unusable_settings_rejected() {
    clear_env();
    env::set_var(env_config::DEFAULT_UNIT, "   ");
    let err = LarderConfig::from_env().unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigInvalid);
    assert!(err.message.contains(env_config::DEFAULT_UNIT));

    clear_env();
    env::set_var(env_config::URGENCY_DAYS, "0");
    let err = LarderConfig::from_env().unwrap_err();
    clear_env();
    assert_eq!(err.code, ErrorCode::ConfigInvalid);
    assert!(err.message.contains(env_config::URGENCY_DAYS));
}
