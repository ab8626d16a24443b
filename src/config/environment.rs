// ABOUTME: Environment configuration for the pantry engine
// ABOUTME: Typed database URL, engine windows and default unit sentinel parsed from environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration

use crate::constants::{defaults, env_config, expiry, units};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;
use tracing::{info, warn};

/// Strongly typed log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational
    #[default]
    Info,
    /// Debug output
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Convert to `tracing::Level`
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }

    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        };
        write!(f, "{name}")
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production use
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe `SQLite` location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` database file
    SQLite {
        /// File path
        path: PathBuf,
    },
    /// In-memory `SQLite` (tests, throwaway runs)
    Memory,
}

impl DatabaseUrl {
    /// Parse `sqlite:<path>`, `sqlite::memory:` or a bare file path
    #[must_use]
    pub fn parse_url(s: &str) -> Self {
        let path_str = s.strip_prefix("sqlite://").or_else(|| s.strip_prefix("sqlite:")).unwrap_or(s);
        let path_str = path_str.split('?').next().unwrap_or(path_str);
        if path_str == ":memory:" {
            Self::Memory
        } else {
            Self::SQLite {
                path: PathBuf::from(path_str),
            }
        }
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::parse_url(defaults::DATABASE_URL)
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Tunables consumed by the engine services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Symbol of the unit used when an ingredient has no canonical unit
    pub default_unit: String,
    /// Default window for the expiring-stock listing
    pub expiring_within_days: u32,
    /// Window in which a required lot is flagged "expiring soon"
    pub urgency_days: u32,
    /// Expiry offset for purchased items entering stock without a date
    pub purchase_shelf_life_days: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_unit: units::DEFAULT_UNIT_SYMBOL.to_owned(),
            expiring_within_days: expiry::DEFAULT_EXPIRING_WITHIN_DAYS,
            urgency_days: expiry::DEFAULT_URGENCY_DAYS,
            purchase_shelf_life_days: expiry::DEFAULT_PURCHASE_SHELF_LIFE_DAYS,
        }
    }
}

impl EngineSettings {
    /// Reject settings the engine cannot run with
    ///
    /// # Errors
    ///
    /// Returns a `ConfigInvalid` error for an empty default unit or a zero urgency window
    pub fn validate(&self) -> AppResult<()> {
        if self.default_unit.trim().is_empty() {
            return Err(AppError::config(format!(
                "{} must not be empty",
                env_config::DEFAULT_UNIT
            )));
        }
        if self.urgency_days == 0 {
            return Err(AppError::config(format!(
                "{} must be greater than zero",
                env_config::URGENCY_DAYS
            )));
        }
        Ok(())
    }
}

/// Complete runtime configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LarderConfig {
    /// Deployment environment
    pub environment: Environment,
    /// Log level
    pub log_level: LogLevel,
    /// Database location
    pub database: DatabaseUrl,
    /// Engine tunables
    pub engine: EngineSettings,
    /// Load demo recipes and ingredients into an empty database
    pub seed_demo_data: bool,
}

impl Default for LarderConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            log_level: LogLevel::default(),
            database: DatabaseUrl::default(),
            engine: EngineSettings::default(),
            seed_demo_data: false,
        }
    }
}

impl LarderConfig {
    /// Load configuration from environment variables
    ///
    /// Unparseable numeric values fall back to their defaults with a warning.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigInvalid` error when the resulting engine settings are unusable
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        let config = Self {
            environment: Environment::from_str_or_default(&env_var_or("ENVIRONMENT", "development")),
            log_level: LogLevel::from_str_or_default(&env_var_or(env_config::LOG_LEVEL, "info")),
            database: DatabaseUrl::parse_url(&env_var_or(
                env_config::DATABASE_URL,
                defaults::DATABASE_URL,
            )),
            engine: EngineSettings {
                default_unit: env_var_or(env_config::DEFAULT_UNIT, units::DEFAULT_UNIT_SYMBOL)
                    .trim()
                    .to_owned(),
                expiring_within_days: parse_u32_or(
                    env_config::EXPIRING_WITHIN_DAYS,
                    expiry::DEFAULT_EXPIRING_WITHIN_DAYS,
                ),
                urgency_days: parse_u32_or(env_config::URGENCY_DAYS, expiry::DEFAULT_URGENCY_DAYS),
                purchase_shelf_life_days: parse_u32_or(
                    env_config::PURCHASE_SHELF_LIFE_DAYS,
                    expiry::DEFAULT_PURCHASE_SHELF_LIFE_DAYS,
                ),
            },
            seed_demo_data: parse_bool_or(env_config::SEED_DEMO_DATA, false),
        };

        config.engine.validate()?;
        Ok(config)
    }

    /// Summary for logging
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Larder configuration: environment={}, database={}, default_unit={}, \
             expiring_within_days={}, urgency_days={}, purchase_shelf_life_days={}, seed_demo_data={}",
            self.environment,
            self.database,
            self.engine.default_unit,
            self.engine.expiring_within_days,
            self.engine.urgency_days,
            self.engine.purchase_shelf_life_days,
            self.seed_demo_data
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an unsigned environment variable, warning and falling back on bad input
fn parse_u32_or(key: &str, default: u32) -> u32 {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(
                variable = key,
                value = %raw,
                default,
                "Invalid numeric configuration value, using default"
            );
            default
        }),
        Err(_) => default,
    }
}

/// Parse a boolean environment variable (`1/0`, `true/false`, `yes/no`)
fn parse_bool_or(key: &str, default: bool) -> bool {
    env::var(key).map_or(default, |raw| match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => {
            warn!(variable = key, value = %raw, "Invalid boolean configuration value, using default");
            default
        }
    })
}
