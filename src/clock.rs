// ABOUTME: Source of "today" for the engine services
// ABOUTME: SystemClock reads the local calendar date; FixedClock pins it for tests and replays
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{Datelike, Duration, Local, NaiveDate};
use std::sync::atomic::{AtomicI32, Ordering};

/// Supplies the current calendar day
pub trait Clock: Send + Sync {
    /// Today's date, with no time component
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock that only moves when told to
#[derive(Debug)]
pub struct FixedClock {
    days_from_ce: AtomicI32,
}

impl FixedClock {
    /// Pin the clock to `date`
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self {
            days_from_ce: AtomicI32::new(date.num_days_from_ce()),
        }
    }

    /// Move the clock to `date`
    pub fn set(&self, date: NaiveDate) {
        self.days_from_ce
            .store(date.num_days_from_ce(), Ordering::SeqCst);
    }

    /// Move the clock forward (or back, for negative values) by whole days
    pub fn advance(&self, days: i64) {
        let next = self.today() + Duration::days(days);
        self.set(next);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        let days = self.days_from_ce.load(Ordering::SeqCst);
        NaiveDate::from_num_days_from_ce_opt(days).unwrap_or(NaiveDate::MIN)
    }
}
