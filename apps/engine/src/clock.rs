//! Time sources for scheduling.

use std::sync::RwLock;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::db::date_utils::get_adjusted_today;

/// Source of "now" and of the current study day.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
    fn today(&self) -> NaiveDate;
}

/// Wall clock with a configurable study-day boundary.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    pub daily_reset_hour: u32,
}

impl SystemClock {
    pub fn new(daily_reset_hour: u32) -> Self {
        Self { daily_reset_hour }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        get_adjusted_today(self.daily_reset_hour)
    }
}

/// Settable clock. Time only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        match self.now.write() {
            Ok(mut guard) => *guard = now,
            Err(poisoned) => *poisoned.into_inner() = now,
        }
    }

    pub fn advance(&self, by: Duration) {
        self.set(self.now() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        match self.now.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}
