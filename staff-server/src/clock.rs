//! Source of "today"

use chrono::NaiveDate;
use std::sync::RwLock;

pub trait Clock: Send + Sync + 'static {
    fn today(&self) -> NaiveDate;
}

/// Server-local calendar date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Settable date, for tests and replays
#[derive(Debug)]
pub struct FixedClock {
    date: RwLock<NaiveDate>,
}

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date: RwLock::new(date),
        }
    }

    pub fn set(&self, date: NaiveDate) {
        *self.date.write().unwrap_or_else(|e| e.into_inner()) = date;
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        *self.date.read().unwrap_or_else(|e| e.into_inner())
    }
}
