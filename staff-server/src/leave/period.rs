//! Leave period windows
//!
//! A period runs from day `S` of one month to the day before `S` of the next,
//! so every calendar date belongs to exactly one period.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;
use std::fmt;

/// Closed interval `[start, end]` of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeavePeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl LeavePeriod {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for LeavePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Period containing `date` for a period-start day in `1..=28`.
pub fn period_for(date: NaiveDate, start_day: u32) -> LeavePeriod {
    debug_assert!((1..=28).contains(&start_day), "start day {start_day} out of range");

    let first_of_month = date - Days::new(u64::from(date.day0()));
    let anchor = first_of_month + Days::new(u64::from(start_day.saturating_sub(1)));
    let start = if date >= anchor {
        anchor
    } else {
        anchor - Months::new(1)
    };
    let end = start + Months::new(1) - Days::new(1);

    LeavePeriod { start, end }
}
