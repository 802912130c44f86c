//! Leave admissibility
//!
//! Quota is checked before duplicates: re-marking a recorded date while the
//! period is full reports the quota.

use chrono::NaiveDate;
use sqlx::SqliteConnection;

use super::error::LeaveError;
use super::period::{LeavePeriod, period_for};
use crate::db;

/// Injected leave rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeavePolicy {
    /// Day of month a period starts on, `1..=28`
    pub period_start_day: u32,
    /// Maximum leave days per employee per period, `>= 1`
    pub max_days_per_period: u32,
}

impl Default for LeavePolicy {
    fn default() -> Self {
        Self {
            period_start_day: 11,
            max_days_per_period: 4,
        }
    }
}

impl LeavePolicy {
    pub fn period_for(&self, date: NaiveDate) -> LeavePeriod {
        period_for(date, self.period_start_day)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admit,
    QuotaExceeded,
    Duplicate,
}

/// Pure decision over the ledger facts of one period
pub fn evaluate(policy: &LeavePolicy, count_in_period: i64, already_recorded: bool) -> Admission {
    if count_in_period >= i64::from(policy.max_days_per_period) {
        Admission::QuotaExceeded
    } else if already_recorded {
        Admission::Duplicate
    } else {
        Admission::Admit
    }
}

/// Check that `employee_id` may take leave on `leave_date`.
///
/// Runs on the caller's connection so the count and the subsequent ledger
/// write share one transaction. Returns the enclosing period when admissible.
pub async fn assert_can_mark_leave(
    conn: &mut SqliteConnection,
    policy: &LeavePolicy,
    employee_id: i64,
    leave_date: NaiveDate,
) -> Result<LeavePeriod, LeaveError> {
    let period = policy.period_for(leave_date);
    let count = db::leave::count_in_range(&mut *conn, employee_id, period.start, period.end).await?;
    let already_recorded = db::leave::exists_on(&mut *conn, employee_id, leave_date).await?;

    match evaluate(policy, count, already_recorded) {
        Admission::Admit => Ok(period),
        Admission::QuotaExceeded => {
            tracing::debug!(
                employee_id,
                %leave_date,
                %period,
                count,
                "Leave rejected: quota exceeded"
            );
            Err(LeaveError::QuotaExceeded {
                period,
                count,
                max: policy.max_days_per_period,
            })
        }
        Admission::Duplicate => {
            tracing::debug!(employee_id, %leave_date, "Leave rejected: date already recorded");
            Err(LeaveError::DuplicateDate { date: leave_date })
        }
    }
}
