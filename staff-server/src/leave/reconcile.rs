//! Status reconciliation
//!
//! `status` is a cache of "has a ledger entry for today". Every read that
//! exposes it, and every write that depends on it, reconciles first.

use chrono::NaiveDate;
use shared::models::EmployeeStatus;
use sqlx::{Executor, Sqlite};

use super::error::LeaveError;

/// Flip every "On Leave" employee without a ledger entry for `today` back to
/// "Active". Returns the number of employees updated.
///
/// Inside a transaction this UPDATE is also the first write, so it takes the
/// SQLite write lock before any read happens.
pub async fn reconcile_leave_statuses<'e, E>(db: E, today: NaiveDate) -> Result<u64, LeaveError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = shared::util::now_millis();
    let result = sqlx::query(
        "UPDATE employees SET status = ?1, updated_at = ?2 WHERE status = ?3 AND NOT EXISTS (SELECT 1 FROM leave_entries l WHERE l.employee_id = employees.id AND l.leave_date = ?4)",
    )
    .bind(EmployeeStatus::Active)
    .bind(now)
    .bind(EmployeeStatus::OnLeave)
    .bind(today)
    .execute(db)
    .await?;

    let updated = result.rows_affected();
    if updated > 0 {
        tracing::info!(updated, %today, "Reverted expired leave statuses to Active");
    }
    Ok(updated)
}
