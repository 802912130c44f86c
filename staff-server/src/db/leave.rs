//! Leave Ledger Repository
//!
//! One row per `(employee_id, leave_date)`; dates are stored as `YYYY-MM-DD`
//! text so range predicates compare lexicographically.

use super::RepoResult;
use chrono::NaiveDate;
use shared::models::LeaveEntry;
use sqlx::{Executor, Sqlite};

/// Record a leave day. Returns `false` when the pair was already recorded.
pub async fn record_leave<'e, E>(db: E, employee_id: i64, leave_date: NaiveDate) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "INSERT INTO leave_entries (employee_id, leave_date, created_at) VALUES (?1, ?2, ?3) ON CONFLICT (employee_id, leave_date) DO NOTHING",
    )
    .bind(employee_id)
    .bind(leave_date)
    .bind(now)
    .execute(db)
    .await?;
    Ok(rows.rows_affected() == 1)
}

/// Re-insert a moved entry under its original id
pub async fn insert_with_id<'e, E>(
    db: E,
    id: i64,
    employee_id: i64,
    leave_date: NaiveDate,
    created_at: i64,
) -> RepoResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO leave_entries (id, employee_id, leave_date, created_at) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(id)
    .bind(employee_id)
    .bind(leave_date)
    .bind(created_at)
    .execute(db)
    .await?;
    Ok(())
}

/// Number of entries for the employee with `start <= leave_date <= end`
pub async fn count_in_range<'e, E>(
    db: E,
    employee_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> RepoResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM leave_entries WHERE employee_id = ?1 AND leave_date BETWEEN ?2 AND ?3",
    )
    .bind(employee_id)
    .bind(start)
    .bind(end)
    .fetch_one(db)
    .await?;
    Ok(count)
}

pub async fn exists_on<'e, E>(db: E, employee_id: i64, leave_date: NaiveDate) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let found = sqlx::query_scalar::<_, i64>(
        "SELECT 1 FROM leave_entries WHERE employee_id = ?1 AND leave_date = ?2",
    )
    .bind(employee_id)
    .bind(leave_date)
    .fetch_optional(db)
    .await?;
    Ok(found.is_some())
}

/// Leave dates of one employee inside `[start, end]`, newest first
pub async fn dates_in_range<'e, E>(
    db: E,
    employee_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> RepoResult<Vec<NaiveDate>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let dates = sqlx::query_scalar::<_, NaiveDate>(
        "SELECT leave_date FROM leave_entries WHERE employee_id = ?1 AND leave_date BETWEEN ?2 AND ?3 ORDER BY leave_date DESC",
    )
    .bind(employee_id)
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await?;
    Ok(dates)
}

/// All entries with the employee name, newest leave date first
pub async fn list<'e, E>(db: E) -> RepoResult<Vec<LeaveEntry>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let entries = sqlx::query_as::<_, LeaveEntry>(
        "SELECT l.id, l.employee_id, e.name AS employee_name, l.leave_date, l.created_at FROM leave_entries l JOIN employees e ON e.id = l.employee_id ORDER BY l.leave_date DESC, l.id DESC",
    )
    .fetch_all(db)
    .await?;
    Ok(entries)
}

pub async fn find_by_id<'e, E>(db: E, id: i64) -> RepoResult<Option<LeaveEntry>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let entry = sqlx::query_as::<_, LeaveEntry>(
        "SELECT l.id, l.employee_id, e.name AS employee_name, l.leave_date, l.created_at FROM leave_entries l JOIN employees e ON e.id = l.employee_id WHERE l.id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(entry)
}

pub async fn find_by_pair<'e, E>(
    db: E,
    employee_id: i64,
    leave_date: NaiveDate,
) -> RepoResult<Option<LeaveEntry>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let entry = sqlx::query_as::<_, LeaveEntry>(
        "SELECT l.id, l.employee_id, e.name AS employee_name, l.leave_date, l.created_at FROM leave_entries l JOIN employees e ON e.id = l.employee_id WHERE l.employee_id = ?1 AND l.leave_date = ?2",
    )
    .bind(employee_id)
    .bind(leave_date)
    .fetch_optional(db)
    .await?;
    Ok(entry)
}

pub async fn delete<'e, E>(db: E, id: i64) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query("DELETE FROM leave_entries WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(rows.rows_affected() > 0)
}
