//! Transactional leave operations
//!
//! Every write that touches the ledger runs as:
//! employee lock(s) → BEGIN → reconcile → policy check → ledger write →
//! status update → COMMIT. A rejection or a dropped future rolls back.

use chrono::NaiveDate;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    Employee, EmployeeDetail, EmployeeFilter, EmployeeStatus, LeaveBulkResult, LeaveEntry,
    LeaveHistory,
};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::sync::Arc;

use super::error::LeaveError;
use super::locks::EmployeeLocks;
use super::policy::{LeavePolicy, assert_can_mark_leave};
use super::reconcile::reconcile_leave_statuses;
use crate::clock::Clock;
use crate::db::employees::{EmployeeChanges, NewEmployee};
use crate::db::{self, RepoError};

/// Longest range accepted by a bulk marking, in days (inclusive)
pub const MAX_BULK_DAYS: i64 = 31;

#[derive(Clone)]
pub struct LeaveService {
    pool: SqlitePool,
    policy: LeavePolicy,
    locks: EmployeeLocks,
    clock: Arc<dyn Clock>,
}

impl LeaveService {
    pub fn new(pool: SqlitePool, policy: LeavePolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            pool,
            policy,
            locks: EmployeeLocks::new(),
            clock,
        }
    }

    pub fn policy(&self) -> &LeavePolicy {
        &self.policy
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    async fn begin(&self) -> Result<Transaction<'static, Sqlite>, LeaveError> {
        Ok(self.pool.begin().await?)
    }

    /// Bring every employee status in line with today's ledger
    pub async fn reconcile(&self) -> Result<u64, LeaveError> {
        reconcile_leave_statuses(&self.pool, self.today()).await
    }

    // ==================== Reads ====================

    pub async fn list_employees(&self, filter: &EmployeeFilter) -> AppResult<Vec<Employee>> {
        self.reconcile().await?;
        Ok(db::employees::list(&self.pool, filter).await?)
    }

    /// Employee with the leave days of the period containing today
    pub async fn employee_detail(&self, id: i64) -> AppResult<EmployeeDetail> {
        let today = self.today();
        reconcile_leave_statuses(&self.pool, today).await?;

        let employee = db::employees::find_by_id(&self.pool, id)
            .await?
            .ok_or(LeaveError::EmployeeNotFound(id))?;
        let period = self.policy.period_for(today);
        let dates = db::leave::dates_in_range(&self.pool, id, period.start, period.end).await?;

        Ok(EmployeeDetail {
            employee,
            leave: LeaveHistory {
                period_start: period.start,
                period_end: period.end,
                dates,
            },
        })
    }

    pub async fn list_entries(&self) -> AppResult<Vec<LeaveEntry>> {
        self.reconcile().await?;
        Ok(db::leave::list(&self.pool).await?)
    }

    // ==================== Employee writes ====================

    /// Insert an employee. When `data.status` is "On Leave" the leave day
    /// (default today) goes through the policy and into the ledger.
    pub async fn create_employee(
        &self,
        data: NewEmployee,
        leave_date: Option<NaiveDate>,
    ) -> AppResult<Employee> {
        let today = self.today();
        let mut tx = self.begin().await?;
        reconcile_leave_statuses(&mut *tx, today).await?;

        if db::employees::name_taken(&mut *tx, &data.department, &data.name, None).await? {
            return Err(name_conflict(&data.name, &data.department));
        }
        let id = db::employees::insert(&mut *tx, &data)
            .await
            .map_err(|e| map_name_conflict(e, &data.name, &data.department))?;

        if data.status == EmployeeStatus::OnLeave {
            let date = leave_date.unwrap_or(today);
            assert_can_mark_leave(&mut *tx, &self.policy, id, date).await?;
            db::leave::record_leave(&mut *tx, id, date).await?;
        }

        let employee = db::employees::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::internal("Failed to create employee"))?;
        tx.commit().await.map_err(LeaveError::from)?;

        tracing::info!(employee_id = id, status = %employee.status, "Employee created");
        Ok(employee)
    }

    /// Apply `changes` and an optional status transition.
    ///
    /// "On Leave" re-marking a date that is already recorded skips the policy.
    /// "Active" is a manual revert and keeps the ledger rows.
    pub async fn update_employee(
        &self,
        id: i64,
        changes: EmployeeChanges,
        status: Option<EmployeeStatus>,
        leave_date: Option<NaiveDate>,
    ) -> AppResult<Employee> {
        let _guard = self.locks.lock(id).await;
        let today = self.today();
        let mut tx = self.begin().await?;
        reconcile_leave_statuses(&mut *tx, today).await?;

        let mut employee = db::employees::find_by_id(&mut *tx, id)
            .await?
            .ok_or(LeaveError::EmployeeNotFound(id))?;
        changes.apply(&mut employee);

        if db::employees::name_taken(&mut *tx, &employee.department, &employee.name, Some(id))
            .await?
        {
            return Err(name_conflict(&employee.name, &employee.department));
        }

        match status {
            Some(EmployeeStatus::OnLeave) => {
                let date = leave_date.unwrap_or(today);
                if !db::leave::exists_on(&mut *tx, id, date).await? {
                    assert_can_mark_leave(&mut *tx, &self.policy, id, date).await?;
                    db::leave::record_leave(&mut *tx, id, date).await?;
                }
                employee.status = EmployeeStatus::OnLeave;
            }
            Some(EmployeeStatus::Active) => employee.status = EmployeeStatus::Active,
            None => {}
        }

        db::employees::update(&mut *tx, &employee)
            .await
            .map_err(|e| map_name_conflict(e, &employee.name, &employee.department))?;
        let employee = db::employees::find_by_id(&mut *tx, id)
            .await?
            .ok_or(LeaveError::EmployeeNotFound(id))?;
        tx.commit().await.map_err(LeaveError::from)?;

        tracing::info!(employee_id = id, status = %employee.status, "Employee updated");
        Ok(employee)
    }

    pub async fn delete_employee(&self, id: i64) -> AppResult<()> {
        let guard = self.locks.lock(id).await;
        if !db::employees::delete(&self.pool, id).await? {
            return Err(LeaveError::EmployeeNotFound(id).into());
        }
        drop(guard);
        self.locks.forget(id);

        tracing::info!(employee_id = id, "Employee deleted");
        Ok(())
    }

    // ==================== Ledger writes ====================

    /// Record one leave day. The employee becomes "On Leave" only when the
    /// day is today.
    pub async fn add_entry(
        &self,
        employee_id: i64,
        leave_date: Option<NaiveDate>,
    ) -> AppResult<LeaveEntry> {
        let today = self.today();
        let date = leave_date.unwrap_or(today);

        let _guard = self.locks.lock(employee_id).await;
        let mut tx = self.begin().await?;
        reconcile_leave_statuses(&mut *tx, today).await?;

        if !db::employees::exists(&mut *tx, employee_id).await? {
            return Err(LeaveError::EmployeeNotFound(employee_id).into());
        }
        assert_can_mark_leave(&mut *tx, &self.policy, employee_id, date).await?;
        db::leave::record_leave(&mut *tx, employee_id, date).await?;
        if date == today {
            db::employees::set_status(&mut *tx, employee_id, EmployeeStatus::OnLeave).await?;
        }

        let entry = db::leave::find_by_pair(&mut *tx, employee_id, date)
            .await?
            .ok_or_else(|| AppError::internal("Failed to record leave"))?;
        tx.commit().await.map_err(LeaveError::from)?;

        tracing::info!(employee_id, leave_date = %date, "Leave recorded");
        Ok(entry)
    }

    /// Move an entry to another employee and/or date, keeping its id.
    /// The entry itself does not count against the target period.
    pub async fn update_entry(
        &self,
        entry_id: i64,
        employee_id: Option<i64>,
        leave_date: Option<NaiveDate>,
    ) -> AppResult<LeaveEntry> {
        let today = self.today();

        loop {
            let current = db::leave::find_by_id(&self.pool, entry_id)
                .await?
                .ok_or(LeaveError::EntryNotFound(entry_id))?;
            let target_employee = employee_id.unwrap_or(current.employee_id);
            let target_date = leave_date.unwrap_or(current.leave_date);

            let _guards = self
                .locks
                .lock_many(&[current.employee_id, target_employee])
                .await;
            let mut tx = self.begin().await?;
            reconcile_leave_statuses(&mut *tx, today).await?;

            let locked = db::leave::find_by_id(&mut *tx, entry_id)
                .await?
                .ok_or(LeaveError::EntryNotFound(entry_id))?;
            if locked.employee_id != current.employee_id {
                // moved by someone else between the read and the lock
                continue;
            }
            if locked.employee_id == target_employee && locked.leave_date == target_date {
                tx.commit().await.map_err(LeaveError::from)?;
                return Ok(locked);
            }
            if !db::employees::exists(&mut *tx, target_employee).await? {
                return Err(LeaveError::EmployeeNotFound(target_employee).into());
            }

            db::leave::delete(&mut *tx, entry_id).await?;
            assert_can_mark_leave(&mut *tx, &self.policy, target_employee, target_date).await?;
            db::leave::insert_with_id(
                &mut *tx,
                entry_id,
                target_employee,
                target_date,
                locked.created_at,
            )
            .await?;
            if target_date == today {
                db::employees::set_status(&mut *tx, target_employee, EmployeeStatus::OnLeave)
                    .await?;
            }
            // the previous owner may have just lost today's entry
            reconcile_leave_statuses(&mut *tx, today).await?;

            let entry = db::leave::find_by_id(&mut *tx, entry_id)
                .await?
                .ok_or(LeaveError::EntryNotFound(entry_id))?;
            tx.commit().await.map_err(LeaveError::from)?;

            tracing::info!(
                entry_id,
                from_employee = locked.employee_id,
                to_employee = target_employee,
                from_date = %locked.leave_date,
                to_date = %target_date,
                "Leave entry moved"
            );
            return Ok(entry);
        }
    }

    pub async fn delete_entry(&self, entry_id: i64) -> AppResult<()> {
        let today = self.today();
        let current = db::leave::find_by_id(&self.pool, entry_id)
            .await?
            .ok_or(LeaveError::EntryNotFound(entry_id))?;

        let _guard = self.locks.lock(current.employee_id).await;
        let mut tx = self.begin().await?;
        if !db::leave::delete(&mut *tx, entry_id).await? {
            return Err(LeaveError::EntryNotFound(entry_id).into());
        }
        reconcile_leave_statuses(&mut *tx, today).await?;
        tx.commit().await.map_err(LeaveError::from)?;

        tracing::info!(entry_id, employee_id = current.employee_id, "Leave entry deleted");
        Ok(())
    }

    /// Mark `[start, end]` for every employee, all or nothing.
    /// Dates already recorded are skipped; every new date passes the policy.
    pub async fn bulk_add(
        &self,
        employee_ids: &[i64],
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<LeaveBulkResult> {
        if employee_ids.is_empty() {
            return Err(LeaveError::InvalidInput("employeeIds must not be empty".into()).into());
        }
        if end < start {
            return Err(
                LeaveError::InvalidInput("endDate must not be before startDate".into()).into(),
            );
        }
        let days = end.signed_duration_since(start).num_days() + 1;
        if days > MAX_BULK_DAYS {
            return Err(LeaveError::RangeTooLong {
                days,
                max: MAX_BULK_DAYS,
            }
            .into());
        }

        let mut ids = employee_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        let today = self.today();
        let _guards = self.locks.lock_many(&ids).await;
        let mut tx = self.begin().await?;
        reconcile_leave_statuses(&mut *tx, today).await?;

        for &id in &ids {
            if !db::employees::exists(&mut *tx, id).await? {
                return Err(LeaveError::EmployeeNotFound(id).into());
            }
        }

        let mut created = Vec::new();
        let mut skipped = 0;
        for &id in &ids {
            for date in start.iter_days().take_while(|d| *d <= end) {
                if db::leave::exists_on(&mut *tx, id, date).await? {
                    skipped += 1;
                    continue;
                }
                assert_can_mark_leave(&mut *tx, &self.policy, id, date).await?;
                db::leave::record_leave(&mut *tx, id, date).await?;
                created.push((id, date));
            }
            if start <= today && today <= end {
                db::employees::set_status(&mut *tx, id, EmployeeStatus::OnLeave).await?;
            }
        }

        let mut entries = Vec::with_capacity(created.len());
        for (id, date) in created {
            if let Some(entry) = db::leave::find_by_pair(&mut *tx, id, date).await? {
                entries.push(entry);
            }
        }
        tx.commit().await.map_err(LeaveError::from)?;

        tracing::info!(
            employees = ids.len(),
            created = entries.len(),
            skipped,
            %start,
            %end,
            "Bulk leave recorded"
        );
        Ok(LeaveBulkResult {
            created: entries.len(),
            skipped,
            entries,
        })
    }
}

fn name_conflict(name: &str, department: &str) -> AppError {
    AppError::new(ErrorCode::EmployeeNameExists)
        .with_detail("name", name)
        .with_detail("department", department)
}

fn map_name_conflict(err: RepoError, name: &str, department: &str) -> AppError {
    match err {
        RepoError::Duplicate(_) => name_conflict(name, department),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::db::test_pool;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    async fn service_at(today: NaiveDate) -> (LeaveService, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(today));
        let service = LeaveService::new(test_pool().await, LeavePolicy::default(), clock.clone());
        (service, clock)
    }

    fn new_employee(name: &str, status: EmployeeStatus) -> NewEmployee {
        NewEmployee {
            name: name.into(),
            department: "Kitchen".into(),
            status,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_on_leave_records_today() {
        let (service, _) = service_at(d(2024, 3, 20)).await;
        let employee = service
            .create_employee(new_employee("Ana", EmployeeStatus::OnLeave), None)
            .await
            .unwrap();
        assert_eq!(employee.status, EmployeeStatus::OnLeave);

        let detail = service.employee_detail(employee.id).await.unwrap();
        assert_eq!(detail.leave.dates, vec![d(2024, 3, 20)]);
        assert_eq!(detail.leave.period_start, d(2024, 3, 11));
        assert_eq!(detail.leave.period_end, d(2024, 4, 10));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_name_in_department() {
        let (service, _) = service_at(d(2024, 3, 20)).await;
        service
            .create_employee(new_employee("Ana", EmployeeStatus::Active), None)
            .await
            .unwrap();
        let err = service
            .create_employee(new_employee("Ana", EmployeeStatus::Active), None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::EmployeeNameExists);

        let mut other = new_employee("Ana", EmployeeStatus::Active);
        other.department = "Bar".into();
        assert!(service.create_employee(other, None).await.is_ok());
    }

    #[tokio::test]
    async fn test_status_reverts_after_leave_day() {
        let (service, clock) = service_at(d(2024, 3, 20)).await;
        let f = service
            .create_employee(new_employee("F", EmployeeStatus::OnLeave), None)
            .await
            .unwrap();

        clock.set(d(2024, 3, 21));
        let employees = service.list_employees(&EmployeeFilter::default()).await.unwrap();
        assert_eq!(employees[0].id, f.id);
        assert_eq!(employees[0].status, EmployeeStatus::Active);

        // ledger is untouched
        let detail = service.employee_detail(f.id).await.unwrap();
        assert_eq!(detail.leave.dates, vec![d(2024, 3, 20)]);
    }

    #[tokio::test]
    async fn test_update_quota_exceeded_rolls_back() {
        let (service, _) = service_at(d(2024, 4, 5)).await;
        let ana = service
            .create_employee(new_employee("Ana", EmployeeStatus::Active), None)
            .await
            .unwrap();
        for date in [d(2024, 3, 12), d(2024, 3, 15), d(2024, 3, 20), d(2024, 4, 1)] {
            service.add_entry(ana.id, Some(date)).await.unwrap();
        }

        let changes = EmployeeChanges {
            phone: Some(Some("555".into())),
            ..Default::default()
        };
        let err = service
            .update_employee(ana.id, changes, Some(EmployeeStatus::OnLeave), None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::LeaveQuotaExceeded);

        let detail = service.employee_detail(ana.id).await.unwrap();
        assert_eq!(detail.employee.status, EmployeeStatus::Active);
        assert_eq!(detail.employee.phone, None);
        assert_eq!(detail.leave.dates.len(), 4);
    }

    #[tokio::test]
    async fn test_update_remark_same_day_is_noop() {
        let (service, _) = service_at(d(2024, 3, 20)).await;
        let ana = service
            .create_employee(new_employee("Ana", EmployeeStatus::OnLeave), None)
            .await
            .unwrap();

        let updated = service
            .update_employee(
                ana.id,
                EmployeeChanges::default(),
                Some(EmployeeStatus::OnLeave),
                Some(d(2024, 3, 20)),
            )
            .await
            .unwrap();
        assert_eq!(updated.status, EmployeeStatus::OnLeave);
        assert_eq!(service.list_entries().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_manual_revert_keeps_ledger() {
        let (service, _) = service_at(d(2024, 3, 20)).await;
        let ana = service
            .create_employee(new_employee("Ana", EmployeeStatus::OnLeave), None)
            .await
            .unwrap();

        let updated = service
            .update_employee(
                ana.id,
                EmployeeChanges::default(),
                Some(EmployeeStatus::Active),
                None,
            )
            .await
            .unwrap();
        assert_eq!(updated.status, EmployeeStatus::Active);
        assert_eq!(service.list_entries().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_add_entry_status_only_for_today() {
        let (service, _) = service_at(d(2024, 3, 20)).await;
        let ana = service
            .create_employee(new_employee("Ana", EmployeeStatus::Active), None)
            .await
            .unwrap();

        let entry = service.add_entry(ana.id, Some(d(2024, 3, 25))).await.unwrap();
        assert_eq!(entry.employee_name, "Ana");
        let detail = service.employee_detail(ana.id).await.unwrap();
        assert_eq!(detail.employee.status, EmployeeStatus::Active);

        service.add_entry(ana.id, None).await.unwrap();
        let detail = service.employee_detail(ana.id).await.unwrap();
        assert_eq!(detail.employee.status, EmployeeStatus::OnLeave);
        assert_eq!(detail.leave.dates, vec![d(2024, 3, 25), d(2024, 3, 20)]);

        let err = service.add_entry(ana.id, Some(d(2024, 3, 25))).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::LeaveDateDuplicate);

        let err = service.add_entry(999, None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EmployeeNotFound);
    }

    #[tokio::test]
    async fn test_concurrent_markings_at_capacity() {
        let (service, _) = service_at(d(2024, 3, 20)).await;
        let ana = service
            .create_employee(new_employee("Ana", EmployeeStatus::Active), None)
            .await
            .unwrap();
        for date in [d(2024, 3, 12), d(2024, 3, 13), d(2024, 3, 14)] {
            service.add_entry(ana.id, Some(date)).await.unwrap();
        }

        let (a, b) = tokio::join!(
            service.add_entry(ana.id, Some(d(2024, 3, 25))),
            service.add_entry(ana.id, Some(d(2024, 3, 26))),
        );
        assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
        let rejected = a.err().or(b.err()).unwrap();
        assert_eq!(rejected.code, ErrorCode::LeaveQuotaExceeded);
        assert_eq!(service.list_entries().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_update_entry_excludes_itself_from_quota() {
        let (service, _) = service_at(d(2024, 3, 20)).await;
        let ana = service
            .create_employee(new_employee("Ana", EmployeeStatus::Active), None)
            .await
            .unwrap();
        let mut ids = Vec::new();
        for day in [12, 13, 14, 15] {
            ids.push(service.add_entry(ana.id, Some(d(2024, 3, day))).await.unwrap().id);
        }

        let moved = service
            .update_entry(ids[0], None, Some(d(2024, 3, 28)))
            .await
            .unwrap();
        assert_eq!(moved.id, ids[0]);
        assert_eq!(moved.leave_date, d(2024, 3, 28));

        let err = service
            .update_entry(ids[1], None, Some(d(2024, 3, 28)))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::LeaveDateDuplicate);
        // rejected move left the entry where it was
        let entry = db::leave::find_by_id(&service.pool, ids[1]).await.unwrap().unwrap();
        assert_eq!(entry.leave_date, d(2024, 3, 13));
    }

    #[tokio::test]
    async fn test_move_today_entry_to_other_employee() {
        let (service, _) = service_at(d(2024, 3, 20)).await;
        let ana = service
            .create_employee(new_employee("Ana", EmployeeStatus::Active), None)
            .await
            .unwrap();
        let ben = service
            .create_employee(new_employee("Ben", EmployeeStatus::Active), None)
            .await
            .unwrap();
        let entry = service.add_entry(ana.id, None).await.unwrap();

        let moved = service.update_entry(entry.id, Some(ben.id), None).await.unwrap();
        assert_eq!(moved.employee_name, "Ben");

        let ana = service.employee_detail(ana.id).await.unwrap();
        let ben = service.employee_detail(ben.id).await.unwrap();
        assert_eq!(ana.employee.status, EmployeeStatus::Active);
        assert_eq!(ben.employee.status, EmployeeStatus::OnLeave);

        let err = service.update_entry(9999, None, None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::LeaveEntryNotFound);
    }

    #[tokio::test]
    async fn test_delete_today_entry_reverts_status() {
        let (service, _) = service_at(d(2024, 3, 20)).await;
        let ana = service
            .create_employee(new_employee("Ana", EmployeeStatus::OnLeave), None)
            .await
            .unwrap();
        let entry = service.list_entries().await.unwrap().remove(0);

        service.delete_entry(entry.id).await.unwrap();
        let detail = service.employee_detail(ana.id).await.unwrap();
        assert_eq!(detail.employee.status, EmployeeStatus::Active);
        assert!(detail.leave.dates.is_empty());

        let err = service.delete_entry(entry.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::LeaveEntryNotFound);
    }

    #[tokio::test]
    async fn test_bulk_is_all_or_nothing() {
        let (service, _) = service_at(d(2024, 3, 20)).await;
        let ana = service
            .create_employee(new_employee("Ana", EmployeeStatus::Active), None)
            .await
            .unwrap();
        let ben = service
            .create_employee(new_employee("Ben", EmployeeStatus::Active), None)
            .await
            .unwrap();
        service.add_entry(ben.id, Some(d(2024, 3, 12))).await.unwrap();
        service.add_entry(ben.id, Some(d(2024, 3, 13))).await.unwrap();

        // Ben would reach 5 days in the period
        let err = service
            .bulk_add(&[ana.id, ben.id], d(2024, 3, 19), d(2024, 3, 21))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::LeaveQuotaExceeded);
        assert_eq!(service.list_entries().await.unwrap().len(), 2);

        let result = service
            .bulk_add(&[ben.id, ana.id], d(2024, 3, 13), d(2024, 3, 14))
            .await
            .unwrap();
        assert_eq!(result.created, 3);
        assert_eq!(result.skipped, 1);
        assert_eq!(service.list_entries().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_bulk_covering_today_sets_status() {
        let (service, _) = service_at(d(2024, 3, 20)).await;
        let ana = service
            .create_employee(new_employee("Ana", EmployeeStatus::Active), None)
            .await
            .unwrap();
        service
            .bulk_add(&[ana.id], d(2024, 3, 19), d(2024, 3, 20))
            .await
            .unwrap();
        let detail = service.employee_detail(ana.id).await.unwrap();
        assert_eq!(detail.employee.status, EmployeeStatus::OnLeave);
    }

    #[tokio::test]
    async fn test_bulk_input_validation() {
        let (service, _) = service_at(d(2024, 3, 20)).await;
        let err = service
            .bulk_add(&[], d(2024, 3, 19), d(2024, 3, 20))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let err = service
            .bulk_add(&[1], d(2024, 3, 20), d(2024, 3, 19))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let err = service
            .bulk_add(&[1], d(2024, 3, 1), d(2024, 4, 1))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::LeaveRangeTooLong);

        let err = service
            .bulk_add(&[42], d(2024, 3, 1), d(2024, 3, 2))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::EmployeeNotFound);
    }

    #[tokio::test]
    async fn test_delete_employee_drops_ledger() {
        let (service, _) = service_at(d(2024, 3, 20)).await;
        let ana = service
            .create_employee(new_employee("Ana", EmployeeStatus::OnLeave), None)
            .await
            .unwrap();
        service.delete_employee(ana.id).await.unwrap();

        assert!(service.list_entries().await.unwrap().is_empty());
        let err = service.delete_employee(ana.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EmployeeNotFound);
    }
}
