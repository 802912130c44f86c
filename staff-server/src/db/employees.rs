//! Employee Repository

use super::RepoResult;
use chrono::NaiveDate;
use shared::models::{DepartmentCount, Employee, EmployeeFilter, EmployeeOption, EmployeeStatus};
use sqlx::{Executor, Sqlite};

/// Validated insert payload
#[derive(Debug, Clone, Default)]
pub struct NewEmployee {
    pub name: String,
    pub department: String,
    pub birthday: Option<NaiveDate>,
    pub address: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub status: EmployeeStatus,
}

/// Validated partial update. Outer `None` leaves a column untouched,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct EmployeeChanges {
    pub name: Option<String>,
    pub department: Option<String>,
    pub birthday: Option<Option<NaiveDate>>,
    pub address: Option<Option<String>>,
    pub age: Option<Option<i64>>,
    pub gender: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub hire_date: Option<Option<NaiveDate>>,
}

impl EmployeeChanges {
    pub fn apply(self, employee: &mut Employee) {
        if let Some(name) = self.name {
            employee.name = name;
        }
        if let Some(department) = self.department {
            employee.department = department;
        }
        if let Some(birthday) = self.birthday {
            employee.birthday = birthday;
        }
        if let Some(address) = self.address {
            employee.address = address;
        }
        if let Some(age) = self.age {
            employee.age = age;
        }
        if let Some(gender) = self.gender {
            employee.gender = gender;
        }
        if let Some(phone) = self.phone {
            employee.phone = phone;
        }
        if let Some(hire_date) = self.hire_date {
            employee.hire_date = hire_date;
        }
    }
}

/// Birthday row used by the dashboard statistics
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BirthdayRow {
    pub id: i64,
    pub name: String,
    pub department: String,
    pub birthday: NaiveDate,
}

pub async fn list<'e, E>(db: E, filter: &EmployeeFilter) -> RepoResult<Vec<Employee>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let employees = sqlx::query_as::<_, Employee>(
        "SELECT id, name, department, birthday, address, age, gender, phone, hire_date, status, created_at, updated_at FROM employees WHERE (?1 IS NULL OR department = ?1) AND (?2 IS NULL OR status = ?2) ORDER BY name, id",
    )
    .bind(filter.department.as_deref())
    .bind(filter.status)
    .fetch_all(db)
    .await?;
    Ok(employees)
}

pub async fn find_by_id<'e, E>(db: E, id: i64) -> RepoResult<Option<Employee>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let employee = sqlx::query_as::<_, Employee>(
        "SELECT id, name, department, birthday, address, age, gender, phone, hire_date, status, created_at, updated_at FROM employees WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(employee)
}

pub async fn exists<'e, E>(db: E, id: i64) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let found = sqlx::query_scalar::<_, i64>("SELECT 1 FROM employees WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(found.is_some())
}

/// Whether `name` is already used in `department` (optionally ignoring one employee)
pub async fn name_taken<'e, E>(
    db: E,
    department: &str,
    name: &str,
    exclude_id: Option<i64>,
) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let found = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM employees WHERE department = ?1 AND name = ?2 AND (?3 IS NULL OR id != ?3) LIMIT 1",
    )
    .bind(department)
    .bind(name)
    .bind(exclude_id)
    .fetch_optional(db)
    .await?;
    Ok(found.is_some())
}

pub async fn insert<'e, E>(db: E, data: &NewEmployee) -> RepoResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO employees (name, department, birthday, address, age, gender, phone, hire_date, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.department)
    .bind(data.birthday)
    .bind(&data.address)
    .bind(data.age)
    .bind(&data.gender)
    .bind(&data.phone)
    .bind(data.hire_date)
    .bind(data.status)
    .bind(now)
    .fetch_one(db)
    .await?;
    Ok(id)
}

/// Write every mutable column of `employee` back to its row
pub async fn update<'e, E>(db: E, employee: &Employee) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE employees SET name = ?1, department = ?2, birthday = ?3, address = ?4, age = ?5, gender = ?6, phone = ?7, hire_date = ?8, status = ?9, updated_at = ?10 WHERE id = ?11",
    )
    .bind(&employee.name)
    .bind(&employee.department)
    .bind(employee.birthday)
    .bind(&employee.address)
    .bind(employee.age)
    .bind(&employee.gender)
    .bind(&employee.phone)
    .bind(employee.hire_date)
    .bind(employee.status)
    .bind(now)
    .bind(employee.id)
    .execute(db)
    .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn set_status<'e, E>(db: E, id: i64, status: EmployeeStatus) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE employees SET status = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(db)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Delete an employee; ledger rows go with it (ON DELETE CASCADE)
pub async fn delete<'e, E>(db: E, id: i64) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn options<'e, E>(db: E) -> RepoResult<Vec<EmployeeOption>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let options = sqlx::query_as::<_, EmployeeOption>(
        "SELECT id, name, department FROM employees ORDER BY name, id",
    )
    .fetch_all(db)
    .await?;
    Ok(options)
}

pub async fn departments<'e, E>(db: E) -> RepoResult<Vec<String>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let departments = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT department FROM employees WHERE department != '' ORDER BY department",
    )
    .fetch_all(db)
    .await?;
    Ok(departments)
}

pub async fn count<'e, E>(db: E, status: Option<EmployeeStatus>) -> RepoResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM employees WHERE (?1 IS NULL OR status = ?1)",
    )
    .bind(status)
    .fetch_one(db)
    .await?;
    Ok(count)
}

pub async fn average_age<'e, E>(db: E) -> RepoResult<Option<f64>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let avg = sqlx::query_scalar::<_, Option<f64>>("SELECT AVG(age) FROM employees")
        .fetch_one(db)
        .await?;
    Ok(avg)
}

/// Head count per department, largest first
pub async fn department_distribution<'e, E>(db: E) -> RepoResult<Vec<DepartmentCount>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, DepartmentCount>(
        "SELECT department, COUNT(*) AS count FROM employees GROUP BY department ORDER BY count DESC, department",
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn with_birthdays<'e, E>(db: E) -> RepoResult<Vec<BirthdayRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, BirthdayRow>(
        "SELECT id, name, department, birthday FROM employees WHERE birthday IS NOT NULL",
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn on_leave<'e, E>(db: E) -> RepoResult<Vec<EmployeeOption>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, EmployeeOption>(
        "SELECT id, name, department FROM employees WHERE status = ?1 ORDER BY name, id",
    )
    .bind(EmployeeStatus::OnLeave)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
