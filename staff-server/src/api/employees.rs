//! Employee directory and dashboard statistics

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::{Datelike, NaiveDate};
use shared::error::{AppError, AppResult};
use shared::models::{
    Employee, EmployeeCreate, EmployeeDetail, EmployeeFilter, EmployeeOption, EmployeeStats,
    EmployeeStatus, EmployeeUpdate, UpcomingBirthday,
};

use super::{ApiResult, IdPath, JsonBody};
use crate::db::employees::{BirthdayRow, EmployeeChanges, NewEmployee};
use crate::db;
use crate::state::AppState;
use crate::util::{
    normalize_text, parse_date, parse_optional_date, validate_age, validate_required_text,
};

const NAME_MAX_LEN: usize = 100;
const BIRTHDAY_WINDOW_DAYS: i64 = 30;
const BIRTHDAY_LIMIT: usize = 5;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/employees", get(list).post(create))
        .route("/api/employees/options", get(options))
        .route("/api/employees/departments", get(departments))
        .route("/api/employees/stats", get(stats))
        .route(
            "/api/employees/{id}",
            get(get_by_id).put(update).delete(delete),
        )
}

async fn list(
    State(state): State<AppState>,
    query: Result<Query<EmployeeFilter>, axum::extract::rejection::QueryRejection>,
) -> ApiResult<Vec<Employee>> {
    let Query(mut filter) = query?;
    filter.department = normalize_text(filter.department);
    Ok(Json(state.leave.list_employees(&filter).await?))
}

async fn get_by_id(State(state): State<AppState>, IdPath(id): IdPath) -> ApiResult<EmployeeDetail> {
    Ok(Json(state.leave.employee_detail(id).await?))
}

async fn create(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<EmployeeCreate>,
) -> Result<(StatusCode, Json<Employee>), AppError> {
    let leave_date = parse_optional_date("leaveDate", payload.leave_date.as_deref())?;
    let data = NewEmployee {
        name: validate_required_text("name", &payload.name, NAME_MAX_LEN)?,
        department: validate_required_text("department", &payload.department, NAME_MAX_LEN)?,
        birthday: parse_optional_date("birthday", payload.birthday.as_deref())?,
        address: normalize_text(payload.address),
        age: validate_age(payload.age)?,
        gender: normalize_text(payload.gender),
        phone: normalize_text(payload.phone),
        hire_date: parse_optional_date("hireDate", payload.hire_date.as_deref())?,
        status: payload.status.unwrap_or_default(),
    };

    let employee = state.leave.create_employee(data, leave_date).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

async fn update(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    JsonBody(payload): JsonBody<EmployeeUpdate>,
) -> ApiResult<Employee> {
    let leave_date = parse_optional_date("leaveDate", payload.leave_date.as_deref())?;
    let changes = EmployeeChanges {
        name: payload
            .name
            .map(|v| validate_required_text("name", &v, NAME_MAX_LEN))
            .transpose()?,
        department: payload
            .department
            .map(|v| validate_required_text("department", &v, NAME_MAX_LEN))
            .transpose()?,
        birthday: clearable_date("birthday", payload.birthday)?,
        address: payload.address.map(|v| normalize_text(Some(v))),
        age: payload.age.map(validate_age).transpose()?,
        gender: payload.gender.map(|v| normalize_text(Some(v))),
        phone: payload.phone.map(|v| normalize_text(Some(v))),
        hire_date: clearable_date("hireDate", payload.hire_date)?,
    };

    let employee = state
        .leave
        .update_employee(id, changes, payload.status, leave_date)
        .await?;
    Ok(Json(employee))
}

/// Absent leaves the column alone, blank clears it
fn clearable_date(field: &str, value: Option<String>) -> AppResult<Option<Option<NaiveDate>>> {
    match value {
        None => Ok(None),
        Some(v) if v.trim().is_empty() => Ok(Some(None)),
        Some(v) => Ok(Some(Some(parse_date(field, &v)?))),
    }
}

async fn delete(State(state): State<AppState>, IdPath(id): IdPath) -> Result<StatusCode, AppError> {
    state.leave.delete_employee(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn options(State(state): State<AppState>) -> ApiResult<Vec<EmployeeOption>> {
    Ok(Json(db::employees::options(&state.pool).await?))
}

async fn departments(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    let departments = db::employees::departments(&state.pool)
        .await?
        .into_iter()
        .filter(|d| !state.is_excluded_department(d))
        .collect();
    Ok(Json(departments))
}

async fn stats(State(state): State<AppState>) -> ApiResult<EmployeeStats> {
    state.leave.reconcile().await?;
    let today = state.leave.today();
    let pool = &state.pool;

    let department_distribution = db::employees::department_distribution(pool)
        .await?
        .into_iter()
        .filter(|row| !row.department.is_empty() && !state.is_excluded_department(&row.department))
        .collect();

    Ok(Json(EmployeeStats {
        total_employees: db::employees::count(pool, None).await?,
        avg_age: db::employees::average_age(pool)
            .await?
            .map(|avg| (avg * 10.0).round() / 10.0),
        total_on_leave: db::employees::count(pool, Some(EmployeeStatus::OnLeave)).await?,
        department_distribution,
        upcoming_birthdays: upcoming_birthdays(
            db::employees::with_birthdays(pool).await?,
            today,
        ),
        on_leave_today: db::employees::on_leave(pool).await?,
    }))
}

/// Next anniversary on or after `today`. Feb 29 falls back to Mar 1 in
/// common years.
fn next_birthday(birthday: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
    let in_year = |year: i32| {
        NaiveDate::from_ymd_opt(year, birthday.month(), birthday.day())
            .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
    };
    let this_year = in_year(today.year())?;
    if this_year >= today {
        Some(this_year)
    } else {
        in_year(today.year() + 1)
    }
}

fn upcoming_birthdays(rows: Vec<BirthdayRow>, today: NaiveDate) -> Vec<UpcomingBirthday> {
    let mut upcoming: Vec<UpcomingBirthday> = rows
        .into_iter()
        .filter_map(|row| {
            let next = next_birthday(row.birthday, today)?;
            let days_until = next.signed_duration_since(today).num_days();
            (days_until <= BIRTHDAY_WINDOW_DAYS).then(|| UpcomingBirthday {
                id: row.id,
                name: row.name,
                department: row.department,
                birthday: row.birthday,
                next_birthday: next,
                days_until,
            })
        })
        .collect();
    upcoming.sort_by(|a, b| a.days_until.cmp(&b.days_until).then(a.name.cmp(&b.name)));
    upcoming.truncate(BIRTHDAY_LIMIT);
    upcoming
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn row(id: i64, birthday: NaiveDate) -> BirthdayRow {
        BirthdayRow {
            id,
            name: format!("E{id}"),
            department: "Kitchen".into(),
            birthday,
        }
    }

    #[test]
    fn test_next_birthday() {
        let today = d(2024, 3, 20);
        assert_eq!(next_birthday(d(1990, 3, 20), today), Some(d(2024, 3, 20)));
        assert_eq!(next_birthday(d(1990, 3, 19), today), Some(d(2025, 3, 19)));
        assert_eq!(next_birthday(d(1990, 12, 31), today), Some(d(2024, 12, 31)));
        // leap-day birthday in a common year
        assert_eq!(next_birthday(d(1992, 2, 29), d(2025, 2, 10)), Some(d(2025, 3, 1)));
        assert_eq!(next_birthday(d(1992, 2, 29), d(2024, 2, 10)), Some(d(2024, 2, 29)));
    }

    #[test]
    fn test_upcoming_window_and_limit() {
        let today = d(2024, 12, 20);
        let rows = vec![
            row(1, d(1990, 12, 25)),
            row(2, d(1985, 1, 5)),
            row(3, d(1980, 3, 1)),
            row(4, d(1991, 12, 20)),
            row(5, d(1992, 12, 21)),
            row(6, d(1993, 12, 22)),
            row(7, d(1994, 12, 23)),
        ];
        let upcoming = upcoming_birthdays(rows, today);
        let ids: Vec<i64> = upcoming.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![4, 5, 6, 7, 1]);
        assert_eq!(upcoming[0].days_until, 0);
        assert_eq!(upcoming[4].next_birthday, d(2024, 12, 25));
    }

    #[test]
    fn test_clearable_date() {
        assert_eq!(clearable_date("birthday", None).unwrap(), None);
        assert_eq!(clearable_date("birthday", Some("".into())).unwrap(), Some(None));
        assert_eq!(
            clearable_date("birthday", Some("1990-05-01".into())).unwrap(),
            Some(Some(d(1990, 5, 1)))
        );
        assert!(clearable_date("birthday", Some("1990-5-1".into())).is_err());
    }
}
