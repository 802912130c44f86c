//! Employee Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::leave::LeaveHistory;
use super::serde_helpers;

/// Denormalized presence status, reconcilable from the leave ledger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum EmployeeStatus {
    #[default]
    Active,
    #[serde(rename = "On Leave")]
    #[cfg_attr(feature = "db", sqlx(rename = "On Leave"))]
    OnLeave,
}

impl EmployeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::OnLeave => "On Leave",
        }
    }
}

impl std::fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Employee entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub department: String,
    pub birthday: Option<NaiveDate>,
    pub address: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub status: EmployeeStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create employee payload
///
/// Dates arrive as strings and are parsed strictly (`YYYY-MM-DD`) by the
/// server so a malformed value is reported as a validation failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeCreate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub department: String,
    pub birthday: Option<String>,
    pub address: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub hire_date: Option<String>,
    pub status: Option<EmployeeStatus>,
    /// Leave day to record when `status` is "On Leave" (defaults to today)
    pub leave_date: Option<String>,
}

/// Update employee payload
///
/// Absent fields are left untouched; an empty string clears an optional
/// text or date field, `"age": null` clears the age.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUpdate {
    pub name: Option<String>,
    pub department: Option<String>,
    pub birthday: Option<String>,
    pub address: Option<String>,
    #[serde(
        default,
        deserialize_with = "serde_helpers::clearable",
        skip_serializing_if = "Option::is_none"
    )]
    pub age: Option<Option<i64>>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub hire_date: Option<String>,
    pub status: Option<EmployeeStatus>,
    pub leave_date: Option<String>,
}

/// List filters (`GET /api/employees?department=..&status=..`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeFilter {
    pub department: Option<String>,
    pub status: Option<EmployeeStatus>,
}

/// Employee with the leave days of the current period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeDetail {
    #[serde(flatten)]
    pub employee: Employee,
    pub leave: LeaveHistory,
}

/// Minimal employee reference for pickers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct EmployeeOption {
    pub id: i64,
    pub name: String,
    pub department: String,
}

/// Head count of one department
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DepartmentCount {
    pub department: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingBirthday {
    pub id: i64,
    pub name: String,
    pub department: String,
    pub birthday: NaiveDate,
    pub next_birthday: NaiveDate,
    pub days_until: i64,
}

/// Dashboard statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeStats {
    pub total_employees: i64,
    /// Mean of known ages, one decimal; `None` when no age is recorded
    pub avg_age: Option<f64>,
    pub total_on_leave: i64,
    pub department_distribution: Vec<DepartmentCount>,
    pub upcoming_birthdays: Vec<UpcomingBirthday>,
    pub on_leave_today: Vec<EmployeeOption>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&EmployeeStatus::OnLeave).unwrap(),
            "\"On Leave\""
        );
        assert_eq!(
            serde_json::to_string(&EmployeeStatus::Active).unwrap(),
            "\"Active\""
        );
        let status: EmployeeStatus = serde_json::from_str("\"On Leave\"").unwrap();
        assert_eq!(status, EmployeeStatus::OnLeave);
        assert!(serde_json::from_str::<EmployeeStatus>("\"Vacation\"").is_err());
    }

    #[test]
    fn test_employee_serializes_camel_case() {
        let employee = Employee {
            id: 7,
            name: "Ana".into(),
            department: "Kitchen".into(),
            birthday: NaiveDate::from_ymd_opt(1990, 5, 1),
            address: None,
            age: Some(34),
            gender: None,
            phone: None,
            hire_date: NaiveDate::from_ymd_opt(2020, 1, 15),
            status: EmployeeStatus::OnLeave,
            created_at: 1,
            updated_at: 2,
        };
        let json = serde_json::to_value(&employee).unwrap();
        assert_eq!(json["hireDate"], "2020-01-15");
        assert_eq!(json["birthday"], "1990-05-01");
        assert_eq!(json["status"], "On Leave");
        assert_eq!(json["createdAt"], 1);
    }

    #[test]
    fn test_detail_flattens_employee() {
        let detail = EmployeeDetail {
            employee: Employee {
                id: 1,
                name: "Ana".into(),
                department: "Kitchen".into(),
                birthday: None,
                address: None,
                age: None,
                gender: None,
                phone: None,
                hire_date: None,
                status: EmployeeStatus::Active,
                created_at: 0,
                updated_at: 0,
            },
            leave: LeaveHistory {
                period_start: NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(),
                period_end: NaiveDate::from_ymd_opt(2024, 4, 10).unwrap(),
                dates: vec![],
            },
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["name"], "Ana");
        assert_eq!(json["leave"]["periodStart"], "2024-03-11");
    }

    #[test]
    fn test_create_payload_defaults() {
        let payload: EmployeeCreate =
            serde_json::from_str(r#"{"name":"Ana","status":"On Leave"}"#).unwrap();
        assert_eq!(payload.department, "");
        assert_eq!(payload.status, Some(EmployeeStatus::OnLeave));
        assert!(payload.leave_date.is_none());
    }
}
