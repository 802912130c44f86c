//! Leave Ledger Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::serde_helpers;

/// One recorded leave day, joined with the employee name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct LeaveEntry {
    pub id: i64,
    pub employee_id: i64,
    pub employee_name: String,
    pub leave_date: NaiveDate,
    pub created_at: i64,
}

/// Leave days of one employee inside one period, newest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveHistory {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub dates: Vec<NaiveDate>,
}

/// Mark one leave day (`leaveDate` defaults to today)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveEntryCreate {
    #[serde(default, deserialize_with = "serde_helpers::option_id")]
    pub employee_id: Option<i64>,
    pub leave_date: Option<String>,
}

/// Move a leave entry to another employee and/or date
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveEntryUpdate {
    #[serde(default, deserialize_with = "serde_helpers::option_id")]
    pub employee_id: Option<i64>,
    pub leave_date: Option<String>,
}

/// Mark a date range for several employees at once
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveBulkCreate {
    #[serde(default, deserialize_with = "serde_helpers::ids")]
    pub employee_ids: Vec<i64>,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveBulkResult {
    pub created: usize,
    pub skipped: usize,
    pub entries: Vec<LeaveEntry>,
}
