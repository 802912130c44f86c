//! Leave rejection taxonomy

use chrono::NaiveDate;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

use super::period::LeavePeriod;
use crate::db::RepoError;

#[derive(Debug, Error)]
pub enum LeaveError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("leave limit of {max} days reached for period {period} ({count} recorded)")]
    QuotaExceeded {
        period: LeavePeriod,
        count: i64,
        max: u32,
    },

    #[error("leave already recorded for {date}")]
    DuplicateDate { date: NaiveDate },

    #[error("employee {0} not found")]
    EmployeeNotFound(i64),

    #[error("leave entry {0} not found")]
    EntryNotFound(i64),

    #[error("date range covers {days} days, at most {max} allowed")]
    RangeTooLong { days: i64, max: i64 },

    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for LeaveError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Unavailable(msg) => LeaveError::StorageUnavailable(msg),
            other => LeaveError::Repo(other),
        }
    }
}

impl From<sqlx::Error> for LeaveError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::from(err).into()
    }
}

impl From<LeaveError> for AppError {
    fn from(err: LeaveError) -> Self {
        let message = err.to_string();
        match err {
            LeaveError::InvalidInput(_) => AppError::validation(message),
            LeaveError::QuotaExceeded { period, count, max } => {
                AppError::with_message(ErrorCode::LeaveQuotaExceeded, message)
                    .with_detail("periodStart", period.start.to_string())
                    .with_detail("periodEnd", period.end.to_string())
                    .with_detail("count", count)
                    .with_detail("max", max)
            }
            LeaveError::DuplicateDate { date } => {
                AppError::with_message(ErrorCode::LeaveDateDuplicate, message)
                    .with_detail("date", date.to_string())
            }
            LeaveError::EmployeeNotFound(id) => {
                AppError::with_message(ErrorCode::EmployeeNotFound, message).with_detail("id", id)
            }
            LeaveError::EntryNotFound(id) => {
                AppError::with_message(ErrorCode::LeaveEntryNotFound, message).with_detail("id", id)
            }
            LeaveError::RangeTooLong { days, max } => {
                AppError::with_message(ErrorCode::LeaveRangeTooLong, message)
                    .with_detail("days", days)
                    .with_detail("max", max)
            }
            LeaveError::StorageUnavailable(source) => {
                tracing::error!(error = %source, "Leave storage unavailable");
                AppError::storage_unavailable(message)
            }
            LeaveError::Repo(source) => source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leave::period::period_for;

    #[test]
    fn test_quota_exceeded_carries_period() {
        let period = period_for(NaiveDate::from_ymd_opt(2024, 4, 5).unwrap(), 11);
        let app: AppError = LeaveError::QuotaExceeded {
            period,
            count: 4,
            max: 4,
        }
        .into();

        assert_eq!(app.code, ErrorCode::LeaveQuotaExceeded);
        assert_eq!(app.http_status(), http::StatusCode::BAD_REQUEST);
        let details = app.details.unwrap();
        assert_eq!(details["periodStart"], "2024-03-11");
        assert_eq!(details["periodEnd"], "2024-04-10");
        assert_eq!(details["count"], 4);
    }

    #[test]
    fn test_status_mapping() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        let cases: Vec<(LeaveError, http::StatusCode)> = vec![
            (
                LeaveError::InvalidInput("bad date".into()),
                http::StatusCode::BAD_REQUEST,
            ),
            (
                LeaveError::DuplicateDate { date },
                http::StatusCode::CONFLICT,
            ),
            (LeaveError::EmployeeNotFound(9), http::StatusCode::NOT_FOUND),
            (LeaveError::EntryNotFound(9), http::StatusCode::NOT_FOUND),
            (
                LeaveError::from(sqlx::Error::PoolTimedOut),
                http::StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).http_status(), status);
        }
    }

    #[test]
    fn test_storage_errors_classified_like_repositories() {
        let busy = LeaveError::from(RepoError::Unavailable("database is locked".into()));
        assert!(matches!(busy, LeaveError::StorageUnavailable(_)));
        assert_eq!(AppError::from(busy).code, ErrorCode::StorageUnavailable);

        let broken = LeaveError::from(RepoError::Database("no such column".into()));
        let app = AppError::from(broken);
        assert_eq!(app.code, ErrorCode::DatabaseError);
        assert_eq!(app.http_status(), http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
