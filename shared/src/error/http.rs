//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::UserNotFound
            | Self::EmployeeNotFound
            | Self::LeaveEntryNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::UsernameExists
            | Self::EmployeeNameExists
            | Self::LeaveDateDuplicate => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied | Self::AdminRequired => StatusCode::FORBIDDEN,

            // 503 Service Unavailable (transient, client can retry)
            Self::TimeoutError | Self::StorageUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::Unknown | Self::InternalError | Self::DatabaseError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (validation and leave policy rejections)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
