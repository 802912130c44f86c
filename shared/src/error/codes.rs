//! Unified error codes for the staff service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Account errors
//! - 80xx-81xx: Employee errors
//! - 82xx-89xx: Leave errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the dashboard can
/// switch on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 3xxx: Account ====================
    /// Dashboard account not found
    UserNotFound = 3001,
    /// Username already taken
    UsernameExists = 3002,
    /// Password too short
    PasswordTooShort = 3003,

    // ==================== 80xx: Employee ====================
    /// Employee not found
    EmployeeNotFound = 8001,
    /// Another employee in the department has the same name
    EmployeeNameExists = 8002,

    // ==================== 82xx: Leave ====================
    /// Leave days for the period are used up
    LeaveQuotaExceeded = 8201,
    /// Leave already recorded for that date
    LeaveDateDuplicate = 8202,
    /// Leave entry not found
    LeaveEntryNotFound = 8203,
    /// Bulk leave range is too long
    LeaveRangeTooLong = 8204,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Operation timed out
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Storage unreachable or busy, retry later
    StorageUnavailable = 9405,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field missing",
            ErrorCode::ValueOutOfRange => "Value out of range",

            // Auth
            ErrorCode::NotAuthenticated => "Authentication required",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Token has expired",
            ErrorCode::TokenInvalid => "Token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Admin role required",

            // Account
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::UsernameExists => "Username already exists",
            ErrorCode::PasswordTooShort => "Password is too short",

            // Employee
            ErrorCode::EmployeeNotFound => "Employee not found",
            ErrorCode::EmployeeNameExists => {
                "An employee with this name already exists in this department"
            }

            // Leave
            ErrorCode::LeaveQuotaExceeded => "Leave limit reached for this period",
            ErrorCode::LeaveDateDuplicate => "Leave already recorded for this date",
            ErrorCode::LeaveEntryNotFound => "Leave entry not found",
            ErrorCode::LeaveRangeTooLong => "Leave date range is too long",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::StorageUnavailable => "Storage unavailable, please retry later",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::AdminRequired),

            // Account
            3001 => Ok(ErrorCode::UserNotFound),
            3002 => Ok(ErrorCode::UsernameExists),
            3003 => Ok(ErrorCode::PasswordTooShort),

            // Employee
            8001 => Ok(ErrorCode::EmployeeNotFound),
            8002 => Ok(ErrorCode::EmployeeNameExists),

            // Leave
            8201 => Ok(ErrorCode::LeaveQuotaExceeded),
            8202 => Ok(ErrorCode::LeaveDateDuplicate),
            8203 => Ok(ErrorCode::LeaveEntryNotFound),
            8204 => Ok(ErrorCode::LeaveRangeTooLong),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9405 => Ok(ErrorCode::StorageUnavailable),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
