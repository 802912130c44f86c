//! Shared helpers for request validation and credentials

use chrono::NaiveDate;
use shared::error::{AppError, ErrorCode};

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    use argon2::password_hash::SaltString;
    use argon2::password_hash::rand_core::OsRng;
    use argon2::{Argon2, PasswordHasher};
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Strict `YYYY-MM-DD` calendar date
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    let value = value.trim();
    let well_formed = value.len() == 10
        && value.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(invalid_date(field, value));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid_date(field, value))
}

/// Optional date field; blank strings count as absent
pub fn parse_optional_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_date(field, v).map(Some),
    }
}

fn invalid_date(field: &str, value: &str) -> AppError {
    AppError::with_message(
        ErrorCode::InvalidFormat,
        format!("{field} must be a YYYY-MM-DD date"),
    )
    .with_detail("field", field)
    .with_detail("value", value)
}

/// Trim; blank becomes `None`
pub fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn validate_required_text(field: &str, value: &str, max_len: usize) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(
            AppError::with_message(ErrorCode::RequiredField, format!("{field} is required"))
                .with_detail("field", field),
        );
    }
    if value.chars().count() > max_len {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} must be at most {max_len} characters"),
        )
        .with_detail("field", field));
    }
    Ok(value.to_string())
}

pub fn validate_age(age: Option<i64>) -> Result<Option<i64>, AppError> {
    match age {
        Some(a) if !(0..=150).contains(&a) => Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "age must be between 0 and 150",
        )
        .with_detail("field", "age")),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_roundtrip() {
        let hash = hash_password("hunter22").unwrap();
        assert!(verify_password("hunter22", &hash));
        assert!(!verify_password("hunter23", &hash));
        assert!(!verify_password("hunter22", "not-a-hash"));
    }

    #[test]
    fn test_parse_date_is_strict() {
        assert_eq!(
            parse_date("leaveDate", "2024-03-20").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
        );
        for bad in [
            "2024-3-20",
            "+2024-3-20",
            "2024-3-020",
            "2024-02-30",
            "20/03/2024",
            "2024-03-20T00:00:00",
            "",
        ] {
            let err = parse_date("leaveDate", bad).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidFormat, "{bad}");
        }
        assert_eq!(parse_optional_date("birthday", Some("  ")).unwrap(), None);
        assert_eq!(parse_optional_date("birthday", None).unwrap(), None);
    }

    #[test]
    fn test_text_helpers() {
        assert_eq!(normalize_text(Some("  x ".into())), Some("x".into()));
        assert_eq!(normalize_text(Some("   ".into())), None);
        assert_eq!(validate_required_text("name", " Ana ", 10).unwrap(), "Ana");
        assert_eq!(
            validate_required_text("name", "  ", 10).unwrap_err().code,
            ErrorCode::RequiredField
        );
        assert_eq!(
            validate_required_text("name", "abcdef", 5).unwrap_err().code,
            ErrorCode::ValueOutOfRange
        );
        assert!(validate_age(Some(-1)).is_err());
        assert_eq!(validate_age(Some(30)).unwrap(), Some(30));
    }
}
