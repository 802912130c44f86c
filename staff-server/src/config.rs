//! Server configuration

use thiserror::Error;

use crate::leave::LeavePolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be set in {environment} environment")]
    MissingSecret { name: String, environment: String },

    #[error("invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        name: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection URL
    pub database_url: String,
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    pub jwt_secret: String,
    pub token_expiry_hours: i64,
    pub leave_policy: LeavePolicy,
    /// Departments hidden from the department list and distribution
    pub excluded_departments: Vec<String>,
    /// First admin account, created when no user exists
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any key lookup (the environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let environment = get("ENVIRONMENT").unwrap_or_else(|| "development".into());

        let period_start_day: u32 = parse_or(&get, "LEAVE_PERIOD_START_DAY", 11)?;
        if !(1..=28).contains(&period_start_day) {
            return Err(invalid(
                "LEAVE_PERIOD_START_DAY",
                period_start_day,
                "must be between 1 and 28",
            ));
        }
        let max_days_per_period: u32 = parse_or(&get, "LEAVE_MAX_DAYS_PER_PERIOD", 4)?;
        if max_days_per_period == 0 {
            return Err(invalid("LEAVE_MAX_DAYS_PER_PERIOD", 0, "must be at least 1"));
        }
        let token_expiry_hours: i64 = parse_or(&get, "TOKEN_EXPIRY_HOURS", 4)?;
        if token_expiry_hours <= 0 {
            return Err(invalid(
                "TOKEN_EXPIRY_HOURS",
                token_expiry_hours,
                "must be positive",
            ));
        }

        Ok(Self {
            database_url: get("DATABASE_URL").unwrap_or_else(|| "sqlite:staff.db".into()),
            http_port: parse_or(&get, "HTTP_PORT", 5000)?,
            jwt_secret: require_secret(&get, "JWT_SECRET", &environment)?,
            environment,
            token_expiry_hours,
            leave_policy: LeavePolicy {
                period_start_day,
                max_days_per_period,
            },
            excluded_departments: get("EXCLUDED_DEPARTMENTS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|d| !d.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            admin_username: get("ADMIN_USERNAME"),
            admin_password: get("ADMIN_PASSWORD"),
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_json: parse_or(&get, "LOG_JSON", false)?,
            log_dir: get("LOG_DIR"),
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

/// Secrets must be set outside development
fn require_secret<F>(get: &F, name: &str, environment: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match get(name) {
        Some(v) => Ok(v),
        None if environment == "development" => Ok(format!("dev-{name}-not-for-production")),
        None => Err(ConfigError::MissingSecret {
            name: name.into(),
            environment: environment.into(),
        }),
    }
}

fn parse_or<F, T>(get: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match get(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| invalid(name, &raw, e.to_string())),
    }
}

fn invalid(name: &str, value: impl ToString, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        name: name.into(),
        value: value.to_string(),
        reason: reason.into(),
    }
}
