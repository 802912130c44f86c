//! Application state shared by every handler

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::UserRole;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::auth::JwtService;
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::db::{self, DbService};
use crate::leave::{LeavePolicy, LeaveService};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub jwt: Arc<JwtService>,
    pub leave: LeaveService,
    /// Hidden from the department list and the distribution chart
    pub excluded_departments: Arc<Vec<String>>,
}

impl AppState {
    /// Open the database, apply migrations and bootstrap the first admin
    pub async fn new(config: &Config) -> AppResult<Self> {
        let db = DbService::new(&config.database_url).await?;
        let state = Self::with_parts(
            db.pool,
            JwtService::new(&config.jwt_secret, config.token_expiry_hours),
            config.leave_policy,
            Arc::new(SystemClock),
            config.excluded_departments.clone(),
        );

        if let (Some(username), Some(password)) = (&config.admin_username, &config.admin_password)
        {
            state.bootstrap_admin(username, password).await?;
        }
        Ok(state)
    }

    pub fn with_parts(
        pool: SqlitePool,
        jwt: JwtService,
        policy: LeavePolicy,
        clock: Arc<dyn Clock>,
        excluded_departments: Vec<String>,
    ) -> Self {
        Self {
            leave: LeaveService::new(pool.clone(), policy, clock),
            pool,
            jwt: Arc::new(jwt),
            excluded_departments: Arc::new(excluded_departments),
        }
    }

    pub fn is_excluded_department(&self, department: &str) -> bool {
        self.excluded_departments.iter().any(|d| d == department)
    }

    /// Create an admin account when the users table is empty.
    /// Returns whether an account was created.
    pub async fn bootstrap_admin(&self, username: &str, password: &str) -> AppResult<bool> {
        if db::users::count(&self.pool).await? > 0 {
            return Ok(false);
        }
        let hash = crate::util::hash_password(password).map_err(|e| {
            AppError::with_message(ErrorCode::InternalError, format!("Failed to hash password: {e}"))
        })?;
        let user = db::users::create(&self.pool, username, &hash, UserRole::Admin).await?;
        tracing::info!(user_id = user.id, username = %user.username, "Bootstrapped admin account");
        Ok(true)
    }
}
