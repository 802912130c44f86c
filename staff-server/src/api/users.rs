//! Dashboard account management (admin only)

use axum::{Json, Router, extract::State, http::StatusCode, middleware, routing::get};
use shared::error::{AppError, ErrorCode};
use shared::models::{User, UserCreate};

use super::{ApiResult, JsonBody};
use crate::auth::{CurrentUser, require_admin};
use crate::db::{self, RepoError};
use crate::state::AppState;
use crate::util::{hash_password, validate_required_text};

const MIN_PASSWORD_LEN: usize = 6;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/users", get(list).post(create))
        .layer(middleware::from_fn(require_admin))
}

async fn list(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    Ok(Json(db::users::list(&state.pool).await?))
}

async fn create(
    State(state): State<AppState>,
    current: CurrentUser,
    JsonBody(payload): JsonBody<UserCreate>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let username = validate_required_text("username", &payload.username, 64)?;
    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::new(ErrorCode::PasswordTooShort).with_detail("min", MIN_PASSWORD_LEN));
    }

    let hash = hash_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;
    let role = payload.role.unwrap_or_default();
    let user = db::users::create(&state.pool, &username, &hash, role)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => {
                AppError::new(ErrorCode::UsernameExists).with_detail("username", username.as_str())
            }
            other => other.into(),
        })?;

    tracing::info!(
        user_id = user.id,
        username = %user.username,
        role = role.as_str(),
        created_by = current.id,
        "User created"
    );
    Ok((StatusCode::CREATED, Json(user)))
}
