//! Login and profile

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{LoginRequest, LoginResponse, User};

use super::{ApiResult, JsonBody};
use crate::auth::{CurrentUser, JwtError};
use crate::db;
use crate::state::AppState;
use crate::util::verify_password;

pub fn public_router() -> Router<AppState> {
    Router::new().route("/api/auth/login", post(login))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/auth/profile", get(profile))
}

async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let username = req.username.trim();
    if username.is_empty() || req.password.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            "username and password are required",
        ));
    }

    let credentials = db::users::find_credentials(&state.pool, username).await?;
    let user: User = match credentials {
        Some(row) if verify_password(&req.password, &row.password_hash) => row.into(),
        _ => {
            tracing::warn!(username = %username, "Login failed");
            return Err(AppError::invalid_credentials());
        }
    };

    let token = state
        .jwt
        .generate_token(&user)
        .map_err(|e: JwtError| AppError::internal(e.to_string()))?;

    tracing::info!(user_id = user.id, username = %user.username, "User logged in");
    Ok(Json(LoginResponse { token, user }))
}

async fn profile(State(state): State<AppState>, current: CurrentUser) -> ApiResult<User> {
    let user = db::users::find_by_id(&state.pool, current.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(Json(user))
}
