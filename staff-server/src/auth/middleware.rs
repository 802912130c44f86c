//! Authentication middleware
//!
//! `require_auth` validates `Authorization: Bearer <token>` and injects
//! [`CurrentUser`] into the request extensions. `require_admin` must be layered
//! inside it.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use shared::error::{AppError, ErrorCode};

use super::jwt::{CurrentUser, JwtError, JwtService};
use crate::state::AppState;

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            tracing::warn!(uri = %req.uri(), "Missing authorization header");
            return Err(AppError::not_authenticated());
        }
    };

    let user = state
        .jwt
        .validate_token(token)
        .and_then(CurrentUser::try_from)
        .map_err(|e| {
            tracing::warn!(uri = %req.uri(), error = %e, "Token rejected");
            match e {
                JwtError::ExpiredToken => AppError::token_expired(),
                _ => AppError::invalid_token("Invalid token"),
            }
        })?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(AppError::not_authenticated)?;

    if !user.is_admin() {
        tracing::warn!(user_id = user.id, username = %user.username, "Admin role required");
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    Ok(next.run(req).await)
}

/// Handlers behind `require_auth` take `CurrentUser` as an argument
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(AppError::not_authenticated)
    }
}
