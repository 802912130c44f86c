//! HTTP API
//!
//! - [`health`] - liveness (public)
//! - [`auth`] - login (public) and profile
//! - [`employees`] - employee directory and dashboard statistics
//! - [`leave`] - leave ledger
//! - [`users`] - dashboard accounts (admin only)

pub mod auth;
pub mod employees;
pub mod health;
pub mod leave;
pub mod users;

use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::{Json, Router, middleware};
use serde::de::DeserializeOwned;
use shared::error::AppError;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::state::AppState;

pub type ApiResult<T> = Result<Json<T>, AppError>;

/// Fully configured application router
pub fn build_app(state: AppState) -> Router {
    let protected = Router::new()
        .merge(auth::router())
        .merge(employees::router())
        .merge(leave::router())
        .merge(users::router())
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(health::router())
        .merge(auth::public_router())
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// JSON body whose rejection renders as an [`AppError`]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Numeric `{id}` path segment
pub struct IdPath(pub i64);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state).await?;
        Ok(Self(id))
    }
}
