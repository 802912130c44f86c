//! Authentication
//!
//! - [`JwtService`] - token issue and validation
//! - [`CurrentUser`] - caller context
//! - [`require_auth`] / [`require_admin`] - axum middleware

pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};
