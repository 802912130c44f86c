//! Data models
//!
//! Shared between the server and the dashboard (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod employee;
pub mod leave;
pub mod serde_helpers;
pub mod user;

// Re-exports
pub use employee::*;
pub use leave::*;
pub use user::*;
