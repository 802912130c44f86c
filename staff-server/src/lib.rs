//! staff-server: staff directory with leave-period accounting
//!
//! - [`leave`] - period arithmetic, quota policy, status reconciliation
//! - [`db`] - SQLite pool, migrations and repositories
//! - [`api`] - axum routers and handlers
//! - [`auth`] - JWT authentication middleware

pub mod api;
pub mod auth;
pub mod clock;
pub mod config;
pub mod db;
pub mod leave;
pub mod logger;
pub mod state;
pub mod util;

pub use api::build_app;
pub use config::Config;
pub use state::AppState;
