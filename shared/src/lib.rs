//! Shared types for the staff service
//!
//! Wire models, the unified error system and small utilities used by the
//! server and its tests.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};
