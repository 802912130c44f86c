//! Database Module
//!
//! SQLite connection pool, migrations and the repositories.

pub mod employees;
pub mod leave;
pub mod users;

use shared::error::{AppError, ErrorCode};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound(err.to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::Duplicate(db.message().to_string())
            }
            sqlx::Error::Database(db) if is_busy(db.code().as_deref()) => {
                RepoError::Unavailable(db.message().to_string())
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                RepoError::Unavailable(err.to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

/// SQLITE_BUSY (5) / SQLITE_LOCKED (6), including their extended codes:
/// busy_timeout ran out waiting for the write lock
fn is_busy(code: Option<&str>) -> bool {
    code.and_then(|c| c.parse::<i32>().ok())
        .is_some_and(|c| matches!(c & 0xff, 5 | 6))
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Database(msg) => AppError::database(msg),
            RepoError::Unavailable(msg) => AppError::storage_unavailable(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Database service. Owns a SQLite connection pool
#[derive(Clone)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Open (or create) the database at `url` with WAL, foreign keys and a busy timeout,
    /// then apply migrations.
    pub async fn new(url: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| AppError::with_message(ErrorCode::ConfigError, format!("Invalid database url: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await
            .map_err(|e| AppError::storage_unavailable(format!("Failed to open database: {e}")))?;

        tracing::info!(url = %url, "Database connection established (SQLite WAL, busy_timeout=5000ms)");

        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    /// Private in-memory database with the full schema.
    ///
    /// A single connection is kept alive for the lifetime of the pool, every
    /// `sqlite::memory:` connection would otherwise see its own empty database.
    pub async fn in_memory() -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AppError::database(e.to_string()))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;

        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    async fn migrate(pool: &SqlitePool) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;
        tracing::debug!("Database migrations applied");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    DbService::in_memory().await.unwrap().pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_has_schema() {
        let pool = test_pool().await;
        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('employees', 'leave_entries', 'users') ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(tables, vec!["employees", "leave_entries", "users"]);
    }

    #[tokio::test]
    async fn test_unique_violation_maps_to_duplicate() {
        let pool = test_pool().await;
        let insert = "INSERT INTO users (username, password_hash, role, created_at) VALUES ('ops', 'x', 'admin', 0)";
        sqlx::query(insert).execute(&pool).await.unwrap();
        let err: RepoError = sqlx::query(insert).execute(&pool).await.unwrap_err().into();
        assert!(matches!(err, RepoError::Duplicate(_)));

        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::AlreadyExists);
    }

    #[tokio::test]
    async fn test_locked_database_maps_to_unavailable() {
        let path = std::env::temp_dir().join(format!("staff-busy-{}.db", std::process::id()));
        let url = format!("sqlite:{}", path.display());
        let holder = DbService::new(&url).await.unwrap().pool;

        let options = SqliteConnectOptions::from_str(&url)
            .unwrap()
            .busy_timeout(Duration::from_millis(50));
        let waiter = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();

        let mut tx = holder.begin().await.unwrap();
        sqlx::query("INSERT INTO users (username, password_hash, role, created_at) VALUES ('a', 'x', 'admin', 0)")
            .execute(&mut *tx)
            .await
            .unwrap();

        let err: RepoError = sqlx::query(
            "INSERT INTO users (username, password_hash, role, created_at) VALUES ('b', 'x', 'admin', 0)",
        )
        .execute(&waiter)
        .await
        .unwrap_err()
        .into();
        assert!(matches!(err, RepoError::Unavailable(_)), "{err:?}");

        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::StorageUnavailable);
        assert_eq!(app.http_status(), http::StatusCode::SERVICE_UNAVAILABLE);

        tx.rollback().await.unwrap();
        holder.close().await;
        waiter.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
        }
    }

    #[test]
    fn test_busy_codes() {
        assert!(is_busy(Some("5")));
        assert!(is_busy(Some("517")));
        assert!(is_busy(Some("6")));
        assert!(!is_busy(Some("2067")));
        assert!(!is_busy(None));
    }

    #[test]
    fn test_unavailable_maps_to_503() {
        let app: AppError = RepoError::from(sqlx::Error::PoolTimedOut).into();
        assert_eq!(app.code, ErrorCode::StorageUnavailable);
        assert_eq!(app.http_status(), http::StatusCode::SERVICE_UNAVAILABLE);
    }
}
