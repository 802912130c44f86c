//! Dashboard User Repository

use super::RepoResult;
use shared::models::{User, UserRole};
use sqlx::{Executor, Sqlite};

/// User row including the password hash (never serialized)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserCredentials {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: i64,
}

impl From<UserCredentials> for User {
    fn from(row: UserCredentials) -> Self {
        Self {
            id: row.id,
            username: row.username,
            role: row.role,
            created_at: row.created_at,
        }
    }
}

pub async fn list<'e, E>(db: E) -> RepoResult<Vec<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let users = sqlx::query_as::<_, User>(
        "SELECT id, username, role, created_at FROM users ORDER BY id",
    )
    .fetch_all(db)
    .await?;
    Ok(users)
}

pub async fn find_by_id<'e, E>(db: E, id: i64) -> RepoResult<Option<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, role, created_at FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

pub async fn find_credentials<'e, E>(db: E, username: &str) -> RepoResult<Option<UserCredentials>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, UserCredentials>(
        "SELECT id, username, password_hash, role, created_at FROM users WHERE username = ? LIMIT 1",
    )
    .bind(username)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Insert a new account. A taken username surfaces as `RepoError::Duplicate`.
pub async fn create<'e, E>(
    db: E,
    username: &str,
    password_hash: &str,
    role: UserRole,
) -> RepoResult<User>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = shared::util::now_millis();
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (username, password_hash, role, created_at) VALUES (?1, ?2, ?3, ?4) RETURNING id, username, role, created_at",
    )
    .bind(username)
    .bind(password_hash)
    .bind(role)
    .bind(now)
    .fetch_one(db)
    .await?;
    Ok(user)
}

pub async fn count<'e, E>(db: E) -> RepoResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(db)
        .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{RepoError, test_pool};

    #[tokio::test]
    async fn test_create_and_lookup() {
        let pool = test_pool().await;
        assert_eq!(count(&pool).await.unwrap(), 0);

        let user = create(&pool, "ops", "hash", UserRole::Viewer).await.unwrap();
        assert_eq!(user.username, "ops");
        assert_eq!(user.role, UserRole::Viewer);

        let creds = find_credentials(&pool, "ops").await.unwrap().unwrap();
        assert_eq!(creds.password_hash, "hash");
        assert_eq!(User::from(creds), user);

        assert_eq!(find_by_id(&pool, user.id).await.unwrap(), Some(user));
        assert!(find_credentials(&pool, "nobody").await.unwrap().is_none());
        assert_eq!(list(&pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let pool = test_pool().await;
        create(&pool, "ops", "hash", UserRole::Admin).await.unwrap();
        let err = create(&pool, "ops", "other", UserRole::Admin).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }
}
