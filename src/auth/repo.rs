use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

/// Gates access to the admin panel routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

/// User record. The schema carries no UNIQUE constraint on username, so
/// several rows may share one username.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
}

impl User {
    /// Insert a new user. No uniqueness check by design.
    pub async fn create(
        db: &SqlitePool,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, role)
            VALUES (?, ?, ?)
            RETURNING id, username, password_hash, role
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(role)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// All rows with this username, in insertion order. Login verifies the
    /// password against each candidate and takes the first match, which
    /// keeps the first-matching-row behavior when usernames collide.
    pub async fn find_by_username(db: &SqlitePool, username: &str) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, role
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_all(db)
        .await?;
        Ok(users)
    }
}
