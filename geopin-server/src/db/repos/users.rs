//! User and token repository
//!
//! - create: INSERT ... ON CONFLICT DO NOTHING, no check-then-insert
//! - tokens: one per user, enforced by a UNIQUE column

use geopin_core::UserId;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::db::records::User;
use crate::db::DbError;
use crate::models::Username;

fn user_from_row(r: &PgRow) -> User {
    User {
        id: UserId(r.get("id")),
        username: r.get("username"),
        password_hash: r.get("password_hash"),
        created_at: r.get("created_at"),
    }
}

/// User repository
pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a user. The unique constraint decides conflicts.
    pub async fn create(&self, username: &Username, password_hash: &str) -> Result<User, DbError> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            ON CONFLICT (username) DO NOTHING
            RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(username.as_str())
        .bind(password_hash)
        .fetch_optional(self.pool)
        .await?
        .ok_or(DbError::Conflict {
            resource: "user",
            field: "username",
        })?;

        Ok(user_from_row(&row))
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }
}

/// API token repository
pub struct TokenRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> TokenRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Keep the existing token, or store `candidate` as the user's token.
    pub async fn get_or_create(&self, user: UserId, candidate: &str) -> Result<String, DbError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO auth_tokens (key, user_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(candidate)
        .bind(user.0)
        .execute(&mut *tx)
        .await?;

        let (key,): (String,) = sqlx::query_as("SELECT key FROM auth_tokens WHERE user_id = $1")
            .bind(user.0)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(key)
    }

    pub async fn user_for_key(&self, key: &str) -> Result<Option<User>, DbError> {
        let row = sqlx::query(
            r#"
            SELECT u.id, u.username, u.password_hash, u.created_at
            FROM auth_tokens t
            JOIN users u ON u.id = t.user_id
            WHERE t.key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    pub async fn delete_for_user(&self, user: UserId) -> Result<(), DbError> {
        sqlx::query("DELETE FROM auth_tokens WHERE user_id = $1")
            .bind(user.0)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
