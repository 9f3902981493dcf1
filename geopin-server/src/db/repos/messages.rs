//! Message repository
//!
//! Every read joins `users` for the author name. Creation locks the parent
//! point row so a concurrent delete cannot orphan the message.

use std::collections::HashMap;

use geopin_core::UserId;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::db::records::Message;
use crate::db::DbError;
use crate::models::MessageText;

const SELECT_MESSAGES: &str = r#"
    SELECT m.id, m.point_id, m.text, m.author_id, u.username AS author,
           m.created_at, m.updated_at
    FROM messages m
    JOIN users u ON u.id = m.author_id
"#;

pub(crate) fn message_from_row(r: &PgRow) -> Message {
    Message {
        id: r.get("id"),
        point_id: r.get("point_id"),
        text: r.get("text"),
        author_id: UserId(r.get("author_id")),
        author: r.get("author"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    }
}

/// Message repository
pub struct MessageRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> MessageRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add a message to a point (atomic with the existence check).
    pub async fn create(
        &self,
        point_id: i64,
        author: UserId,
        text: MessageText,
    ) -> Result<Message, DbError> {
        let mut tx = self.pool.begin().await?;

        let point: Option<(i64,)> = sqlx::query_as("SELECT id FROM points WHERE id = $1 FOR SHARE")
            .bind(point_id)
            .fetch_optional(&mut *tx)
            .await?;

        if point.is_none() {
            return Err(DbError::point_not_found(point_id));
        }

        let row = sqlx::query(
            r#"
            WITH inserted AS (
                INSERT INTO messages (text, author_id, point_id)
                VALUES ($1, $2, $3)
                RETURNING id, point_id, text, author_id, created_at, updated_at
            )
            SELECT i.id, i.point_id, i.text, i.author_id, u.username AS author,
                   i.created_at, i.updated_at
            FROM inserted i
            JOIN users u ON u.id = i.author_id
            "#,
        )
        .bind(text.as_str())
        .bind(author.0)
        .bind(point_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(message_from_row(&row))
    }

    pub async fn get(&self, id: i64) -> Result<Message, DbError> {
        let sql = format!("{SELECT_MESSAGES} WHERE m.id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::message_not_found(id))?;

        Ok(message_from_row(&row))
    }

    pub async fn list_for_point(&self, point_id: i64) -> Result<Vec<Message>, DbError> {
        let sql = format!("{SELECT_MESSAGES} WHERE m.point_id = $1 ORDER BY m.id");
        let rows = sqlx::query(&sql)
            .bind(point_id)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.iter().map(message_from_row).collect())
    }

    /// All messages grouped by point, in one query (no N+1).
    pub async fn all_by_point(&self) -> Result<HashMap<i64, Vec<Message>>, DbError> {
        let sql = format!("{SELECT_MESSAGES} ORDER BY m.point_id, m.id");
        let rows = sqlx::query(&sql).fetch_all(self.pool).await?;

        let mut grouped: HashMap<i64, Vec<Message>> = HashMap::new();
        for message in rows.iter().map(message_from_row) {
            grouped.entry(message.point_id).or_default().push(message);
        }
        Ok(grouped)
    }

    pub async fn update_text(&self, id: i64, text: MessageText) -> Result<Message, DbError> {
        let row = sqlx::query(
            r#"
            WITH updated AS (
                UPDATE messages
                SET text = $2, updated_at = NOW()
                WHERE id = $1
                RETURNING id, point_id, text, author_id, created_at, updated_at
            )
            SELECT d.id, d.point_id, d.text, d.author_id, u.username AS author,
                   d.created_at, d.updated_at
            FROM updated d
            JOIN users u ON u.id = d.author_id
            "#,
        )
        .bind(id)
        .bind(text.as_str())
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::message_not_found(id))?;

        Ok(message_from_row(&row))
    }

    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::message_not_found(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_on_missing_point_is_not_found() {
        use super::*;
        use crate::db::{create_pool, migrations, PoolSettings};

        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url, &PoolSettings::single())
            .await
            .expect("pool creation failed");
        migrations::run(&pool).await.expect("migrations failed");

        let err = MessageRepo::new(&pool)
            .create(i64::MAX, UserId(1), MessageText::new("hello").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { resource: "point", .. }));
    }
}
