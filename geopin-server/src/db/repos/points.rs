//! Point repository
//!
//! - list: two queries (points, then all messages) stitched in memory
//! - update: COALESCE per column so partial updates stay one statement
//! - delete: messages go with the point via ON DELETE CASCADE

use geopin_core::UserId;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::messages::MessageRepo;
use crate::db::records::{Message, Point};
use crate::db::DbError;
use crate::models::{NewPoint, PointChanges};

const SELECT_POINTS: &str = r#"
    SELECT p.id, p.name, p.description, p.latitude, p.longitude,
           p.creator_id, u.username AS creator, p.created_at, p.updated_at
    FROM points p
    JOIN users u ON u.id = p.creator_id
"#;

fn point_from_row(r: &PgRow, messages: Vec<Message>) -> Point {
    Point {
        id: r.get("id"),
        name: r.get("name"),
        description: r.get("description"),
        latitude: r.get("latitude"),
        longitude: r.get("longitude"),
        creator_id: UserId(r.get("creator_id")),
        creator: r.get("creator"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
        messages,
    }
}

/// Point repository
pub struct PointRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> PointRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All points by ascending id, each with its messages.
    pub async fn list_with_messages(&self) -> Result<Vec<Point>, DbError> {
        let sql = format!("{SELECT_POINTS} ORDER BY p.id");
        let rows = sqlx::query(&sql).fetch_all(self.pool).await?;
        let mut messages = MessageRepo::new(self.pool).all_by_point().await?;

        Ok(rows
            .iter()
            .map(|r| {
                let id: i64 = r.get("id");
                point_from_row(r, messages.remove(&id).unwrap_or_default())
            })
            .collect())
    }

    pub async fn get(&self, id: i64) -> Result<Point, DbError> {
        let sql = format!("{SELECT_POINTS} WHERE p.id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::point_not_found(id))?;

        let messages = MessageRepo::new(self.pool).list_for_point(id).await?;
        Ok(point_from_row(&row, messages))
    }

    pub async fn create(&self, creator: UserId, point: NewPoint) -> Result<Point, DbError> {
        let row = sqlx::query(
            r#"
            WITH inserted AS (
                INSERT INTO points (name, description, latitude, longitude, creator_id)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, name, description, latitude, longitude, creator_id,
                          created_at, updated_at
            )
            SELECT i.id, i.name, i.description, i.latitude, i.longitude,
                   i.creator_id, u.username AS creator, i.created_at, i.updated_at
            FROM inserted i
            JOIN users u ON u.id = i.creator_id
            "#,
        )
        .bind(point.name.as_str())
        .bind(point.description.as_str())
        .bind(point.coordinate.latitude)
        .bind(point.coordinate.longitude)
        .bind(creator.0)
        .fetch_one(self.pool)
        .await?;

        Ok(point_from_row(&row, Vec::new()))
    }

    pub async fn update(&self, id: i64, changes: PointChanges) -> Result<Point, DbError> {
        let updated: Option<(i64,)> = sqlx::query_as(
            r#"
            UPDATE points SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                latitude = COALESCE($4, latitude),
                longitude = COALESCE($5, longitude),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(changes.name.map(|n| n.into_string()))
        .bind(changes.description.map(|d| d.into_string()))
        .bind(changes.latitude)
        .bind(changes.longitude)
        .fetch_optional(self.pool)
        .await?;

        if updated.is_none() {
            return Err(DbError::point_not_found(id));
        }
        self.get(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM points WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::point_not_found(id));
        }
        Ok(())
    }
}
