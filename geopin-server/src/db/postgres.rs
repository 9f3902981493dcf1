//! PostgreSQL-backed `Store`

use async_trait::async_trait;
use geopin_core::UserId;
use sqlx::PgPool;

use super::records::{Message, Point, User};
use super::repos::{MessageRepo, PointRepo, TokenRepo, UserRepo};
use super::store::{DbError, Store};
use crate::models::{MessageText, NewPoint, PointChanges, Username};

/// Store over a sqlx connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, username: &Username, password_hash: &str) -> Result<User, DbError> {
        UserRepo::new(&self.pool).create(username, password_hash).await
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
        UserRepo::new(&self.pool).find_by_username(username).await
    }

    async fn get_or_create_token(&self, user: UserId, candidate: &str) -> Result<String, DbError> {
        TokenRepo::new(&self.pool).get_or_create(user, candidate).await
    }

    async fn user_for_token(&self, key: &str) -> Result<Option<User>, DbError> {
        TokenRepo::new(&self.pool).user_for_key(key).await
    }

    async fn delete_token(&self, user: UserId) -> Result<(), DbError> {
        TokenRepo::new(&self.pool).delete_for_user(user).await
    }

    async fn list_points(&self) -> Result<Vec<Point>, DbError> {
        PointRepo::new(&self.pool).list_with_messages().await
    }

    async fn get_point(&self, id: i64) -> Result<Point, DbError> {
        PointRepo::new(&self.pool).get(id).await
    }

    async fn create_point(&self, creator: UserId, point: NewPoint) -> Result<Point, DbError> {
        PointRepo::new(&self.pool).create(creator, point).await
    }

    async fn update_point(&self, id: i64, changes: PointChanges) -> Result<Point, DbError> {
        PointRepo::new(&self.pool).update(id, changes).await
    }

    async fn delete_point(&self, id: i64) -> Result<(), DbError> {
        PointRepo::new(&self.pool).delete(id).await
    }

    async fn list_messages(&self, point_id: i64) -> Result<Vec<Message>, DbError> {
        MessageRepo::new(&self.pool).list_for_point(point_id).await
    }

    async fn get_message(&self, id: i64) -> Result<Message, DbError> {
        MessageRepo::new(&self.pool).get(id).await
    }

    async fn create_message(
        &self,
        point_id: i64,
        author: UserId,
        text: MessageText,
    ) -> Result<Message, DbError> {
        MessageRepo::new(&self.pool).create(point_id, author, text).await
    }

    async fn update_message(&self, id: i64, text: MessageText) -> Result<Message, DbError> {
        MessageRepo::new(&self.pool).update_text(id, text).await
    }

    async fn delete_message(&self, id: i64) -> Result<(), DbError> {
        MessageRepo::new(&self.pool).delete(id).await
    }
}
