//! Store trait - the persistence seam
//!
//! Handlers only talk to `dyn Store`. Two backends implement it:
//! - `PgStore`: PostgreSQL via sqlx
//! - `MemoryStore`: in-process maps, for tests and throwaway dev runs
//!
//! Contract shared by both:
//! - `get_*`, `update_*`, `delete_*` return `DbError::NotFound` for unknown ids
//! - `create_message` returns `DbError::NotFound` if the point is gone
//! - `delete_point` removes the point's messages too
//! - `list_points` returns points by ascending id, each with its messages

use async_trait::async_trait;
use geopin_core::UserId;

use super::records::{Message, Point, User};
use crate::models::{MessageText, NewPoint, PointChanges, Username};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("conflict: {resource} with this {field} already exists")]
    Conflict {
        resource: &'static str,
        field: &'static str,
    },
}

impl DbError {
    pub(crate) fn point_not_found(id: i64) -> Self {
        Self::NotFound {
            resource: "point",
            id: id.to_string(),
        }
    }

    pub(crate) fn message_not_found(id: i64) -> Self {
        Self::NotFound {
            resource: "message",
            id: id.to_string(),
        }
    }
}

/// Persistence operations used by the HTTP layer
#[async_trait]
pub trait Store: Send + Sync + 'static {
    // Accounts

    /// Insert a user; `Conflict` if the username is taken.
    async fn create_user(&self, username: &Username, password_hash: &str) -> Result<User, DbError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DbError>;

    /// Return the user's token, storing `candidate` if they have none yet.
    async fn get_or_create_token(&self, user: UserId, candidate: &str) -> Result<String, DbError>;

    async fn user_for_token(&self, key: &str) -> Result<Option<User>, DbError>;

    /// Drop the user's token. A no-op if there is none.
    async fn delete_token(&self, user: UserId) -> Result<(), DbError>;

    // Points

    async fn list_points(&self) -> Result<Vec<Point>, DbError>;

    async fn get_point(&self, id: i64) -> Result<Point, DbError>;

    async fn create_point(&self, creator: UserId, point: NewPoint) -> Result<Point, DbError>;

    async fn update_point(&self, id: i64, changes: PointChanges) -> Result<Point, DbError>;

    async fn delete_point(&self, id: i64) -> Result<(), DbError>;

    // Messages

    /// Messages of a point by ascending id; empty if the point does not exist.
    async fn list_messages(&self, point_id: i64) -> Result<Vec<Message>, DbError>;

    async fn get_message(&self, id: i64) -> Result<Message, DbError>;

    async fn create_message(
        &self,
        point_id: i64,
        author: UserId,
        text: MessageText,
    ) -> Result<Message, DbError>;

    async fn update_message(&self, id: i64, text: MessageText) -> Result<Message, DbError>;

    async fn delete_message(&self, id: i64) -> Result<(), DbError>;
}
