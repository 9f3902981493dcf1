//! In-memory `Store`
//!
//! Backs the HTTP tests and `geopin serve --in-memory`. Data lives in
//! ordered maps behind one `RwLock`, so every operation is atomic and
//! iteration follows ascending ids like the PostgreSQL backend.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use geopin_core::UserId;
use tokio::sync::RwLock;

use super::records::{Message, Point, User};
use super::store::{DbError, Store};
use crate::models::{MessageText, NewPoint, PointChanges, Username};

#[derive(Debug, Clone)]
struct PointRow {
    id: i64,
    name: String,
    description: String,
    latitude: f64,
    longitude: f64,
    creator_id: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct MessageRow {
    id: i64,
    point_id: i64,
    text: String,
    author_id: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Default)]
struct Inner {
    last_user_id: i64,
    last_point_id: i64,
    last_message_id: i64,
    users: BTreeMap<UserId, User>,
    tokens: HashMap<String, UserId>,
    points: BTreeMap<i64, PointRow>,
    messages: BTreeMap<i64, MessageRow>,
}

impl Inner {
    fn username(&self, id: UserId) -> String {
        self.users
            .get(&id)
            .map(|u| u.username.clone())
            .unwrap_or_default()
    }

    fn message(&self, row: &MessageRow) -> Message {
        Message {
            id: row.id,
            point_id: row.point_id,
            text: row.text.clone(),
            author_id: row.author_id,
            author: self.username(row.author_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    fn messages_of(&self, point_id: i64) -> Vec<Message> {
        self.messages
            .values()
            .filter(|m| m.point_id == point_id)
            .map(|m| self.message(m))
            .collect()
    }

    fn point(&self, row: &PointRow) -> Point {
        Point {
            id: row.id,
            name: row.name.clone(),
            description: row.description.clone(),
            latitude: row.latitude,
            longitude: row.longitude,
            creator_id: row.creator_id,
            creator: self.username(row.creator_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
            messages: self.messages_of(row.id),
        }
    }
}

/// Store kept entirely in process memory
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, username: &Username, password_hash: &str) -> Result<User, DbError> {
        let mut inner = self.inner.write().await;

        if inner.users.values().any(|u| u.username == username.as_str()) {
            return Err(DbError::Conflict {
                resource: "user",
                field: "username",
            });
        }

        inner.last_user_id += 1;
        let user = User {
            id: UserId(inner.last_user_id),
            username: username.as_str().to_owned(),
            password_hash: password_hash.to_owned(),
            created_at: Utc::now(),
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.username == username).cloned())
    }

    async fn get_or_create_token(&self, user: UserId, candidate: &str) -> Result<String, DbError> {
        let mut inner = self.inner.write().await;

        if let Some((key, _)) = inner.tokens.iter().find(|(_, owner)| **owner == user) {
            return Ok(key.clone());
        }
        inner.tokens.insert(candidate.to_owned(), user);
        Ok(candidate.to_owned())
    }

    async fn user_for_token(&self, key: &str) -> Result<Option<User>, DbError> {
        let inner = self.inner.read().await;
        Ok(inner
            .tokens
            .get(key)
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    async fn delete_token(&self, user: UserId) -> Result<(), DbError> {
        let mut inner = self.inner.write().await;
        inner.tokens.retain(|_, owner| *owner != user);
        Ok(())
    }

    async fn list_points(&self) -> Result<Vec<Point>, DbError> {
        let inner = self.inner.read().await;
        Ok(inner.points.values().map(|p| inner.point(p)).collect())
    }

    async fn get_point(&self, id: i64) -> Result<Point, DbError> {
        let inner = self.inner.read().await;
        inner
            .points
            .get(&id)
            .map(|p| inner.point(p))
            .ok_or_else(|| DbError::point_not_found(id))
    }

    async fn create_point(&self, creator: UserId, point: NewPoint) -> Result<Point, DbError> {
        let mut inner = self.inner.write().await;

        inner.last_point_id += 1;
        let now = Utc::now();
        let row = PointRow {
            id: inner.last_point_id,
            name: point.name.into_string(),
            description: point.description.into_string(),
            latitude: point.coordinate.latitude,
            longitude: point.coordinate.longitude,
            creator_id: creator,
            created_at: now,
            updated_at: now,
        };
        let created = inner.point(&row);
        inner.points.insert(row.id, row);
        Ok(created)
    }

    async fn update_point(&self, id: i64, changes: PointChanges) -> Result<Point, DbError> {
        let mut inner = self.inner.write().await;

        let row = inner
            .points
            .get_mut(&id)
            .ok_or_else(|| DbError::point_not_found(id))?;

        if let Some(name) = changes.name {
            row.name = name.into_string();
        }
        if let Some(description) = changes.description {
            row.description = description.into_string();
        }
        if let Some(latitude) = changes.latitude {
            row.latitude = latitude;
        }
        if let Some(longitude) = changes.longitude {
            row.longitude = longitude;
        }
        row.updated_at = Utc::now();

        let row = row.clone();
        Ok(inner.point(&row))
    }

    async fn delete_point(&self, id: i64) -> Result<(), DbError> {
        let mut inner = self.inner.write().await;

        if inner.points.remove(&id).is_none() {
            return Err(DbError::point_not_found(id));
        }
        // Cascade
        inner.messages.retain(|_, m| m.point_id != id);
        Ok(())
    }

    async fn list_messages(&self, point_id: i64) -> Result<Vec<Message>, DbError> {
        let inner = self.inner.read().await;
        Ok(inner.messages_of(point_id))
    }

    async fn get_message(&self, id: i64) -> Result<Message, DbError> {
        let inner = self.inner.read().await;
        inner
            .messages
            .get(&id)
            .map(|m| inner.message(m))
            .ok_or_else(|| DbError::message_not_found(id))
    }

    async fn create_message(
        &self,
        point_id: i64,
        author: UserId,
        text: MessageText,
    ) -> Result<Message, DbError> {
        let mut inner = self.inner.write().await;

        if !inner.points.contains_key(&point_id) {
            return Err(DbError::point_not_found(point_id));
        }

        inner.last_message_id += 1;
        let now = Utc::now();
        let row = MessageRow {
            id: inner.last_message_id,
            point_id,
            text: text.into_string(),
            author_id: author,
            created_at: now,
            updated_at: now,
        };
        let created = inner.message(&row);
        inner.messages.insert(row.id, row);
        Ok(created)
    }

    async fn update_message(&self, id: i64, text: MessageText) -> Result<Message, DbError> {
        let mut inner = self.inner.write().await;

        let row = inner
            .messages
            .get_mut(&id)
            .ok_or_else(|| DbError::message_not_found(id))?;
        row.text = text.into_string();
        row.updated_at = Utc::now();

        let row = row.clone();
        Ok(inner.message(&row))
    }

    async fn delete_message(&self, id: i64) -> Result<(), DbError> {
        let mut inner = self.inner.write().await;

        inner
            .messages
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DbError::message_not_found(id))
    }
}
