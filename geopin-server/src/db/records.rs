//! Records returned by every store backend

use chrono::{DateTime, Utc};
use geopin_core::{Coordinate, Located, Ownable, UserId};

/// User account record
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Message record with its author's username resolved
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: i64,
    pub point_id: i64,
    pub text: String,
    pub author_id: UserId,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Point record with creator username and messages resolved
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub creator_id: UserId,
    pub creator: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Ordered by message id
    pub messages: Vec<Message>,
}

impl Ownable for Point {
    fn owner_id(&self) -> Option<UserId> {
        Some(self.creator_id)
    }
}

impl Ownable for Message {
    fn owner_id(&self) -> Option<UserId> {
        Some(self.author_id)
    }
}

impl Located for Point {
    fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}
