//! PostgreSQL repositories
//!
//! Each repository borrows the pool and follows these patterns:
//! - JOIN for usernames, no N+1 lookups
//! - Constraints decide conflicts (ON CONFLICT), no check-then-insert
//! - Transactions for multi-step operations

pub mod messages;
pub mod points;
pub mod users;

pub use messages::MessageRepo;
pub use points::PointRepo;
pub use users::{TokenRepo, UserRepo};
