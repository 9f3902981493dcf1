//! Route handlers organized by resource

pub mod accounts;
pub mod health;
pub mod messages;
pub mod points;
pub mod search;
