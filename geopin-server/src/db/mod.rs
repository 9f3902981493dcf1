//! Database layer - store trait, backends, pool and migrations
//!
//! # Design Principles
//!
//! - Handlers depend on `dyn Store`, never on a backend directly
//! - Connection pool for PostgreSQL, no Arc<Mutex<Connection>>
//! - Cascading deletes are a store rule, not handler logic

pub mod memory;
pub mod migrations;
pub mod pool;
pub mod postgres;
pub mod records;
pub mod repos;
pub mod store;

pub use memory::MemoryStore;
pub use pool::{create_pool, PoolSettings};
pub use postgres::PgStore;
pub use records::{Message, Point, User};
pub use store::{DbError, Store};
