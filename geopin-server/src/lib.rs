//! geopin-server: HTTP API for map points and their messages
//!
//! Token accounts, point/message CRUD guarded by ownership, and a haversine
//! radius search. Storage sits behind the `Store` trait with a PostgreSQL
//! backend and an in-memory one for tests and local runs.

pub mod auth;
pub mod db;
pub mod http;
pub mod models;
pub mod state;

pub use db::{MemoryStore, PgStore, Store};
pub use http::{build_router, run_server, ServerConfig, ServerError};
pub use state::AppState;
