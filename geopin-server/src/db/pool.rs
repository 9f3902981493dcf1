//! PostgreSQL pool setup

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;

/// Connection limits for the shared pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
    /// How long a request waits for a free connection before failing
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS),
        }
    }
}

impl PoolSettings {
    /// A single connection, enough for one-shot schema work.
    pub fn single() -> Self {
        Self {
            max_connections: 1,
            ..Self::default()
        }
    }

    fn options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections.max(1))
            .acquire_timeout(self.acquire_timeout)
    }
}

/// Connect to `database_url` with the given limits.
///
/// ```ignore
/// let pool = create_pool("postgres://localhost/geopin", &PoolSettings::default()).await?;
/// ```
pub async fn create_pool(database_url: &str, settings: &PoolSettings) -> Result<PgPool, sqlx::Error> {
    tracing::debug!(
        max_connections = settings.max_connections,
        acquire_timeout_secs = settings.acquire_timeout.as_secs(),
        "connecting to PostgreSQL"
    );
    settings.options().connect(database_url).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_shape_pool_options() {
        let settings = PoolSettings {
            max_connections: 3,
            acquire_timeout: Duration::from_millis(250),
        };
        let options = settings.options();
        assert_eq!(options.get_max_connections(), 3);
        assert_eq!(options.get_acquire_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn zero_connections_clamped() {
        let settings = PoolSettings {
            max_connections: 0,
            ..PoolSettings::default()
        };
        assert_eq!(settings.options().get_max_connections(), 1);
        assert_eq!(PoolSettings::single().max_connections, 1);
    }

    // Run with: DATABASE_URL=postgres://... cargo test -p geopin-server -- --ignored
    #[tokio::test]
    #[ignore = "requires database"]
    async fn pool_acquires_connection() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url, &PoolSettings::single())
            .await
            .expect("pool creation failed");

        let (one,): (i32,) = sqlx::query_as("SELECT 1")
            .fetch_one(&pool)
            .await
            .expect("query failed");
        assert_eq!(one, 1);
    }
}
