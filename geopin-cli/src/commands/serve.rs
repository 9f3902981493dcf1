//! HTTP server command
//!
//! Runs against PostgreSQL (migrating on startup) or, with `--in-memory`,
//! against a throwaway in-process store.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};

use geopin_server::db::pool::{DEFAULT_ACQUIRE_TIMEOUT_SECS, DEFAULT_MAX_CONNECTIONS};
use geopin_server::db::{create_pool, migrations, MemoryStore, PgStore, PoolSettings, Store};
use geopin_server::http::server::DEFAULT_REQUEST_TIMEOUT_SECS;
use geopin_server::{run_server, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "GEOPIN_BIND", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Keep everything in process memory (lost on exit); ignores DATABASE_URL
    #[arg(long)]
    pub in_memory: bool,

    /// Maximum PostgreSQL connections
    #[arg(long, env = "GEOPIN_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Seconds to wait for a free database connection
    #[arg(long, env = "GEOPIN_DB_ACQUIRE_TIMEOUT", default_value_t = DEFAULT_ACQUIRE_TIMEOUT_SECS)]
    pub db_acquire_timeout: u64,

    /// Allow permissive CORS (all origins) - use with caution.
    /// The env var accepts 1/0, true/false, yes/no, on/off.
    #[arg(
        long,
        env = "GEOPIN_CORS_PERMISSIVE",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value = "false",
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub cors_permissive: bool,

    /// Per-request timeout in seconds
    #[arg(long, env = "GEOPIN_REQUEST_TIMEOUT", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout: u64,
}

impl ServeArgs {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: self.bind,
            cors_permissive: self.cors_permissive,
            request_timeout: Duration::from_secs(self.request_timeout),
        }
    }

    fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.max_connections,
            acquire_timeout: Duration::from_secs(self.db_acquire_timeout),
        }
    }
}

async fn open_store(args: &ServeArgs) -> Result<Arc<dyn Store>> {
    if args.in_memory {
        tracing::warn!("Using in-memory store; data is lost on exit");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let database_url = args
        .database_url
        .as_deref()
        .context("DATABASE_URL not set. Set via --database-url or DATABASE_URL env, or pass --in-memory")?;

    let pool = create_pool(database_url, &args.pool_settings())
        .await
        .context("Failed to create database pool")?;
    migrations::run(&pool)
        .await
        .context("Failed to apply migrations")?;

    Ok(Arc::new(PgStore::new(pool)))
}

/// Run the HTTP server until shutdown
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let store = open_store(&args).await?;

    tracing::info!("Starting geopin server on {}", args.bind);
    run_server(store, args.server_config())
        .await
        .context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        serve: ServeArgs,
    }

    #[test]
    fn config_from_flags() {
        let args = Wrapper::parse_from([
            "serve",
            "--in-memory",
            "--bind",
            "0.0.0.0:9000",
            "--request-timeout",
            "5",
        ])
        .serve;
        let config = args.server_config();
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn in_memory_ignores_database_url() {
        let args = Wrapper::parse_from([
            "serve",
            "--in-memory",
            "--database-url",
            "postgres://nowhere.invalid/geopin",
        ])
        .serve;
        let store = open_store(&args).await.unwrap();
        assert!(store.list_points().await.unwrap().is_empty());
    }

    #[test]
    fn cors_flag_accepts_boolish_values() {
        let cases = [
            ("1", true),
            ("yes", true),
            ("true", true),
            ("0", false),
            ("off", false),
        ];
        for (raw, expected) in cases {
            let flag = format!("--cors-permissive={raw}");
            let args = Wrapper::parse_from(["serve", flag.as_str()]).serve;
            assert_eq!(args.cors_permissive, expected, "value {raw:?}");
        }

        let bare = Wrapper::parse_from(["serve", "--cors-permissive"]).serve;
        assert!(bare.cors_permissive);
        assert!(Wrapper::try_parse_from(["serve", "--cors-permissive=maybe"]).is_err());
    }

    #[test]
    fn pool_settings_from_flags() {
        let defaults = Wrapper::parse_from(["serve"]).serve.pool_settings();
        assert_eq!(defaults, PoolSettings::default());

        let args = Wrapper::parse_from([
            "serve",
            "--max-connections",
            "25",
            "--db-acquire-timeout",
            "2",
        ])
        .serve;
        let settings = args.pool_settings();
        assert_eq!(settings.max_connections, 25);
        assert_eq!(settings.acquire_timeout, Duration::from_secs(2));
    }
}
