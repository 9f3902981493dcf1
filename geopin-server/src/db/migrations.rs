//! Schema migrations
//!
//! Idempotent `CREATE ... IF NOT EXISTS` statements, run on every start.
//! Message removal on point deletion is enforced here with ON DELETE CASCADE.

use sqlx::PgPool;

const STATEMENTS: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            username VARCHAR(150) NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "auth_tokens",
        r#"
        CREATE TABLE IF NOT EXISTS auth_tokens (
            key TEXT PRIMARY KEY,
            user_id BIGINT NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "points",
        r#"
        CREATE TABLE IF NOT EXISTS points (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(50) NOT NULL,
            description VARCHAR(256) NOT NULL DEFAULT '',
            latitude DOUBLE PRECISION NOT NULL,
            longitude DOUBLE PRECISION NOT NULL,
            creator_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "messages",
        r#"
        CREATE TABLE IF NOT EXISTS messages (
            id BIGSERIAL PRIMARY KEY,
            text VARCHAR(256) NOT NULL,
            author_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            point_id BIGINT NOT NULL REFERENCES points(id) ON DELETE CASCADE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "messages_point_id_idx",
        "CREATE INDEX IF NOT EXISTS messages_point_id_idx ON messages(point_id)",
    ),
    (
        "points_creator_id_idx",
        "CREATE INDEX IF NOT EXISTS points_creator_id_idx ON points(creator_id)",
    ),
];

/// Apply all migrations.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running geopin migrations...");

    for &(name, sql) in STATEMENTS {
        sqlx::query(sql).execute(pool).await?;
        tracing::debug!(migration = name, "applied");
    }

    tracing::info!(count = STATEMENTS.len(), "Migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statements_are_idempotent() {
        for (name, sql) in STATEMENTS {
            assert!(sql.contains("IF NOT EXISTS"), "{name} is not idempotent");
        }
    }

    #[test]
    fn messages_cascade_with_points() {
        let (_, messages) = STATEMENTS
            .iter()
            .find(|(name, _)| *name == "messages")
            .unwrap();
        assert!(messages.contains("REFERENCES points(id) ON DELETE CASCADE"));
    }
}
