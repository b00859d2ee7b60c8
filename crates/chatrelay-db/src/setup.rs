//! Database setup and initialization.

use std::path::Path;

use anyhow::Result;
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};

/// Open (creating if missing) the `SQLite` database and ensure the schema
/// exists.
///
/// # Errors
///
/// Returns an error if the database file cannot be opened or created, or
/// if schema creation fails.
pub async fn setup_database(db_path: &Path) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let pool = SqlitePool::connect_with(
        SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true),
    )
    .await?;

    create_schema(&pool).await?;

    tracing::debug!(path = %db_path.display(), "database ready");
    Ok(pool)
}

/// In-memory pool for tests.
///
/// Capped at one connection: each `:memory:` connection is its own
/// database, so a larger pool would lose the schema.
pub async fn memory_pool() -> Result<SqlitePool> {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    create_schema(&pool).await?;
    Ok(pool)
}

async fn create_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_file_and_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("chatrelay.db");

        let pool = setup_database(&path).await.unwrap();
        assert!(path.exists());

        // Schema is usable immediately.
        sqlx::query("INSERT INTO kv (key, value, updated_at) VALUES ('k', 'v', 'now')")
            .execute(&pool)
            .await
            .unwrap();
    }
}
