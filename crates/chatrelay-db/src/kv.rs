//! `SQLite` implementation of the `KvStore` port.
//!
//! One table, string keys, JSON-string values. Callers own serialization;
//! this layer never inspects values.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use chatrelay_core::ports::kv::{KvStore, RepositoryError};

/// `SQLite`-backed key-value store.
pub struct SqliteKvStore {
    pool: SqlitePool,
}

impl SqliteKvStore {
    /// Create a new store over an initialized pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn storage_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Storage(e.to_string())
}

#[async_trait]
impl KvStore for SqliteKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        let row = sqlx::query("SELECT value FROM kv WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;

        Ok(row.map(|r| r.get("value")))
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), RepositoryError> {
        let updated_at = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

        sqlx::query("INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?, ?, ?)")
            .bind(key)
            .bind(value)
            .bind(&updated_at)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;

        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<(String, String)>, RepositoryError> {
        let rows = sqlx::query("SELECT key, value FROM kv WHERE key LIKE ? || '%' ORDER BY key")
            .bind(prefix)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_err)?;

        Ok(rows
            .into_iter()
            .map(|r| (r.get("key"), r.get("value")))
            .collect())
    }

    async fn delete(&self, key: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM kv WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::memory_pool;

    async fn store() -> SqliteKvStore {
        SqliteKvStore::new(memory_pool().await.unwrap())
    }

    #[tokio::test]
    async fn put_get_round_trip() {
        let store = store().await;
        store.put("prompt:1", r#"{"title":"t"}"#).await.unwrap();

        let value = store.get("prompt:1").await.unwrap();
        assert_eq!(value.as_deref(), Some(r#"{"title":"t"}"#));
        assert_eq!(store.get("prompt:2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn put_replaces_existing_value() {
        let store = store().await;
        store.put("config:a", "old").await.unwrap();
        store.put("config:a", "new").await.unwrap();

        assert_eq!(store.get("config:a").await.unwrap().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn list_filters_by_prefix_in_key_order() {
        let store = store().await;
        store.put("prompt:b", "2").await.unwrap();
        store.put("prompt:a", "1").await.unwrap();
        store.put("config:z", "x").await.unwrap();

        let listed = store.list("prompt:").await.unwrap();
        let keys: Vec<_> = listed.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["prompt:a", "prompt:b"]);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = store().await;
        store.put("prompt:x", "v").await.unwrap();
        store.delete("prompt:x").await.unwrap();
        store.delete("prompt:x").await.unwrap();

        assert_eq!(store.get("prompt:x").await.unwrap(), None);
    }
}
