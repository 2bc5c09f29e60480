//! # SQLite Storage
//!
//! [`Storage`] over the `local_storage` table.
//!
//! ## Table
//! ```text
//! local_storage
//! ├── key         TEXT PRIMARY KEY
//! ├── value       TEXT            (JSON document, NULL once removed)
//! ├── revision    INTEGER         (1 on insert, +1 on every overwrite or removal)
//! └── updated_at  TEXT            (RFC 3339)
//! ```

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use super::Storage;
use crate::error::DbResult;

/// Storage backed by a SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteStorage { pool }
    }

    /// Number of stored keys.
    pub async fn key_count(&self) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM local_storage WHERE value IS NOT NULL")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn get_item(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar::<_, Option<String>>("SELECT value FROM local_storage WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?
                .flatten();

        debug!(key, found = value.is_some(), "Read storage key");
        Ok(value)
    }

    async fn set_item(&self, key: &str, value: &str) -> DbResult<()> {
        debug!(key, bytes = value.len(), "Writing storage key");

        // Upsert: a new key starts at revision 1, overwrites (and re-creating
        // a removed key) bump it
        sqlx::query(
            r#"
            INSERT INTO local_storage (key, value, revision, updated_at)
            VALUES (?1, ?2, 1, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                revision = local_storage.revision + 1,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove_item(&self, key: &str) -> DbResult<bool> {
        // The row stays behind so the revision keeps counting
        let result = sqlx::query(
            r#"
            UPDATE local_storage
            SET value = NULL, revision = revision + 1, updated_at = ?2
            WHERE key = ?1 AND value IS NOT NULL
            "#,
        )
        .bind(key)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        let removed = result.rows_affected() > 0;
        debug!(key, removed, "Removed storage key");
        Ok(removed)
    }

    async fn revision(&self, key: &str) -> DbResult<Option<i64>> {
        let revision: Option<i64> =
            sqlx::query_scalar("SELECT revision FROM local_storage WHERE key = ?1 AND value IS NOT NULL")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(revision)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
