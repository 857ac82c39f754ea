//! libSQL-backed [`LocalCache`] — survives restarts.
//!
//! One key/value table; the profile lives in a single row.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::info;

use crate::error::CacheError;

use super::traits::LocalCache;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS profile_cache (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
";

/// Durable local cache on a libSQL database.
///
/// `libsql::Connection` is `Send + Sync`; one connection serves every call.
pub struct LibSqlCache {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlCache {
    /// Open (or create) a local database file.
    pub async fn new_local(path: &Path) -> Result<Self, CacheError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CacheError::Open(format!("Failed to create cache directory: {e}")))?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| CacheError::Open(format!("Failed to open libSQL database: {e}")))?;

        let cache = Self::from_database(db).await?;
        info!(path = %path.display(), "Profile cache opened");
        Ok(cache)
    }

    /// In-memory database, mostly for tests.
    pub async fn new_memory() -> Result<Self, CacheError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| CacheError::Open(format!("Failed to create in-memory database: {e}")))?;
        Self::from_database(db).await
    }

    async fn from_database(db: LibSqlDatabase) -> Result<Self, CacheError> {
        let conn = db
            .connect()
            .map_err(|e| CacheError::Open(format!("Failed to create connection: {e}")))?;
        conn.execute_batch(SCHEMA)
            .await
            .map_err(|e| CacheError::Query(format!("init schema: {e}")))?;
        Ok(Self {
            db: Arc::new(db),
            conn,
        })
    }
}

#[async_trait]
impl LocalCache for LibSqlCache {
    async fn read(&self, key: &str) -> Result<Option<serde_json::Value>, CacheError> {
        let mut rows = self
            .conn
            .query(
                "SELECT value FROM profile_cache WHERE key = ?1",
                params![key],
            )
            .await
            .map_err(|e| CacheError::Query(format!("read: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let value_str: String = row
                    .get(0)
                    .map_err(|e| CacheError::Query(format!("read: {e}")))?;
                let value = serde_json::from_str(&value_str)
                    .map_err(|e| CacheError::Serialization(e.to_string()))?;
                Ok(Some(value))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(CacheError::Query(format!("read: {e}"))),
        }
    }

    async fn write(&self, key: &str, value: &serde_json::Value) -> Result<(), CacheError> {
        let now = Utc::now().to_rfc3339();
        let value_str =
            serde_json::to_string(value).map_err(|e| CacheError::Serialization(e.to_string()))?;

        self.conn
            .execute(
                "INSERT INTO profile_cache (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT (key) DO UPDATE SET value = ?2, updated_at = ?3",
                params![key, value_str, now],
            )
            .await
            .map_err(|e| CacheError::Query(format!("write: {e}")))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, CacheError> {
        let count = self
            .conn
            .execute("DELETE FROM profile_cache WHERE key = ?1", params![key])
            .await
            .map_err(|e| CacheError::Query(format!("remove: {e}")))?;
        Ok(count > 0)
    }
}
