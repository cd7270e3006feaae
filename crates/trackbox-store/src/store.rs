use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// String-keyed blob store behind the repositories.
///
/// Deliberately tiny: get, set, remove. Each repository owns exactly
/// one key and serializes its whole list into the value, so nothing
/// fancier than an upsert is ever needed. The trait seam exists so
/// tests can inject an in-memory double or a failing mock.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

/// SQLite-backed store
///
/// SQLite was chosen because:
/// - Zero-config embedded database
/// - Survives app restarts without a separate process
/// - Battle-tested and reliable
///
/// Operations are single-row and fast, so they run inline on the async
/// task behind a mutex rather than on a blocking pool.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Throwaway database for tests
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("connection poisoned: {}", e)))
    }
}

#[async_trait]
impl KvStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock()?;
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        debug!("Stored {} byte(s) under {}", value.len(), key);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        debug!("Removed key {}", key);
        Ok(())
    }
}

/// In-memory store double for tests and ephemeral runs
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryStore::new();

        assert_eq!(store.get("missing").await.unwrap(), None);

        store.set("key", "[1,2,3]").await.unwrap();
        assert_eq!(store.get("key").await.unwrap().as_deref(), Some("[1,2,3]"));

        store.remove("key").await.unwrap();
        assert_eq!(store.get("key").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store_overwrites() {
        let store = MemoryStore::new();
        store.set("key", "old").await.unwrap();
        store.set("key", "new").await.unwrap();
        assert_eq!(store.get("key").await.unwrap().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_sqlite_store_round_trip() {
        let store = SqliteStore::in_memory().unwrap();

        assert_eq!(store.get("missing").await.unwrap(), None);

        store.set("key", "{\"a\":1}").await.unwrap();
        assert_eq!(
            store.get("key").await.unwrap().as_deref(),
            Some("{\"a\":1}")
        );

        store.set("key", "{\"a\":2}").await.unwrap();
        assert_eq!(
            store.get("key").await.unwrap().as_deref(),
            Some("{\"a\":2}")
        );

        store.remove("key").await.unwrap();
        assert_eq!(store.get("key").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sqlite_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("store.db");

        {
            let store = SqliteStore::new(&db_path).unwrap();
            store.set("persisted", "value").await.unwrap();
        }

        let store = SqliteStore::new(&db_path).unwrap();
        assert_eq!(
            store.get("persisted").await.unwrap().as_deref(),
            Some("value")
        );
    }

    #[tokio::test]
    async fn test_remove_missing_key_is_noop() {
        let store = SqliteStore::in_memory().unwrap();
        store.remove("never-existed").await.unwrap();
    }
}
