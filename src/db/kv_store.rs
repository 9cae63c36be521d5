use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::db::repositories::kv_repository::KvRepository;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};

/// Durable string-keyed blob store. Implementations may fail with any
/// `AppError`; callers decide how to surface it.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> AppResult<()>;

    async fn remove(&self, key: &str) -> AppResult<()>;
}

/// SQLite-backed store. Each call opens a connection on the blocking pool.
#[derive(Clone, Debug)]
pub struct SqliteKeyValueStore {
    db: DbPool,
}

impl SqliteKeyValueStore {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    async fn run_blocking<T: Send + 'static>(
        &self,
        task: impl FnOnce(DbPool) -> AppResult<T> + Send + 'static,
    ) -> AppResult<T> {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || task(db))
            .await
            .map_err(|err| AppError::other(format!("key-value task failed: {err}")))?
    }
}

#[async_trait]
impl KeyValueStore for SqliteKeyValueStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let key = key.to_string();
        self.run_blocking(move |db| {
            db.with_connection(|conn| KvRepository::get(conn, &key))
        })
        .await
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let key = key.to_string();
        let value = value.to_string();
        debug!(target: "app::db", %key, bytes = value.len(), "writing key");
        self.run_blocking(move |db| db.with_connection(|conn| KvRepository::upsert(conn, &key, &value)))
            .await
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        let key = key.to_string();
        self.run_blocking(move |db| db.with_connection(|conn| KvRepository::delete(conn, &key)))
            .await
    }
}

/// Process-local store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
