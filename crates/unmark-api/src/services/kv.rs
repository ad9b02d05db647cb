//! Key-value backends for the statistics record.
//!
//! `RedisKvStore` is the production backend; `MemoryKvStore` serves local
//! runs and tests. Neither offers compare-and-swap.

use std::collections::HashMap;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tokio::sync::RwLock;
use tracing::{debug, info, trace};

use unmark_core::{Error, KvStore, Result};

/// Key-value store backed by Redis.
#[derive(Clone)]
pub struct RedisKvStore {
    connection: ConnectionManager,
    prefix: String,
}

impl RedisKvStore {
    /// Connect to Redis. Fails when the URL is invalid or the server is
    /// unreachable.
    pub async fn connect(url: &str, prefix: String) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| Error::Config(format!("Invalid Redis URL: {}", e)))?;
        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| Error::Config(format!("Failed to connect to Redis: {}", e)))?;

        info!(prefix = %prefix, "Redis statistics store connected");

        Ok(Self { connection, prefix })
    }

    fn key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

#[async_trait]
impl KvStore for RedisKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection.clone();
        let full_key = self.key(key);
        let value = conn
            .get::<_, Option<String>>(&full_key)
            .await
            .map_err(|e| Error::Store(format!("Redis GET {} failed: {}", full_key, e)))?;
        trace!(key = %full_key, hit = value.is_some(), "Redis GET");
        Ok(value)
    }

    async fn put(&self, key: &str, value: String) -> Result<()> {
        let mut conn = self.connection.clone();
        let full_key = self.key(key);
        conn.set::<_, _, ()>(&full_key, value)
            .await
            .map_err(|e| Error::Store(format!("Redis SET {} failed: {}", full_key, e)))?;
        debug!(key = %full_key, "Redis SET");
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "redis"
    }
}

/// Process-local key-value store.
#[derive(Default)]
pub struct MemoryKvStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: String) -> Result<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}
