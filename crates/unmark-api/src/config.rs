//! Server configuration read from the environment.
//!
//! Environment variables:
//! - `HOST` / `PORT`: bind address (default `0.0.0.0:8787`)
//! - `STATIC_DIR`: directory served under `/static` (default: this crate's
//!   `static/` directory)
//! - `MAX_BODY_BYTES`: request body limit (default 25 MiB)
//! - `KV_BACKEND`: `redis` (default) or `memory`
//! - `REDIS_URL`: Redis connection URL (default `redis://localhost:6379`)
//! - `KV_PREFIX`: Redis key prefix (default `unmark:`)

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use unmark_core::defaults;
use unmark_core::{Error, KvStore, Result};

use crate::services::kv::{MemoryKvStore, RedisKvStore};

/// Dashboard assets shipped with this crate.
pub const DEFAULT_STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Where the statistics record lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KvConfig {
    Redis { url: String, prefix: String },
    Memory,
}

impl KvConfig {
    fn from_env() -> Result<Self> {
        let backend = std::env::var("KV_BACKEND").unwrap_or_else(|_| "redis".to_string());
        match backend.trim().to_lowercase().as_str() {
            "redis" => Ok(KvConfig::Redis {
                url: std::env::var("REDIS_URL").unwrap_or_else(|_| defaults::REDIS_URL.to_string()),
                prefix: std::env::var("KV_PREFIX")
                    .unwrap_or_else(|_| defaults::KV_PREFIX.to_string()),
            }),
            "memory" => Ok(KvConfig::Memory),
            other => Err(Error::Config(format!(
                "KV_BACKEND must be \"redis\" or \"memory\", got \"{}\"",
                other
            ))),
        }
    }

    /// Open the configured store. A Redis connection failure is fatal.
    pub async fn connect(&self) -> Result<Arc<dyn KvStore>> {
        match self {
            KvConfig::Redis { url, prefix } => {
                let store = RedisKvStore::connect(url, prefix.clone()).await?;
                Ok(Arc::new(store))
            }
            KvConfig::Memory => {
                info!("Using in-memory statistics store; counters reset on restart");
                Ok(Arc::new(MemoryKvStore::new()))
            }
        }
    }
}

/// Top-level server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub max_body_bytes: usize,
    pub kv: KvConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::SERVER_HOST.to_string(),
            port: defaults::SERVER_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            max_body_bytes: defaults::MAX_BODY_BYTES,
            kv: KvConfig::Memory,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| Error::Config(format!("PORT is not a valid port: {}", raw)))?,
            Err(_) => defaults::SERVER_PORT,
        };

        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| defaults::SERVER_HOST.to_string()),
            port,
            static_dir: std::env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATIC_DIR)),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults::MAX_BODY_BYTES),
            kv: KvConfig::from_env()?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
