//! Stateful services behind the HTTP handlers.

pub mod kv;
pub mod statistics;

pub use kv::{MemoryKvStore, RedisKvStore};
pub use statistics::{Clock, StatisticsStore};
