//! Trait seams implemented by the provider and storage crates.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::ImagePayload;

/// An external generative-image service that can remove content from an
/// image.
///
/// Implementations make exactly one upstream call per attempt and never
/// retry internally; fallback across providers is the caller's concern.
#[async_trait]
pub trait ImageRemovalProvider: Send + Sync {
    /// Submit the image with an edit instruction and return the resulting
    /// image as base64 in the provider's native format.
    async fn attempt(&self, image: &ImagePayload, instruction: &str) -> Result<String>;

    /// Short provider identifier used in logs and errors.
    fn name(&self) -> &str;
}

/// Minimal key-value store holding opaque string values.
///
/// No compare-and-swap: concurrent read-modify-write cycles on the same key
/// can lose updates.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn put(&self, key: &str, value: String) -> Result<()>;

    /// Backend name for startup logs.
    fn backend_name(&self) -> &str;
}
