//! Mock provider for deterministic testing.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use unmark_providers::{MockProvider, ProviderChain};
//!
//! let chain = ProviderChain::default()
//!     .with_provider(Arc::new(MockProvider::failing("gemini", "quota exceeded")))
//!     .with_provider(Arc::new(MockProvider::succeeding("openai", "iVBORw0KGgo=")));
//! assert_eq!(chain.len(), 2);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use unmark_core::{Error, ImagePayload, ImageRemovalProvider, Result};

#[derive(Debug, Clone)]
enum Outcome {
    Image(String),
    Fail(String),
}

/// Provider returning a fixed image or a fixed failure.
#[derive(Clone)]
pub struct MockProvider {
    name: String,
    outcome: Outcome,
    calls: Arc<AtomicUsize>,
    instructions: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    fn with_outcome(name: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            name: name.into(),
            outcome,
            calls: Arc::new(AtomicUsize::new(0)),
            instructions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always returns `base64_image`.
    pub fn succeeding(name: impl Into<String>, base64_image: impl Into<String>) -> Self {
        Self::with_outcome(name, Outcome::Image(base64_image.into()))
    }

    /// Always fails with a provider error carrying `message`.
    pub fn failing(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_outcome(name, Outcome::Fail(message.into()))
    }

    /// Number of attempts made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Instructions received, in call order.
    pub fn instructions(&self) -> Vec<String> {
        self.instructions
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ImageRemovalProvider for MockProvider {
    async fn attempt(&self, _image: &ImagePayload, instruction: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut log) = self.instructions.lock() {
            log.push(instruction.to_string());
        }

        match &self.outcome {
            Outcome::Image(b64) => Ok(b64.clone()),
            Outcome::Fail(message) => Err(Error::Provider {
                provider: self.name.clone(),
                status: Some(500),
                message: message.clone(),
                body: Some(message.clone()),
            }),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
