//! Ordered provider fallback.
//!
//! Providers are tried strictly one after another in priority order; the
//! first success wins. A provider only appears in the chain when its
//! credential is configured, so an empty chain means nothing can be called.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use unmark_core::{
    removal_instruction, Error, ImageRemovalProvider, ProviderResult, RemovalRequest, Result,
};

use crate::gemini::GeminiProvider;
use crate::openai::OpenAIImageProvider;

/// Priority-ordered list of image-removal providers.
#[derive(Clone, Default)]
pub struct ProviderChain {
    providers: Vec<Arc<dyn ImageRemovalProvider>>,
}

impl ProviderChain {
    pub fn new(providers: Vec<Arc<dyn ImageRemovalProvider>>) -> Self {
        Self { providers }
    }

    /// Build the default chain from environment variables: Gemini first,
    /// OpenAI second, each only when its API key is set.
    pub fn from_env() -> Result<Self> {
        let mut providers: Vec<Arc<dyn ImageRemovalProvider>> = Vec::new();

        if let Some(gemini) = GeminiProvider::from_env()? {
            providers.push(Arc::new(gemini));
        }
        if let Some(openai) = OpenAIImageProvider::from_env()? {
            providers.push(Arc::new(openai));
        }

        let chain = Self::new(providers);
        if chain.is_empty() {
            warn!("No provider API key configured; every removal request will fail");
        } else {
            info!(providers = ?chain.provider_names(), "Provider chain configured");
        }
        Ok(chain)
    }

    /// Append a provider at the lowest priority.
    pub fn with_provider(mut self, provider: Arc<dyn ImageRemovalProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Run the request through the chain.
    ///
    /// Fails with [`Error::NoProviderConfigured`] without any network call
    /// when the chain is empty; otherwise surfaces the last provider's error
    /// when every provider fails.
    pub async fn run(&self, request: &RemovalRequest) -> Result<ProviderResult> {
        if self.providers.is_empty() {
            return Err(Error::NoProviderConfigured);
        }

        let instruction = removal_instruction(&request.removal_text);
        let mut last_error = None;

        for provider in &self.providers {
            let start = Instant::now();
            debug!(provider = provider.name(), "Attempting provider");

            match provider.attempt(&request.image, &instruction).await {
                Ok(base64_image) => {
                    info!(
                        provider = provider.name(),
                        duration_ms = start.elapsed().as_millis() as u64,
                        "Provider produced image"
                    );
                    return Ok(ProviderResult {
                        base64_image,
                        provider: provider.name().to_string(),
                    });
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        duration_ms = start.elapsed().as_millis() as u64,
                        error_code = e.code(),
                        error = %e,
                        "Provider failed, trying next"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(Error::NoProviderConfigured))
    }
}
