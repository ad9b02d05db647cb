//! OpenAI image-edit provider implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, info, warn};

use unmark_core::defaults;
use unmark_core::{Error, ImagePayload, ImageRemovalProvider, Result};

use super::types::*;

const PROVIDER: &str = "openai";

/// Configuration for the OpenAI image-edit provider.
#[derive(Debug, Clone)]
pub struct OpenAIImageConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// API key for bearer authentication.
    pub api_key: String,
    /// Image-edit model.
    pub model: String,
    /// Requested output quality.
    pub quality: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl OpenAIImageConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: defaults::OPENAI_URL.to_string(),
            api_key: api_key.into(),
            model: defaults::OPENAI_IMAGE_MODEL.to_string(),
            quality: defaults::OPENAI_IMAGE_QUALITY.to_string(),
            timeout_seconds: defaults::PROVIDER_TIMEOUT_SECS,
        }
    }

    /// Create from environment variables.
    /// Returns None if `OPENAI_API_KEY` is not set.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var(defaults::ENV_OPENAI_API_KEY)
            .ok()
            .filter(|k| !k.trim().is_empty())?;

        Some(Self {
            base_url: std::env::var(defaults::ENV_OPENAI_BASE_URL)
                .unwrap_or_else(|_| defaults::OPENAI_URL.to_string()),
            api_key,
            model: std::env::var(defaults::ENV_OPENAI_IMAGE_MODEL)
                .unwrap_or_else(|_| defaults::OPENAI_IMAGE_MODEL.to_string()),
            quality: defaults::OPENAI_IMAGE_QUALITY.to_string(),
            timeout_seconds: std::env::var(defaults::ENV_OPENAI_TIMEOUT)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults::PROVIDER_TIMEOUT_SECS),
        })
    }
}

/// Fallback provider backed by OpenAI's `/images/edits` endpoint.
pub struct OpenAIImageProvider {
    client: Client,
    config: OpenAIImageConfig,
}

impl OpenAIImageProvider {
    /// Create a new provider with the given configuration.
    pub fn new(config: OpenAIImageConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "Initializing OpenAI image provider: url={}, model={}",
            config.base_url, config.model
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables; `Ok(None)` when no key is set.
    pub fn from_env() -> Result<Option<Self>> {
        OpenAIImageConfig::from_env().map(Self::new).transpose()
    }

    fn build_form(&self, image: &ImagePayload, instruction: &str) -> Result<Form> {
        let bytes = image.decode()?;
        let content_type = upload_content_type(&image.mime_type);
        let file = Part::bytes(bytes)
            .file_name(upload_file_name(&image.mime_type))
            .mime_str(content_type)
            .map_err(|e| Error::Internal(format!("Invalid upload content type: {}", e)))?;

        Ok(Form::new()
            .text("model", self.config.model.clone())
            .part("image", file)
            .text("prompt", instruction.to_string())
            .text("n", "1")
            .text("quality", self.config.quality.clone()))
    }
}

/// File name attached to the multipart upload, derived from the MIME type.
pub fn upload_file_name(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" | "image/jpg" => "image.jpg",
        "image/webp" => "image.webp",
        _ => "image.png",
    }
}

/// Content type for the upload part. MIME strings that do not parse fall
/// back to the default image type.
fn upload_content_type(mime_type: &str) -> &str {
    if Part::bytes(Vec::new()).mime_str(mime_type).is_ok() {
        mime_type
    } else {
        warn!(
            provider = PROVIDER,
            mime_type, "Unparseable MIME type, uploading as {}", defaults::IMAGE_MIME_TYPE
        );
        defaults::IMAGE_MIME_TYPE
    }
}

#[async_trait]
impl ImageRemovalProvider for OpenAIImageProvider {
    async fn attempt(&self, image: &ImagePayload, instruction: &str) -> Result<String> {
        let form = self.build_form(image, instruction)?;

        debug!(
            provider = PROVIDER,
            model = %self.config.model,
            mime_type = %image.mime_type,
            data_len = image.data.len(),
            "Submitting image edit to OpenAI"
        );

        let url = format!("{}/images/edits", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::provider_transport(PROVIDER, format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OpenAIErrorResponse>(&body)
                .map(|r| r.error.message)
                .unwrap_or_else(|_| body.clone());
            warn!(
                provider = PROVIDER,
                status = status.as_u16(),
                error = %message,
                "OpenAI API error"
            );
            return Err(Error::provider_status(PROVIDER, status, body));
        }

        let parsed: ImageEditResponse = response.json().await.map_err(|e| {
            Error::provider_transport(PROVIDER, format!("Failed to parse response: {}", e))
        })?;

        parsed
            .first_image()
            .map(str::to_string)
            .ok_or_else(|| Error::NoImageInResponse(PROVIDER.to_string()))
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}
