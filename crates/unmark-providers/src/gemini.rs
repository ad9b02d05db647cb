//! Gemini `generateContent` client (primary provider).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use unmark_core::defaults;
use unmark_core::{Error, ImagePayload, ImageRemovalProvider, Result};

const PROVIDER: &str = "gemini";

/// Configuration for the Gemini provider.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// API key, sent as the `key` query parameter.
    pub api_key: String,
    /// Image-capable model name.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: defaults::GEMINI_URL.to_string(),
            api_key: api_key.into(),
            model: defaults::GEMINI_MODEL.to_string(),
            timeout_seconds: defaults::PROVIDER_TIMEOUT_SECS,
        }
    }

    /// Create from environment variables.
    /// Returns None if neither `GOOGLE_API_KEY` nor `GEMINI_API_KEY` is set.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var(defaults::ENV_GOOGLE_API_KEY)
            .or_else(|_| std::env::var(defaults::ENV_GEMINI_API_KEY))
            .ok()
            .filter(|k| !k.trim().is_empty())?;

        Some(Self {
            base_url: std::env::var(defaults::ENV_GEMINI_BASE_URL)
                .unwrap_or_else(|_| defaults::GEMINI_URL.to_string()),
            api_key,
            model: std::env::var(defaults::ENV_GEMINI_MODEL)
                .unwrap_or_else(|_| defaults::GEMINI_MODEL.to_string()),
            timeout_seconds: std::env::var(defaults::ENV_GEMINI_TIMEOUT)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults::PROVIDER_TIMEOUT_SECS),
        })
    }
}

// =============================================================================
// REQUEST TYPES
// =============================================================================

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart {
    Image { inline_data: InlineData },
    Text { text: String },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
    response_modalities: Vec<&'static str>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: defaults::GEMINI_TEMPERATURE,
            top_p: defaults::GEMINI_TOP_P,
            top_k: defaults::GEMINI_TOP_K,
            max_output_tokens: defaults::GEMINI_MAX_OUTPUT_TOKENS,
            response_modalities: vec!["Text", "Image"],
        }
    }
}

// =============================================================================
// RESPONSE TYPES
// =============================================================================

// Every level is optional; extraction walks the chain in one place.

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Option<Vec<Candidate>>,
    #[serde(default, rename = "promptFeedback")]
    prompt_feedback: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default, rename = "inlineData", alias = "inline_data")]
    inline_data: Option<ResponseBlob>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseBlob {
    #[serde(default)]
    data: Option<String>,
}

impl GenerateContentResponse {
    fn parts(&self) -> &[ResponsePart] {
        self.candidates
            .as_deref()
            .and_then(|c| c.first())
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.as_deref())
            .unwrap_or(&[])
    }

    /// Inline image of the first candidate, if any part carries one.
    fn image_data(&self) -> Option<&str> {
        self.parts().iter().find_map(|part| {
            part.inline_data
                .as_ref()
                .and_then(|blob| blob.data.as_deref())
                .filter(|data| !data.is_empty())
        })
    }

    fn text(&self) -> Option<&str> {
        self.parts().iter().find_map(|part| part.text.as_deref())
    }
}

// =============================================================================
// PROVIDER
// =============================================================================

/// Primary provider backed by Gemini's multimodal generation endpoint.
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Create a new Gemini provider with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "Initializing Gemini provider: url={}, model={}",
            config.base_url, config.model
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables; `Ok(None)` when no key is set.
    pub fn from_env() -> Result<Option<Self>> {
        GeminiConfig::from_env().map(Self::new).transpose()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

fn build_request(image: &ImagePayload, instruction: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![
                RequestPart::Image {
                    inline_data: InlineData {
                        mime_type: image.mime_type.clone(),
                        data: image.data.clone(),
                    },
                },
                RequestPart::Text {
                    text: instruction.to_string(),
                },
            ],
        }],
        generation_config: GenerationConfig::default(),
    }
}

#[async_trait]
impl ImageRemovalProvider for GeminiProvider {
    async fn attempt(&self, image: &ImagePayload, instruction: &str) -> Result<String> {
        debug!(
            provider = PROVIDER,
            model = %self.config.model,
            mime_type = %image.mime_type,
            data_len = image.data.len(),
            "Submitting image to Gemini"
        );

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&build_request(image, instruction))
            .send()
            .await
            .map_err(|e| Error::provider_transport(PROVIDER, format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                provider = PROVIDER,
                status = status.as_u16(),
                error = %body,
                "Gemini API error"
            );
            return Err(Error::provider_status(PROVIDER, status, body));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            Error::provider_transport(PROVIDER, format!("Failed to parse response: {}", e))
        })?;

        match parsed.image_data() {
            Some(data) => Ok(data.to_string()),
            None => {
                warn!(
                    provider = PROVIDER,
                    text = parsed.text().unwrap_or(""),
                    prompt_feedback = ?parsed.prompt_feedback,
                    "Gemini response carried no inline image"
                );
                Err(Error::NoImageInResponse(PROVIDER.to_string()))
            }
        }
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}
