//! Centralized default constants for unmark.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own magic
//! numbers.

// =============================================================================
// REQUEST
// =============================================================================

/// Removal target used when the caller omits `removalText` or sends blank.
pub const REMOVAL_TEXT: &str = "watermarks";

/// MIME type assumed when the caller omits `mime_type`.
pub const IMAGE_MIME_TYPE: &str = "image/png";

/// Content type of every successful image response.
pub const RESPONSE_CONTENT_TYPE: &str = "image/png";

// =============================================================================
// SERVER
// =============================================================================

/// Default bind host.
pub const SERVER_HOST: &str = "0.0.0.0";

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 8787;

/// Maximum request body size in bytes (25 MiB; base64 inflates images ~4/3).
pub const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

// =============================================================================
// STATISTICS
// =============================================================================

/// Key holding the JSON statistics record.
pub const STATISTICS_KEY: &str = "statistics";

/// Days shown in the dashboard trend table.
pub const TREND_DAYS: usize = 7;

/// Default Redis connection URL.
pub const REDIS_URL: &str = "redis://localhost:6379";

/// Default Redis key prefix.
pub const KV_PREFIX: &str = "unmark:";

// =============================================================================
// PROVIDERS
// =============================================================================

/// Default Gemini API base URL.
pub const GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default Gemini image model.
pub const GEMINI_MODEL: &str = "gemini-2.0-flash-exp-image-generation";

/// Default OpenAI API base URL.
pub const OPENAI_URL: &str = "https://api.openai.com/v1";

/// Default OpenAI image-edit model.
pub const OPENAI_IMAGE_MODEL: &str = "gpt-image-1";

/// Quality requested from the image-edit endpoint.
pub const OPENAI_IMAGE_QUALITY: &str = "medium";

/// Timeout for a single provider call in seconds.
pub const PROVIDER_TIMEOUT_SECS: u64 = 120;

// Generation parameters for the primary provider.

pub const GEMINI_TEMPERATURE: f32 = 1.0;
pub const GEMINI_TOP_P: f32 = 0.95;
pub const GEMINI_TOP_K: u32 = 40;
pub const GEMINI_MAX_OUTPUT_TOKENS: u32 = 8192;

// =============================================================================
// ENVIRONMENT VARIABLE NAMES
// =============================================================================

pub const ENV_GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_GEMINI_BASE_URL: &str = "GEMINI_BASE_URL";
pub const ENV_GEMINI_MODEL: &str = "GEMINI_MODEL";
pub const ENV_GEMINI_TIMEOUT: &str = "GEMINI_TIMEOUT";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_OPENAI_IMAGE_MODEL: &str = "OPENAI_IMAGE_MODEL";
pub const ENV_OPENAI_TIMEOUT: &str = "OPENAI_TIMEOUT";
