//! Error types for unmark.

use thiserror::Error;

/// Result type alias using unmark's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for unmark operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Request body is unusable (missing image, unparseable JSON)
    #[error("{0}")]
    InvalidRequest(String),

    /// No provider credential is configured
    #[error("API key not configured")]
    NoProviderConfigured,

    /// Provider call failed (non-2xx status or transport failure)
    #[error("Failed to process image with {provider}: {message}")]
    Provider {
        provider: String,
        status: Option<u16>,
        message: String,
        /// Raw response body returned by the provider, if any.
        body: Option<String>,
    },

    /// Provider answered 2xx but without the expected image field
    #[error("No image data in response from {0}")]
    NoImageInResponse(String),

    /// Base64 image data could not be turned into bytes
    #[error("Failed to decode image data: {0}")]
    DecodeFailed(String),

    /// Key-value store operation failed
    #[error("Store error: {0}")]
    Store(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Stable taxonomy code surfaced in logs.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidRequest(_) => "missing-image",
            Error::NoProviderConfigured => "no-provider-configured",
            Error::Provider { .. } | Error::NoImageInResponse(_) => "provider-error",
            Error::DecodeFailed(_) => "decode-error",
            Error::Store(_)
            | Error::Serialization(_)
            | Error::Config(_)
            | Error::Internal(_) => "internal",
        }
    }

    /// Diagnostic detail for the caller.
    ///
    /// Provider failures carry the provider's own response text; everything
    /// else falls back to the debug rendering.
    pub fn details(&self) -> Option<String> {
        match self {
            Error::Provider {
                body: Some(body), ..
            } if !body.is_empty() => Some(body.clone()),
            other => Some(format!("{:?}", other)),
        }
    }

    /// Build a provider error from a non-success HTTP response.
    pub fn provider_status(provider: &str, status: reqwest::StatusCode, body: String) -> Self {
        Error::Provider {
            provider: provider.to_string(),
            status: Some(status.as_u16()),
            message: format!(
                "{} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            ),
            body: Some(body),
        }
    }

    /// Build a provider error for a transport-level failure.
    pub fn provider_transport(provider: &str, message: impl Into<String>) -> Self {
        Error::Provider {
            provider: provider.to_string(),
            status: None,
            message: message.into(),
            body: None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<base64::DecodeError> for Error {
    fn from(e: base64::DecodeError) -> Self {
        Error::DecodeFailed(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_request_is_verbatim() {
        let err = Error::InvalidRequest("Image is required".to_string());
        assert_eq!(err.to_string(), "Image is required");
    }

    #[test]
    fn test_error_display_no_provider() {
        assert_eq!(
            Error::NoProviderConfigured.to_string(),
            "API key not configured"
        );
    }

    #[test]
    fn test_error_display_no_image() {
        let err = Error::NoImageInResponse("gemini".to_string());
        assert_eq!(err.to_string(), "No image data in response from gemini");
    }

    #[test]
    fn test_provider_status_message() {
        let err = Error::provider_status(
            "gemini",
            reqwest::StatusCode::TOO_MANY_REQUESTS,
            "quota exceeded".to_string(),
        );
        assert_eq!(
            err.to_string(),
            "Failed to process image with gemini: 429 Too Many Requests"
        );
        match err {
            Error::Provider { status, body, .. } => {
                assert_eq!(status, Some(429));
                assert_eq!(body.as_deref(), Some("quota exceeded"));
            }
            _ => panic!("Expected Provider error"),
        }
    }

    #[test]
    fn test_codes() {
        assert_eq!(
            Error::InvalidRequest("x".into()).code(),
            "missing-image"
        );
        assert_eq!(Error::NoProviderConfigured.code(), "no-provider-configured");
        assert_eq!(
            Error::provider_transport("openai", "timed out").code(),
            "provider-error"
        );
        assert_eq!(
            Error::NoImageInResponse("openai".into()).code(),
            "provider-error"
        );
        assert_eq!(Error::DecodeFailed("bad".into()).code(), "decode-error");
        assert_eq!(Error::Store("down".into()).code(), "internal");
        assert_eq!(Error::Internal("bad part".into()).code(), "internal");
    }

    #[test]
    fn test_details_prefers_provider_body() {
        let err = Error::provider_status(
            "openai",
            reqwest::StatusCode::BAD_REQUEST,
            r#"{"error":{"message":"bad image"}}"#.to_string(),
        );
        assert_eq!(
            err.details().as_deref(),
            Some(r#"{"error":{"message":"bad image"}}"#)
        );
    }

    #[test]
    fn test_details_falls_back_to_debug() {
        let err = Error::DecodeFailed("Invalid padding".to_string());
        let details = err.details().unwrap();
        assert!(details.contains("DecodeFailed"));
    }

    #[test]
    fn test_from_base64_error() {
        use base64::Engine;
        let decode_err = base64::engine::general_purpose::STANDARD
            .decode("***")
            .unwrap_err();
        let err: Error = decode_err.into();
        assert!(matches!(err, Error::DecodeFailed(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        assert!(err.to_string().contains("Serialization error:"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
