//! Watermark removal HTTP handler.
//!
//! Accepts a base64 image, runs it through the provider chain and returns
//! the edited image as raw PNG bytes.

use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{error, info, Instrument};

use unmark_core::defaults;
use unmark_core::{decode_base64_image, Error, ImagePayload, RemovalRequest, Result};

use crate::{ApiError, AppState};

const IMAGE_REQUIRED: &str = "Image is required";

/// Request body for removing content from an image.
#[derive(Debug, Deserialize)]
pub struct RemoveWatermarkRequest {
    pub image: Option<InboundImage>,
    /// What to remove. Defaults to "watermarks" when absent or blank.
    #[serde(rename = "removalText")]
    pub removal_text: Option<String>,
}

/// Image as sent by the client.
#[derive(Debug, Deserialize)]
pub struct InboundImage {
    /// Base64-encoded image bytes (required).
    pub data: Option<String>,
    /// MIME type of the image. Defaults to "image/png" if not provided.
    #[serde(alias = "mimeType")]
    pub mime_type: Option<String>,
}

impl RemoveWatermarkRequest {
    /// Validate the body into a removal request.
    ///
    /// A missing `image`, missing `data` or blank `data` all report
    /// "Image is required"; data that does not decode to bytes is a
    /// decode error.
    pub fn into_removal_request(self) -> Result<RemovalRequest> {
        let image = self
            .image
            .ok_or_else(|| Error::InvalidRequest(IMAGE_REQUIRED.to_string()))?;
        let data = image
            .data
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| Error::InvalidRequest(IMAGE_REQUIRED.to_string()))?;

        decode_base64_image(&data)?;

        let mime_type = image
            .mime_type
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| defaults::IMAGE_MIME_TYPE.to_string());

        Ok(RemovalRequest::new(
            ImagePayload::new(data, mime_type),
            self.removal_text.as_deref(),
        ))
    }
}

fn parse_body(body: &[u8]) -> Result<RemovalRequest> {
    let request: RemoveWatermarkRequest = serde_json::from_slice(body)
        .map_err(|e| Error::InvalidRequest(format!("Invalid request body: {}", e)))?;
    request.into_removal_request()
}

async fn process(state: &AppState, body: &[u8]) -> Result<Vec<u8>> {
    let request = parse_body(body)?;

    let span = tracing::Span::current();
    span.record("mime_type", request.image.mime_type.as_str());
    span.record("data_len", request.image.data.len());
    span.record("removal_text", request.removal_text.as_str());
    info!("Processing removal request");

    let result = state.chain.run(&request).await?;
    let bytes = result.decode()?;
    info!(
        provider = %result.provider,
        output_bytes = bytes.len(),
        "Image processed"
    );
    Ok(bytes)
}

/// Remove the requested content from an image.
///
/// The body is parsed inside the handler so the run counters are updated
/// before validation.
///
/// # Request Body
/// - `image.data`: Base64-encoded image bytes (required)
/// - `image.mime_type`: Image MIME type (optional, defaults to "image/png")
/// - `removalText`: What to remove (optional, defaults to "watermarks")
///
/// # Returns
/// - 200 OK with `image/png` bytes
/// - 500 with `{error, details}` on any failure, including a missing image
pub async fn remove_watermark(
    State(state): State<AppState>,
    body: Bytes,
) -> std::result::Result<Response, ApiError> {
    state.stats.record_run_started().await;

    let span = tracing::info_span!(
        "remove_watermark",
        mime_type = tracing::field::Empty,
        data_len = tracing::field::Empty,
        removal_text = tracing::field::Empty,
    );

    let outcome = process(&state, &body).instrument(span.clone()).await;

    match outcome {
        Ok(bytes) => {
            state.stats.record_outcome(true).await;
            Ok((
                [(header::CONTENT_TYPE, defaults::RESPONSE_CONTENT_TYPE)],
                bytes,
            )
                .into_response())
        }
        Err(err) => {
            span.in_scope(|| {
                error!(error_code = err.code(), error = %err, "Removal request failed");
            });
            state.stats.record_outcome(false).await;
            Err(ApiError::Core(err))
        }
    }
}
