//! OpenAI image API response types.

use serde::Deserialize;

/// Response from the image-edit endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ImageEditResponse {
    #[serde(default)]
    pub data: Option<Vec<ImageEditData>>,
}

/// Single generated image.
#[derive(Debug, Deserialize)]
pub struct ImageEditData {
    #[serde(default)]
    pub b64_json: Option<String>,
    #[serde(default)]
    pub revised_prompt: Option<String>,
}

impl ImageEditResponse {
    /// Base64 data of the first result, if present and non-empty.
    pub fn first_image(&self) -> Option<&str> {
        self.data
            .as_deref()
            .and_then(|d| d.first())
            .and_then(|d| d.b64_json.as_deref())
            .filter(|b64| !b64.is_empty())
    }
}

/// Error response from OpenAI API.
#[derive(Debug, Deserialize)]
pub struct OpenAIErrorResponse {
    pub error: OpenAIError,
}

/// Detailed error information.
#[derive(Debug, Deserialize)]
pub struct OpenAIError {
    pub message: String,
    #[serde(default, rename = "type")]
    pub error_type: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_edit_response_deserialization() {
        let json = r#"{
            "created": 1713833628,
            "data": [{"b64_json": "iVBORw0KGgo="}],
            "usage": {"total_tokens": 100}
        }"#;

        let response: ImageEditResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.first_image(), Some("iVBORw0KGgo="));
    }

    #[test]
    fn test_image_edit_response_without_image() {
        for json in [r#"{}"#, r#"{"data":[]}"#, r#"{"data":[{"url":"https://x"}]}"#] {
            let response: ImageEditResponse = serde_json::from_str(json).unwrap();
            assert_eq!(response.first_image(), None, "input: {}", json);
        }
    }

    #[test]
    fn test_error_response_deserialization() {
        let json = r#"{"error":{"message":"Invalid image","type":"invalid_request_error","code":null}}"#;
        let response: OpenAIErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.error.message, "Invalid image");
        assert_eq!(
            response.error.error_type.as_deref(),
            Some("invalid_request_error")
        );
    }
}
