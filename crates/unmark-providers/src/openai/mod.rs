//! OpenAI image-edit provider (fallback).
//!
//! Uploads the decoded image as a multipart file together with the edit
//! instruction and returns the first base64 result.
//!
//! # Example
//!
//! ```rust,no_run
//! use unmark_core::{ImagePayload, ImageRemovalProvider};
//! use unmark_providers::openai::{OpenAIImageConfig, OpenAIImageProvider};
//!
//! #[tokio::main]
//! async fn main() {
//!     let provider = OpenAIImageProvider::new(OpenAIImageConfig::new("sk-...")).unwrap();
//!     let image = ImagePayload::new("iVBORw0KGgo=", "image/png");
//!     let b64 = provider.attempt(&image, "Remove the logo").await.unwrap();
//!     println!("{} base64 chars", b64.len());
//! }
//! ```

mod backend;
mod types;

pub use backend::{upload_file_name, OpenAIImageConfig, OpenAIImageProvider};
pub use types::*;
