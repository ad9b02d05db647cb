//! # unmark-providers
//!
//! Generative-image provider clients for unmark.
//!
//! This crate provides:
//! - Gemini `generateContent` client (primary)
//! - OpenAI image-edit client (fallback)
//! - [`ProviderChain`], which tries configured providers in priority order
//! - Mock provider for tests (feature `mock`)
//!
//! # Example
//!
//! ```rust,no_run
//! use unmark_core::{ImagePayload, RemovalRequest};
//! use unmark_providers::ProviderChain;
//!
//! #[tokio::main]
//! async fn main() {
//!     let chain = ProviderChain::from_env().unwrap();
//!     let request = RemovalRequest::new(ImagePayload::new("iVBORw0KGgo=", "image/png"), None);
//!     let result = chain.run(&request).await.unwrap();
//!     println!("{} produced {} base64 chars", result.provider, result.base64_image.len());
//! }
//! ```

pub mod chain;
pub mod gemini;
pub mod openai;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use chain::ProviderChain;
pub use gemini::{GeminiConfig, GeminiProvider};
pub use openai::{OpenAIImageConfig, OpenAIImageProvider};

#[cfg(any(test, feature = "mock"))]
pub use mock::MockProvider;
