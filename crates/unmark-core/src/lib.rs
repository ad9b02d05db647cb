//! # unmark-core
//!
//! Core types, traits, and abstractions for the unmark image proxy.
//!
//! This crate provides the data model shared by the provider clients and the
//! HTTP server: image payloads, the statistics record, the error type, and
//! the trait seams (`ImageRemovalProvider`, `KvStore`) the other crates
//! implement.

pub mod defaults;
pub mod error;
pub mod models;
pub mod prompt;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use prompt::removal_instruction;
pub use traits::*;
