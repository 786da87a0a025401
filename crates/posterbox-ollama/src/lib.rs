//! Posterbox Ollama - Named-entity tagging through a local Ollama model.
//!
//! The HTTP client is async; [`OllamaTagExtractor`] owns a runtime and
//! exposes the blocking [`posterbox_core::TagExtractor`] contract used by the
//! ingestion pipeline.

mod client;
mod error;
mod tagger;
mod types;

pub use client::OllamaClient;
pub use error::{OllamaError, OllamaResult};
pub use tagger::{parse_entities, OllamaTagExtractor};
pub use types::*;
