//! Posterbox Core - Core types and capability contracts for the poster pipeline.

mod capability;
mod error;
mod types;

pub use capability::{normalize_tags, NoRecognition, NoTagging, TagExtractor, TextRecognizer};
pub use error::{Error, Result};
pub use types::*;
