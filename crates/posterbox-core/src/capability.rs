//! Contracts for the external OCR and NER providers.
//!
//! Providers are expensive to set up (model loads, binary lookups, HTTP
//! clients), so they are built once per process and handed to every
//! ingestion pass by reference.

use crate::error::{Error, Result};
use std::collections::HashSet;
use std::path::Path;

/// Extracts raw text from an image.
pub trait TextRecognizer {
    /// Recognize the text in the image stored at `image_path`.
    fn recognize(&self, image_path: &Path) -> Result<String>;
}

/// Extracts entity-like tags from text.
pub trait TagExtractor {
    /// Extract candidate tags from `text`. The result may contain duplicates
    /// and untrimmed names; callers should pass it through [`normalize_tags`].
    fn extract_tags(&self, text: &str) -> Result<Vec<String>>;
}

impl<T: TextRecognizer + ?Sized> TextRecognizer for &T {
    fn recognize(&self, image_path: &Path) -> Result<String> {
        (**self).recognize(image_path)
    }
}

impl<T: TagExtractor + ?Sized> TagExtractor for &T {
    fn extract_tags(&self, text: &str) -> Result<Vec<String>> {
        (**self).extract_tags(text)
    }
}

/// Recognizer used when OCR is disabled or unavailable. Every image fails,
/// so posters are stored with empty text.
#[derive(Debug, Clone)]
pub struct NoRecognition {
    reason: String,
}

impl NoRecognition {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl TextRecognizer for NoRecognition {
    fn recognize(&self, _image_path: &Path) -> Result<String> {
        Err(Error::Recognition(self.reason.clone()))
    }
}

/// Tag extractor used when tagging is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTagging;

impl TagExtractor for NoTagging {
    fn extract_tags(&self, _text: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

/// Trim tag names, drop empty ones and remove exact duplicates while
/// keeping first-seen order.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    tags.into_iter()
        .map(|tag| tag.as_ref().trim().to_string())
        .filter(|tag| !tag.is_empty())
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}
