//! Core domain types for Posterbox.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Identifier assigned to a poster by the store.
pub type PosterId = i64;

/// Identifier assigned to a tag by the store.
pub type TagId = i64;

/// Image formats accepted as poster attachments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Tiff,
    Bmp,
    Gif,
}

impl ImageFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Tiff => "tiff",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Gif => "gif",
        }
    }

    /// Detect the image format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "tiff" => Some(ImageFormat::Tiff),
            "bmp" => Some(ImageFormat::Bmp),
            "gif" => Some(ImageFormat::Gif),
            _ => None,
        }
    }

    /// Detect the image format from a filename.
    pub fn from_filename(name: &str) -> Option<Self> {
        Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A poster extracted from a single image attachment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Poster {
    pub id: PosterId,
    pub image_path: String,
    pub extracted_text: Option<String>,
    pub date_received: DateTime<Utc>,
}

/// A descriptive label derived from a poster's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

/// Membership of a tag on a poster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PosterTag {
    pub poster_id: PosterId,
    pub tag_id: TagId,
}

/// Denormalized poster entry used for publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosterRecord {
    pub id: PosterId,
    pub image_path: String,
    pub tags: Vec<String>,
}

/// Statistics about the poster store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseStats {
    pub total_posters: i64,
    pub untagged_posters: i64,
    pub total_tags: i64,
    pub total_links: i64,
    pub latest_received: Option<DateTime<Utc>>,
    pub database_size_bytes: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_format_from_extension() {
        assert_eq!(ImageFormat::from_extension("png"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_extension("JPG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("tiff"), Some(ImageFormat::Tiff));
        assert_eq!(ImageFormat::from_extension("bmp"), Some(ImageFormat::Bmp));
        assert_eq!(ImageFormat::from_extension("gif"), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::from_extension("webp"), None);
        assert_eq!(ImageFormat::from_extension("pdf"), None);
    }

    #[test]
    fn test_image_format_from_filename() {
        assert_eq!(ImageFormat::from_filename("event.PNG"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_filename("flyer.final.gif"), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::from_filename("notes.txt"), None);
        assert_eq!(ImageFormat::from_filename("png"), None);
    }

    #[test]
    fn test_poster_record_serializes_export_fields() {
        let record = PosterRecord {
            id: 7,
            image_path: "attachments/event.png".to_string(),
            tags: vec!["Austin".to_string()],
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": 7,
                "image_path": "attachments/event.png",
                "tags": ["Austin"],
            })
        );
    }
}
