//! OCR processing using Tesseract.

use crate::error::{ProcessError, ProcessResult};
use posterbox_core::TextRecognizer;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Text recognizer backed by the `tesseract` binary.
///
/// The binary is resolved once at construction; each call spawns one
/// process per image.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    binary: PathBuf,
    language: String,
    page_segmentation: u8,
}

impl TesseractRecognizer {
    /// Locate `tesseract` on the `PATH`.
    pub fn new(language: impl Into<String>, page_segmentation: u8) -> ProcessResult<Self> {
        let binary = which::which("tesseract").map_err(|_| ProcessError::ToolNotFound {
            tool: "tesseract".to_string(),
        })?;
        Ok(Self::with_binary(binary, language, page_segmentation))
    }

    /// Use an explicit binary location.
    pub fn with_binary(
        binary: impl Into<PathBuf>,
        language: impl Into<String>,
        page_segmentation: u8,
    ) -> Self {
        Self {
            binary: binary.into(),
            language: language.into(),
            page_segmentation,
        }
    }

    /// Perform OCR on an image file.
    pub fn ocr_image(&self, image_path: &Path) -> ProcessResult<String> {
        if !image_path.exists() {
            return Err(ProcessError::FileNotFound(image_path.to_path_buf()));
        }

        debug!("Running OCR on {:?}", image_path);

        let output = Command::new(&self.binary)
            .arg(image_path)
            .arg("stdout") // Output to stdout instead of file
            .args(["-l", &self.language])
            .args(["--oem", "3"]) // LSTM + legacy engine
            .args(["--psm", &self.page_segmentation.to_string()])
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            // Tesseract sometimes outputs warnings to stderr but still works
            if !output.stdout.is_empty() {
                debug!("Tesseract warning: {}", stderr);
            } else {
                return Err(ProcessError::OcrError(stderr.trim().to_string()));
            }
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, image_path: &Path) -> posterbox_core::Result<String> {
        self.ocr_image(image_path).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_image_is_reported() {
        let recognizer = TesseractRecognizer::with_binary("tesseract", "eng", 1);
        let err = recognizer
            .ocr_image(Path::new("/definitely/not/here.png"))
            .unwrap_err();
        assert!(matches!(err, ProcessError::FileNotFound(_)));
    }

    #[test]
    fn test_missing_binary_surfaces_as_recognition_error() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("poster.png");
        std::fs::write(&image, b"not really a png").unwrap();

        let recognizer =
            TesseractRecognizer::with_binary(dir.path().join("no-such-tesseract"), "eng", 1);
        let err = recognizer.recognize(&image).unwrap_err();

        assert!(matches!(err, posterbox_core::Error::Recognition(_)));
    }

    #[test]
    fn test_tool_check() {
        let _ = which::which("tesseract");
    }
}
