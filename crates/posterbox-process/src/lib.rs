//! Posterbox Process - Text recognition for poster images.
//!
//! OCR is delegated to the Tesseract CLI, which must be installed on the
//! system.

mod error;
mod ocr;

pub use error::{ProcessError, ProcessResult};
pub use ocr::TesseractRecognizer;

/// Check if required external tools are available.
pub fn check_dependencies() -> Vec<(&'static str, bool)> {
    vec![("tesseract", which::which("tesseract").is_ok())]
}
