//! CLI command implementations.

pub mod check;
pub mod export;
pub mod init;
pub mod run;
pub mod stats;
pub mod tags;

use anyhow::{Context, Result};
use posterbox_config::{AppPaths, Config};
use posterbox_core::{NoRecognition, NoTagging, TagExtractor, TextRecognizer};
use posterbox_db::Database;
use posterbox_ollama::OllamaTagExtractor;
use posterbox_process::TesseractRecognizer;
use tracing::{info, warn};

/// Get the application paths.
pub fn get_paths() -> Result<AppPaths> {
    AppPaths::new().context("Failed to determine application directories")
}

/// Load configuration and apply the color preference.
pub fn load_config() -> Result<Config> {
    let config = Config::load().context("Failed to load configuration")?;
    if !config.ui.color {
        colored::control::set_override(false);
    }
    Ok(config)
}

/// Open the database, creating the schema the first time.
pub fn get_database(config: &Config, paths: &AppPaths) -> Result<Database> {
    let path = config.storage.database_file(paths);

    if !path.exists() {
        info!("Database not found. Initializing...");
    }

    Database::open(&path).with_context(|| format!("Failed to open database {}", path.display()))
}

/// Build the text recognizer once for the process.
pub fn build_recognizer(config: &Config) -> Box<dyn TextRecognizer> {
    if !config.ocr.enabled {
        return Box::new(NoRecognition::new("OCR is disabled in config"));
    }

    match TesseractRecognizer::new(&config.ocr.language, config.ocr.page_segmentation) {
        Ok(recognizer) => Box::new(recognizer),
        Err(e) => {
            warn!("{}; posters will be stored without text", e);
            Box::new(NoRecognition::new(e.to_string()))
        }
    }
}

/// Build the tag extractor once for the process.
pub fn build_tagger(config: &Config) -> Box<dyn TagExtractor> {
    if !config.tagging.enabled {
        return Box::new(NoTagging);
    }

    match OllamaTagExtractor::from_config(&config.tagging) {
        Ok(tagger) => Box::new(tagger),
        Err(e) => {
            warn!("Tagging unavailable: {}", e);
            Box::new(NoTagging)
        }
    }
}

/// Format a file size in human-readable form.
pub fn format_size(bytes: i64) -> String {
    const KB: i64 = 1024;
    const MB: i64 = KB * 1024;
    const GB: i64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
