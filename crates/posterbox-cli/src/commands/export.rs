//! Export command - write the static JSON archive.

use super::{get_database, get_paths, load_config};
use anyhow::{Context, Result};
use colored::Colorize;
use posterbox_ingest::Exporter;
use std::path::PathBuf;

pub fn run(output: Option<PathBuf>) -> Result<()> {
    let config = load_config()?;
    let paths = get_paths()?;
    let db = get_database(&config, &paths)?;

    let output = output.unwrap_or_else(|| config.storage.export_file(&paths));
    let count = Exporter::new(&db)
        .write(&output)
        .with_context(|| format!("Failed to export to {}", output.display()))?;

    println!(
        "{} Exported {} posters to {}",
        "✓".green(),
        count,
        output.display()
    );
    Ok(())
}
