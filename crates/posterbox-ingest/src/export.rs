//! Static JSON export of stored posters.

use crate::error::{IngestError, IngestResult};
use posterbox_db::Database;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::path::Path;
use tracing::info;

/// Flattens the poster repository into the publication format: a JSON array
/// of `{id, image_path, tags}` objects.
pub struct Exporter<'a> {
    db: &'a Database,
}

impl<'a> Exporter<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Render the export document.
    pub fn render(&self) -> IngestResult<(String, usize)> {
        let records = self.db.posters_with_tags()?;

        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        records.serialize(&mut ser)?;

        // serde_json only emits valid UTF-8.
        let json = String::from_utf8_lossy(&buf).into_owned();
        Ok((json, records.len()))
    }

    /// Write the export to `path`, creating parent directories. Returns the
    /// number of posters written.
    pub fn write(&self, path: &Path) -> IngestResult<usize> {
        let (json, count) = self.render()?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| IngestError::storage(parent, e))?;
            }
        }
        fs::write(path, json).map_err(|e| IngestError::storage(path, e))?;

        info!("Exported {} posters to {}", count, path.display());
        Ok(count)
    }
}
