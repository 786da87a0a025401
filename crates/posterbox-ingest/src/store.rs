//! Filesystem store for attachment bytes.

use crate::error::{IngestError, IngestResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A directory of attachment files keyed by their original filename.
///
/// Files with the same name overwrite each other; the last write wins.
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
}

impl ContentStore {
    /// Open the store, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> IngestResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| IngestError::storage(&root, e))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a file with this name would be stored at.
    pub fn path_for(&self, filename: &str) -> IngestResult<PathBuf> {
        Ok(self.root.join(sanitize_filename(filename)?))
    }

    /// Write `data` under `filename` and return the stored path.
    pub fn save(&self, filename: &str, data: &[u8]) -> IngestResult<PathBuf> {
        let path = self.path_for(filename)?;

        if path.exists() {
            warn!(
                path = %path.display(),
                "Attachment filename already stored; overwriting previous file"
            );
        }

        fs::write(&path, data).map_err(|e| IngestError::storage(&path, e))?;
        debug!("Stored {} bytes at {}", data.len(), path.display());

        Ok(path)
    }
}

/// Keep only the final path component so a sender cannot write outside the
/// store.
fn sanitize_filename(filename: &str) -> IngestResult<&str> {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or_default().trim();

    if name.is_empty() || name == "." || name == ".." {
        return Err(IngestError::InvalidFilename(filename.to_string()));
    }
    Ok(name)
}
