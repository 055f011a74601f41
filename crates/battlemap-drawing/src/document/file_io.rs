use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::MapDocument;
use crate::serialization::MapDataReader;

impl MapDocument {
    /// Saves the document to `path`. The file is replaced only once the new
    /// contents are fully written.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes().context("Failed to serialize map document")?;
        write_atomically(path, &bytes)?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "map saved");
        Ok(())
    }

    /// Replaces this document with the one stored at `path`. On any failure
    /// the current document is left exactly as it was.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let loaded = read_document(path, self.history_limit())?;
        *self = loaded;
        tracing::info!(path = %path.display(), shapes = self.shape_count(), "map loaded");
        Ok(())
    }

    /// Opens the document stored at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut document = MapDocument::new();
        document.load_from_file(path)?;
        Ok(document)
    }
}

fn read_document(path: &Path, history_limit: Option<usize>) -> Result<MapDocument> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open map file {}", path.display()))?;
    let mut reader = MapDataReader::new(BufReader::new(file));
    MapDocument::deserialize(&mut reader, history_limit).map_err(|err| {
        tracing::warn!(
            path = %path.display(),
            line = reader.line_number(),
            error = %err,
            "map load rejected"
        );
        anyhow::Error::new(err).context(format!(
            "Failed to parse map file {} near line {}",
            path.display(),
            reader.line_number()
        ))
    })
}

fn sibling_temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes `bytes` to a temporary file beside `path`, then renames it over
/// `path`. Safe to call from a worker thread with a snapshot taken by
/// [`MapDocument::to_bytes`].
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let temp = sibling_temp_path(path);
    let written = File::create(&temp)
        .and_then(|mut file| {
            file.write_all(bytes)?;
            file.sync_all()
        })
        .with_context(|| format!("Failed to write map file {}", temp.display()));

    if let Err(err) = written {
        let _ = fs::remove_file(&temp);
        return Err(err);
    }
    fs::rename(&temp, path).with_context(|| {
        let _ = fs::remove_file(&temp);
        format!("Failed to replace map file {}", path.display())
    })
}
