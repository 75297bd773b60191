use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tempfile::{Builder, NamedTempFile};

use crate::error::{AppError, Result};

const STAGING_SUFFIX: &str = ".tmp";

fn publish_error(path: &Path, source: std::io::Error) -> AppError {
    AppError::Publish {
        path: path.display().to_string(),
        source,
    }
}

/// Creates a uniquely named staging file beside `path`, so concurrent runs
/// never share one.
fn staging_file(path: &Path) -> std::io::Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    Builder::new()
        .prefix(&format!(".{name}."))
        .suffix(STAGING_SUFFIX)
        .tempfile_in(dir)
}

/// Serializes `document` as pretty JSON and replaces `path` with it.
///
/// The document is written to a staging file in the same directory, synced,
/// and renamed over `path`, so readers see either the previous document or
/// the new one. Each call stages to its own file; when runs overlap the last
/// rename wins. On failure the staged file is removed and `path` is left
/// untouched.
pub fn write_snapshot_atomic<T: Serialize>(path: &Path, document: &T) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|err| publish_error(path, err))?;
    }

    let mut bytes = serde_json::to_vec_pretty(document)?;
    bytes.push(b'\n');

    // Dropping the handle on an early return deletes the staged file.
    let mut staged = staging_file(path).map_err(|err| publish_error(path, err))?;
    staged
        .write_all(&bytes)
        .and_then(|()| staged.as_file().sync_all())
        .map_err(|err| publish_error(path, err))?;
    staged
        .persist(path)
        .map_err(|err| publish_error(path, err.error))?;
    Ok(())
}
