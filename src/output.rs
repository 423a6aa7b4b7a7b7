// src/output.rs

use anyhow::{Context, Result};
use std::{fs, io::Write, path::Path};
use tempfile::NamedTempFile;
use tracing::warn;

/// Whether a stage may (re)write `path`. Warns when an existing file is kept.
pub fn writable(path: &Path, overwrite: bool) -> bool {
    if path.is_file() && !overwrite {
        warn!(path = %path.display(), "exists and is not overwritable");
        return false;
    }
    true
}

/// Write `contents` to a temp file beside `path`, then rename it into place,
/// so a failed run never leaves a truncated output behind.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).with_context(|| format!("creating {:?}", dir))?;

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temp file in {:?}", dir))?;
    tmp.write_all(contents)
        .with_context(|| format!("writing temp file for {:?}", path))?;
    tmp.persist(path)
        .with_context(|| format!("renaming temp file to {:?}", path))?;
    Ok(())
}

/// Remove `path` if it is a file; absent files are fine.
pub fn remove_if_exists(path: &Path) -> Result<()> {
    if path.is_file() {
        fs::remove_file(path).with_context(|| format!("removing {:?}", path))?;
    }
    Ok(())
}
