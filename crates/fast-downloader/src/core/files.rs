//! File operation utilities
//!
//! Centralized file handling so every write of the link list goes through the
//! same temp-file-then-rename path.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use crate::core::{FileOperation, LinkError, Result};

/// Create a temporary file path next to the destination
///
/// Returns a path with .part extension so the rename stays on one file system.
pub fn create_temp_path(dest_path: &Path) -> PathBuf {
    let mut name = dest_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    dest_path.with_file_name(name)
}

/// Atomically rename a temporary file to its final destination
pub fn atomic_rename(temp_path: &Path, dest_path: &Path) -> Result<()> {
    fs::rename(temp_path, dest_path)
        .map_err(|e| LinkError::io(dest_path, FileOperation::Move, e))?;
    debug!("Atomically renamed {} to {}", temp_path.display(), dest_path.display());
    Ok(())
}

/// Write `lines` to `dest_path`, one per line with a trailing newline
///
/// The data lands in a `.part` file that is flushed and closed before being
/// renamed over the destination, so readers see either the old or the new list.
pub fn write_lines_atomic<I, S>(dest_path: &Path, lines: I) -> Result<usize>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let temp_path = create_temp_path(dest_path);
    let result = write_lines(&temp_path, lines).and_then(|written| {
        atomic_rename(&temp_path, dest_path)?;
        Ok(written)
    });

    if result.is_err() && temp_path.exists() {
        if let Err(e) = fs::remove_file(&temp_path) {
            warn!("Failed to remove {}: {}", temp_path.display(), e);
        }
    }
    result
}

/// Write, flush and sync `lines` into a freshly created `path`
fn write_lines<I, S>(path: &Path, lines: I) -> Result<usize>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let file = File::create(path)
        .map_err(|e| LinkError::io(path, FileOperation::Create, e))?;
    let mut writer = BufWriter::new(file);

    let mut written = 0;
    for line in lines {
        writer
            .write_all(line.as_ref().as_bytes())
            .and_then(|_| writer.write_all(b"\n"))
            .map_err(|e| LinkError::io(path, FileOperation::Write, e))?;
        written += 1;
    }

    let file = writer
        .into_inner()
        .map_err(|e| LinkError::io(path, FileOperation::Write, e.into_error()))?;
    file.sync_all()
        .map_err(|e| LinkError::io(path, FileOperation::Write, e))?;
    Ok(written)
}
