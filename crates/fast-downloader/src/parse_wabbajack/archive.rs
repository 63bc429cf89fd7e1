//! Reading the manifest out of a `.wabbajack` file
//!
//! A `.wabbajack` file is a zip archive whose `modlist` entry holds the JSON
//! manifest. Plain (already extracted) manifest files are read as-is.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;
use crate::core::{FileOperation, LinkError, Result};

/// Extensions treated as zip containers
const ARCHIVE_EXTENSIONS: &[&str] = &["wabbajack", "zip"];

/// Check whether `path` names a Wabbajack/zip container
pub fn is_archive(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| ARCHIVE_EXTENSIONS.contains(&ext.as_str()))
}

/// Read the bytes of the `entry` member of a zip archive
pub fn read_archive_entry(path: &Path, entry: &str) -> Result<Vec<u8>> {
    let file = File::open(path).map_err(|e| LinkError::modlist_io(path, e))?;
    let archive_error = |source| LinkError::Archive {
        path: path.to_path_buf(),
        entry: entry.to_string(),
        source,
    };

    let mut archive = zip::ZipArchive::new(file).map_err(archive_error)?;
    let mut member = archive.by_name(entry).map_err(archive_error)?;

    let mut bytes = Vec::with_capacity(member.size() as usize);
    member
        .read_to_end(&mut bytes)
        .map_err(|e| LinkError::io(path, FileOperation::Read, e))?;

    debug!("Read {} bytes of '{}' from {}", bytes.len(), entry, path.display());
    Ok(bytes)
}

/// Load manifest bytes from either a `.wabbajack` archive or a plain file
pub fn read_modlist(path: &Path, entry: &str) -> Result<Vec<u8>> {
    if is_archive(path) {
        read_archive_entry(path, entry)
    } else {
        std::fs::read(path).map_err(|e| LinkError::modlist_io(path, e))
    }
}
