//! BILLSTATUS document discovery
//!
//! Recursively walks the data root collecting files that match either
//! filename convention: `BILLSTATUS-*.xml` (GovInfo bulk data) or
//! `fdsys_billstatus.xml` (older per-bill directories). The result is
//! sorted lexicographically and deduplicated so every run visits the same
//! documents in the same order.

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Document scanner errors
#[derive(Debug, Error)]
pub enum ScanError {
    /// Specified path does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Discover all BILLSTATUS documents under the data root
///
/// Errors on individual entries (permission problems, dangling symlinks)
/// are logged and skipped; the walk continues.
pub fn discover(data_root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !data_root.exists() {
        return Err(ScanError::PathNotFound(data_root.to_path_buf()));
    }

    if !data_root.is_dir() {
        return Err(ScanError::NotADirectory(data_root.to_path_buf()));
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(data_root).follow_links(false) {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && is_billstatus_file(entry.file_name()) {
                    files.push(entry.path().to_path_buf());
                }
            }
            Err(e) => {
                tracing::warn!("Error accessing entry: {}", e);
            }
        }
    }

    files.sort();
    files.dedup();

    Ok(files)
}

fn is_billstatus_file(file_name: &std::ffi::OsStr) -> bool {
    let name = file_name.to_string_lossy();
    name == "fdsys_billstatus.xml"
        || (name.starts_with("BILLSTATUS-") && name.ends_with(".xml"))
}
