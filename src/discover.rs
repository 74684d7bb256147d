//! Corpus file discovery.

use crate::error::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Default extension of layout records.
pub const DEFAULT_EXTENSION: &str = "json";

/// Recursively collect every file under `root` with the given extension.
///
/// The extension is matched without the leading dot and ignoring ASCII case.
/// Traversal errors (missing root, unreadable directory) are returned, not
/// skipped. Paths are sorted so that runs are reproducible.
///
/// # Example
/// ```no_run
/// use zonestat::discover::discover_files;
///
/// let files = discover_files("corpus", "json").unwrap();
/// println!("Total JSON files found: {}", files.len());
/// ```
pub fn discover_files<P: AsRef<Path>>(root: P, extension: &str) -> Result<Vec<PathBuf>> {
    let extension = extension.trim_start_matches('.');
    let mut files = Vec::new();
    for entry in WalkDir::new(root.as_ref()) {
        let entry = entry?;
        if entry.file_type().is_file() && is_layout_file(entry.path(), extension) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    log::debug!(
        "Discovered {} .{} files under {}",
        files.len(),
        extension,
        root.as_ref().display()
    );
    Ok(files)
}

/// Check if a path has the given extension.
pub fn is_layout_file<P: AsRef<Path>>(path: P, extension: &str) -> bool {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(extension.trim_start_matches('.')))
        .unwrap_or(false)
}
