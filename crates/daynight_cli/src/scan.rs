//! Source directory listing.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::RunError;

/// Regular files found directly inside the source directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceListing {
    /// Image file names, sorted.
    pub images: Vec<String>,
    /// Other regular files, sorted. They take no part in classification.
    pub ignored: Vec<String>,
}

/// List the files directly inside `dir`.
///
/// Regular files whose extension matches one of `extensions`
/// (case-insensitive) are images; every other regular file is logged and
/// listed as ignored. Subdirectories are not descended into. A directory
/// without images is a configuration error.
pub fn scan_source(dir: &Path, extensions: &[String]) -> Result<SourceListing, RunError> {
    let entries = fs::read_dir(dir)
        .map_err(|error| RunError::io("failed to read source directory", dir, error))?;

    let mut listing = SourceListing::default();
    for entry in entries {
        let entry =
            entry.map_err(|error| RunError::io("failed to read source directory", dir, error))?;
        let path = entry.path();
        if !path.is_file() {
            debug!(path = %path.display(), "skipping non-file entry");
            continue;
        }
        if !has_image_extension(&path, extensions) {
            warn!(path = %path.display(), "ignoring file without an image extension");
            let name = entry.file_name().to_string_lossy().into_owned();
            listing.ignored.push(name);
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            let path = path.display();
            return Err(RunError::Configuration(format!("file name '{path}' is not UTF-8")));
        };
        listing.images.push(name);
    }

    if listing.images.is_empty() {
        let dir = dir.display();
        let wanted = extensions.join(", ");
        return Err(RunError::Configuration(format!(
            "'{dir}' doesn't contain any images ({wanted}); pass a valid path with --source"
        )));
    }

    listing.images.sort();
    listing.ignored.sort();
    Ok(listing)
}

fn has_image_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| {
            extensions
                .iter()
                .any(|candidate| candidate.eq_ignore_ascii_case(extension))
        })
        .unwrap_or(false)
}

/// Dataset name shown in reports: the last component of the source path.
pub fn dataset_name(dir: &Path) -> String {
    let normalized = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
    normalized
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| normalized.display().to_string())
}
