//! Manifest Loader
//!
//! Scans the image directory tree and decodes every manifest file found.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;

use super::types::MANIFEST_EXTENSION;
use crate::common::{ImageError, ImageResult};

/// Manifests above this size are refused (1MB)
pub const MAX_MANIFEST_BYTES: u64 = 1_000_000;

/// A parsed but unvalidated manifest and the file it came from
#[derive(Debug)]
pub struct RawRecord {
    pub document: Map<String, Value>,
    pub source: PathBuf,
    /// `source` relative to the scanned directory, used in messages.
    pub display_name: String,
}

/// Parse every manifest under `base_dir`, sorted by path.
///
/// Files are only checked to be JSON objects here; key types are left to
/// validation so the API level can be read from any manifest first. Any
/// unreadable or malformed file aborts the whole load.
pub fn load_manifests(base_dir: &Path) -> ImageResult<Vec<RawRecord>> {
    let mut files = Vec::new();
    collect_manifest_files(base_dir, &mut files)?;
    files.sort();

    let records = files
        .into_iter()
        .map(|path| {
            let display_name = display_name(&path, base_dir);
            let document = load_manifest_file(&path, &display_name)?;
            debug!("Parsed manifest {}", display_name);
            Ok(RawRecord {
                document,
                source: path,
                display_name,
            })
        })
        .collect::<ImageResult<Vec<_>>>()?;

    Ok(records)
}

fn collect_manifest_files(dir: &Path, files: &mut Vec<PathBuf>) -> ImageResult<()> {
    let entries = fs::read_dir(dir).map_err(|e| ImageError::read(dir.display().to_string(), e))?;

    for entry in entries {
        let entry = entry.map_err(|e| ImageError::read(dir.display().to_string(), e))?;
        let path = entry.path();

        // Skip dotfiles and editor leftovers
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.starts_with('.') || name.ends_with(".tmp") || name.ends_with(".swp") {
                continue;
            }
        }

        if path.is_dir() {
            collect_manifest_files(&path, files)?;
        } else if path.extension().and_then(|s| s.to_str()) == Some(MANIFEST_EXTENSION) {
            files.push(path);
        }
    }

    Ok(())
}

fn load_manifest_file(path: &Path, name: &str) -> ImageResult<Map<String, Value>> {
    let metadata = fs::metadata(path).map_err(|e| ImageError::read(name, e))?;
    if metadata.len() > MAX_MANIFEST_BYTES {
        return Err(ImageError::read(name, "manifest file too large (max 1MB)"));
    }

    let content = fs::read_to_string(path).map_err(|e| ImageError::read(name, e))?;

    match serde_json::from_str(&content).map_err(|e| ImageError::read(name, e))? {
        Value::Object(document) => Ok(document),
        _ => Err(ImageError::read(name, "expected a JSON object")),
    }
}

fn display_name(path: &Path, base_dir: &Path) -> String {
    path.strip_prefix(base_dir)
        .unwrap_or(path)
        .display()
        .to_string()
}
