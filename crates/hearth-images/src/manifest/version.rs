//! Manifest API level gate

use serde_json::{Map, Value};

use crate::common::{ImageError, ImageResult};

/// Outcome of comparing a manifest's API level to ours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionCheck {
    Current,
    /// Stale manifest; refetch the bundle once and reload.
    NeedsRefresh { declared: u32 },
}

/// Read `meta.api_version` from an undecoded manifest document.
///
/// Returns `None` when the key is absent or not an unsigned integer, in
/// which case validation reports the problem.
pub fn declared_api_version(document: &Map<String, Value>) -> Option<u32> {
    document
        .get("meta")
        .and_then(|meta| meta.get("api_version"))
        .and_then(Value::as_u64)
        .and_then(|version| u32::try_from(version).ok())
}

/// Compare a manifest's declared `meta.api_version` against `supported`.
///
/// A mismatch asks for a refresh while `allow_refresh` is set and is fatal
/// once the refresh has been spent.
pub fn check(
    declared: u32,
    file: &str,
    supported: u32,
    allow_refresh: bool,
) -> ImageResult<VersionCheck> {
    if declared == supported {
        return Ok(VersionCheck::Current);
    }
    if allow_refresh {
        return Ok(VersionCheck::NeedsRefresh { declared });
    }
    Err(ImageError::ApiMismatch {
        file: file.to_string(),
        declared,
        supported,
    })
}
