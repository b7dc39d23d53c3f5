//! Common Error Types
//!
//! Error kinds raised while fetching, reading, validating, and querying
//! image manifests.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the image manifest subsystem.
///
/// Every variant is fatal to the current operation. The only recovery the
/// subsystem performs on its own is the one-shot bundle refresh on an API
/// level mismatch.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The `default` image directory is absent and fetching was not allowed.
    #[error("default images not present in {}", .dir.display())]
    ImagesNotPresent { dir: PathBuf },

    /// A query was issued before any successful read.
    #[error("images have not been read yet")]
    ImagesNotRead,

    /// A manifest file could not be read or parsed.
    #[error("unable to read image {file}: {reason}")]
    Read { file: String, reason: String },

    /// A manifest parsed but broke the structural contract.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A manifest's API level still differs from ours after a refresh.
    #[error("image {file} has API level {declared}, supported API level is {supported}")]
    ApiMismatch {
        file: String,
        declared: u32,
        supported: u32,
    },

    /// Bundle download or extraction failed.
    #[error("failed to fetch default images: {0}")]
    Fetch(#[from] FetchError),

    /// The platform configuration directory could not be resolved.
    #[error("could not determine the user configuration directory")]
    NoConfigDir,
}

impl ImageError {
    pub fn read(file: impl Into<String>, reason: impl ToString) -> Self {
        Self::Read {
            file: file.into(),
            reason: reason.to_string(),
        }
    }
}

/// A manifest that failed structural validation.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("image {file} {kind}")]
pub struct ValidationError {
    pub file: String,
    pub kind: ValidationErrorKind,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationErrorKind {
    #[error("is missing key {key}")]
    MissingKey { key: &'static str },

    /// A nested record (config file or environment mapping) lacks a key.
    #[error("is missing key {key} in {owner}")]
    MissingNestedKey { owner: String, key: &'static str },

    /// A key is present but holds a value of the wrong shape.
    #[error("has an invalid value for key {key} in {owner}: {reason}")]
    InvalidType {
        owner: String,
        key: &'static str,
        reason: String,
    },

    #[error("uid must be lowercase (got {uid})")]
    UppercaseUid { uid: String },

    #[error("reuses uid {uid} already declared by {first}")]
    DuplicateUid { uid: String, first: String },
}

impl ValidationError {
    pub fn missing(file: &str, key: &'static str) -> Self {
        Self {
            file: file.to_string(),
            kind: ValidationErrorKind::MissingKey { key },
        }
    }

    pub fn missing_in(file: &str, owner: impl Into<String>, key: &'static str) -> Self {
        Self {
            file: file.to_string(),
            kind: ValidationErrorKind::MissingNestedKey {
                owner: owner.into(),
                key,
            },
        }
    }

    pub fn invalid(
        file: &str,
        owner: impl Into<String>,
        key: &'static str,
        reason: impl ToString,
    ) -> Self {
        Self {
            file: file.to_string(),
            kind: ValidationErrorKind::InvalidType {
                owner: owner.into(),
                key,
                reason: reason.to_string(),
            },
        }
    }

    /// The offending key, for missing-key and wrong-type failures.
    pub fn key(&self) -> Option<&'static str> {
        match &self.kind {
            ValidationErrorKind::MissingKey { key }
            | ValidationErrorKind::MissingNestedKey { key, .. }
            | ValidationErrorKind::InvalidType { key, .. } => Some(*key),
            _ => None,
        }
    }
}

/// Bundle retrieval failure.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("corrupt archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive does not contain an images folder")]
    MissingImages,
}
