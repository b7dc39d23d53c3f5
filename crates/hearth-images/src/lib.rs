//! Hearth image manifests
//!
//! Fetches the default image bundle, validates every manifest against the
//! supported schema, and serves lookups over the validated set.

pub mod bundle;
pub mod common;
pub mod config;
pub mod manifest;

pub use bundle::{install_archive, BundleFetcher, HttpBundleFetcher};
pub use common::{FetchError, ImageError, ImageResult, ValidationError, ValidationErrorKind};
pub use config::ImagesConfig;
pub use manifest::{ImageSummary, Manifest, ManifestRegistry, SUPPORTED_API_VERSION};
