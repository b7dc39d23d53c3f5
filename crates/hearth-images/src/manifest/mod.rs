//! Manifest System
//!
//! Discovers, validates, version-checks, and indexes image manifests.

pub mod loader;
pub mod registry;
pub mod types;
pub mod validate;
pub mod version;

pub use loader::{load_manifests, RawRecord};
pub use registry::ManifestRegistry;
pub use types::{
    Config, ConfigFile, EnvironmentMapping, ImageSummary, Installation, Manifest, Meta, Variable,
    CONFIG_FILE_KEYS, CONFIG_KEYS, ENVIRONMENT_KEYS, INSTALLATION_KEYS, MANIFEST_EXTENSION,
    META_KEYS, REQUIRED_KEYS, SUPPORTED_API_VERSION, VARIABLE_KEYS,
};
pub use validate::validate;
pub use version::VersionCheck;
