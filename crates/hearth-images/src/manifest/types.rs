//! Manifest Types
//!
//! Rust structs matching the image manifest JSON schema at API level 2.
//!
//! Files are read as untyped JSON documents and promoted to [`Manifest`]
//! key by key by the validator. A [`Manifest`] therefore always carries
//! every required key with the expected type.

use serde::{Deserialize, Serialize};

/// Manifest API level understood by this build
pub const SUPPORTED_API_VERSION: u32 = 2;

/// Manifest file extension
pub const MANIFEST_EXTENSION: &str = "json";

/// Required top-level keys, in validation order
pub const REQUIRED_KEYS: [&str; 12] = [
    "meta",
    "uid",
    "name",
    "author",
    "docker_image",
    "command",
    "user",
    "stop_command",
    "default_image",
    "variables",
    "installation",
    "config",
];

pub const META_KEYS: [&str; 1] = ["api_version"];

pub const INSTALLATION_KEYS: [&str; 3] = ["docker_image", "shell", "script"];

pub const CONFIG_KEYS: [&str; 1] = ["files"];

pub const CONFIG_FILE_KEYS: [&str; 4] = ["filename", "parser", "environment", "action"];

pub const ENVIRONMENT_KEYS: [&str; 3] = ["config_variable", "environment_variable", "value_format"];

pub const VARIABLE_KEYS: [&str; 5] = ["prompt", "variable", "install_only", "default", "hidden"];

/// Validated image definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub meta: Meta,
    pub uid: String,
    pub name: String,
    pub author: String,
    pub docker_image: String,
    pub command: String,
    pub user: String,
    pub stop_command: String,
    pub default_image: bool,
    pub variables: Vec<Variable>,
    pub installation: Installation,
    pub config: Config,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub api_version: u32,
}

/// Install-time recipe; opaque to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installation {
    pub docker_image: String,
    pub shell: String,
    pub script: String,
}

/// User-prompted install/runtime parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub prompt: String,
    pub variable: String,
    pub install_only: bool,
    /// Free-form default; bundled images use strings, but numbers and
    /// booleans are accepted as written.
    pub default: serde_json::Value,
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub files: Vec<ConfigFile>,
}

/// Rule for generating one runtime configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub filename: String,
    pub parser: String,
    pub environment: Vec<EnvironmentMapping>,
    pub action: serde_json::Value,
}

/// Binds a variable's value into a field of a generated file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentMapping {
    pub config_variable: String,
    pub environment_variable: String,
    pub value_format: String,
}

/// Listing projection of a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageSummary {
    pub uid: String,
    pub name: String,
    pub author: String,
    pub default_image: bool,
}

impl From<&Manifest> for ImageSummary {
    fn from(manifest: &Manifest) -> Self {
        Self {
            uid: manifest.uid.clone(),
            name: manifest.name.clone(),
            author: manifest.author.clone(),
            default_image: manifest.default_image,
        }
    }
}
