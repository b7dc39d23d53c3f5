//! Image subsystem configuration
//!
//! Where manifests live on disk, where the default bundle comes from, and
//! which manifest API level this build understands.

use std::path::PathBuf;

use crate::common::paths::{self, DEFAULT_IMAGES_SUBDIR};
use crate::common::ImageResult;
use crate::manifest::SUPPORTED_API_VERSION;

/// Location of the default image bundle.
pub const DEFAULT_BUNDLE_URL: &str = "https://github.com/wilfred-dev/images/archive/master.zip";

/// Environment variable overriding [`DEFAULT_BUNDLE_URL`].
pub const BUNDLE_URL_ENV: &str = "HEARTH_IMAGES_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagesConfig {
    /// Scratch space for bundle downloads. Must share a filesystem with
    /// `images_dir` so the extracted tree can be moved with a rename.
    pub config_dir: PathBuf,
    /// Root of all manifests; `default/` plus any user-supplied subtrees.
    pub images_dir: PathBuf,
    pub bundle_url: String,
    pub api_version: u32,
}

impl ImagesConfig {
    /// Resolve the configuration from the platform config dir and environment.
    pub fn from_env() -> ImageResult<Self> {
        let mut config = Self::with_root(paths::hearth_dir()?);
        if let Ok(url) = std::env::var(BUNDLE_URL_ENV) {
            if !url.trim().is_empty() {
                config.bundle_url = url;
            }
        }
        Ok(config)
    }

    /// Configuration rooted at an explicit directory.
    pub fn with_root(config_dir: impl Into<PathBuf>) -> Self {
        let config_dir = config_dir.into();
        Self {
            images_dir: paths::images_dir(&config_dir),
            config_dir,
            bundle_url: DEFAULT_BUNDLE_URL.to_string(),
            api_version: SUPPORTED_API_VERSION,
        }
    }

    /// The bundle-managed `default` subtree.
    pub fn default_dir(&self) -> PathBuf {
        self.images_dir.join(DEFAULT_IMAGES_SUBDIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_with_root_layout() {
        let config = ImagesConfig::with_root("/srv/hearth");
        assert_eq!(config.images_dir, Path::new("/srv/hearth/images"));
        assert_eq!(config.default_dir(), Path::new("/srv/hearth/images/default"));
        assert_eq!(config.bundle_url, DEFAULT_BUNDLE_URL);
        assert_eq!(config.api_version, SUPPORTED_API_VERSION);
    }
}
