//! Path Utilities
//!
//! Resolution of the per-user Hearth directories.

use std::path::PathBuf;

use super::error::ImageError;

/// Environment variable overriding the Hearth configuration directory.
pub const CONFIG_DIR_ENV: &str = "HEARTH_CONFIG_DIR";

/// Get the Hearth configuration directory (`<user config dir>/hearth`)
///
/// `HEARTH_CONFIG_DIR` takes precedence when set and non-empty.
pub fn hearth_dir() -> Result<PathBuf, ImageError> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let base = dirs::config_dir().ok_or(ImageError::NoConfigDir)?;
    Ok(base.join("hearth"))
}

/// Get the image manifest root inside a configuration directory
pub fn images_dir(config_dir: &std::path::Path) -> PathBuf {
    config_dir.join("images")
}

/// Name of the subtree owned and replaced wholesale by bundle refreshes.
pub const DEFAULT_IMAGES_SUBDIR: &str = "default";

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_images_dir_is_nested_in_config_dir() {
        let dir = images_dir(Path::new("/tmp/hearth"));
        assert_eq!(dir, Path::new("/tmp/hearth/images"));
    }
}
