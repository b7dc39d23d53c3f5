//! Manifest Registry
//!
//! In-memory set of validated, current manifests with uid lookup.

use std::collections::HashMap;
use std::fs;
use std::sync::Arc;

use tracing::{info, warn};

use super::loader::{self, RawRecord};
use super::types::{ImageSummary, Manifest};
use super::validate::validate;
use super::version::{self, VersionCheck};
use crate::bundle::BundleFetcher;
use crate::common::error::{ValidationError, ValidationErrorKind};
use crate::common::{ImageError, ImageResult};
use crate::config::ImagesConfig;

/// Loaded manifests, in load order, with a uid index
#[derive(Debug, Default)]
struct Loaded {
    manifests: Vec<Arc<Manifest>>,
    by_uid: HashMap<String, usize>,
}

/// Result of one load pass
enum Pass {
    Loaded(Loaded),
    NeedsRefresh { file: String, declared: u32 },
}

/// Registry of validated image manifests
///
/// Starts empty; `read`, `load`, or `refresh` replace its contents
/// wholesale. A failed pass leaves the previous contents untouched.
pub struct ManifestRegistry {
    config: ImagesConfig,
    loaded: Option<Loaded>,
}

impl ManifestRegistry {
    /// Create an unread registry, ensuring the image directory exists.
    pub fn new(config: ImagesConfig) -> ImageResult<Self> {
        fs::create_dir_all(&config.images_dir)
            .map_err(|e| ImageError::read(config.images_dir.display().to_string(), e))?;
        Ok(Self {
            config,
            loaded: None,
        })
    }

    pub fn config(&self) -> &ImagesConfig {
        &self.config
    }

    /// Whether the bundle-managed `default` subtree exists on disk
    pub fn is_present(&self) -> bool {
        self.config.default_dir().is_dir()
    }

    /// Read manifests without fetching anything.
    ///
    /// Fails with `ImagesNotPresent` when the default bundle is absent and
    /// with `ApiMismatch` on the first stale manifest.
    pub fn read(&mut self) -> ImageResult<usize> {
        if !self.is_present() {
            return Err(ImageError::ImagesNotPresent {
                dir: self.config.default_dir(),
            });
        }
        match self.pass(false)? {
            Pass::Loaded(loaded) => Ok(self.install(loaded)),
            // unreachable with refresh disallowed, the gate errors instead
            Pass::NeedsRefresh { file, declared } => Err(ImageError::ApiMismatch {
                file,
                declared,
                supported: self.config.api_version,
            }),
        }
    }

    /// Read manifests, fetching the bundle when it is absent and refetching
    /// it once if any manifest has a different API level.
    pub fn load(&mut self, fetcher: &dyn BundleFetcher) -> ImageResult<usize> {
        if !self.is_present() {
            warn!("Default image directory does not exist, downloading default images");
            fetcher.fetch(&self.config)?;
        }

        match self.pass(true)? {
            Pass::Loaded(loaded) => Ok(self.install(loaded)),
            Pass::NeedsRefresh { file, declared } => {
                warn!(
                    "{} has API level {}, supported API level is {}; refreshing default images",
                    file, declared, self.config.api_version
                );
                self.refresh(fetcher)
            }
        }
    }

    /// Refetch the bundle unconditionally, then read.
    pub fn refresh(&mut self, fetcher: &dyn BundleFetcher) -> ImageResult<usize> {
        fetcher.fetch(&self.config)?;
        let count = self.read()?;
        info!("Default images refreshed");
        Ok(count)
    }

    /// Look up a manifest by exact uid
    pub fn get(&self, uid: &str) -> ImageResult<Option<Arc<Manifest>>> {
        let loaded = self.loaded()?;
        Ok(loaded
            .by_uid
            .get(uid)
            .map(|&idx| Arc::clone(&loaded.manifests[idx])))
    }

    /// All manifests in load order
    pub fn list(&self) -> ImageResult<Vec<Arc<Manifest>>> {
        Ok(self.loaded()?.manifests.clone())
    }

    /// Listing projection of every manifest, in load order
    pub fn summaries(&self) -> ImageResult<Vec<ImageSummary>> {
        Ok(self
            .loaded()?
            .manifests
            .iter()
            .map(|m| ImageSummary::from(m.as_ref()))
            .collect())
    }

    pub fn len(&self) -> ImageResult<usize> {
        Ok(self.loaded()?.manifests.len())
    }

    pub fn is_empty(&self) -> ImageResult<bool> {
        Ok(self.len()? == 0)
    }

    fn loaded(&self) -> ImageResult<&Loaded> {
        self.loaded.as_ref().ok_or(ImageError::ImagesNotRead)
    }

    fn install(&mut self, loaded: Loaded) -> usize {
        let count = loaded.manifests.len();
        self.loaded = Some(loaded);
        info!("Image registry loaded: {} images", count);
        count
    }

    /// Load, validate, and version-check every manifest on disk.
    fn pass(&self, allow_refresh: bool) -> ImageResult<Pass> {
        let records = loader::load_manifests(&self.config.images_dir)?;
        let mut loaded = Loaded::default();
        let mut sources: Vec<String> = Vec::with_capacity(records.len());

        for RawRecord {
            document,
            display_name,
            ..
        } in records
        {
            // The API level is gated before structure: a stale manifest is
            // expected to miss or retype keys changed by newer schemas.
            if let Some(declared) = version::declared_api_version(&document) {
                let check = version::check(
                    declared,
                    &display_name,
                    self.config.api_version,
                    allow_refresh,
                )?;
                if let VersionCheck::NeedsRefresh { declared } = check {
                    return Ok(Pass::NeedsRefresh {
                        file: display_name,
                        declared,
                    });
                }
            }

            let manifest = validate(document, &display_name)?;

            if let Some(&first) = loaded.by_uid.get(&manifest.uid) {
                return Err(ValidationError {
                    file: display_name,
                    kind: ValidationErrorKind::DuplicateUid {
                        uid: manifest.uid.clone(),
                        first: sources[first].clone(),
                    },
                }
                .into());
            }

            loaded
                .by_uid
                .insert(manifest.uid.clone(), loaded.manifests.len());
            loaded.manifests.push(Arc::new(manifest));
            sources.push(display_name);
        }

        Ok(Pass::Loaded(loaded))
    }
}
