//! Default Image Bundle
//!
//! Downloads the default image archive and swaps it in as the `default`
//! subtree of the image directory.

use std::fs;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::common::http::create_http_client;
use crate::common::FetchError;
use crate::config::ImagesConfig;

/// Folder inside the archive's top-level directory that holds manifests.
const ARCHIVE_IMAGES_DIR: &str = "images";

/// Source of the default image bundle
pub trait BundleFetcher {
    /// Replace `config.default_dir()` with a freshly retrieved bundle.
    fn fetch(&self, config: &ImagesConfig) -> Result<(), FetchError>;
}

/// Fetches the bundle over HTTP from `ImagesConfig::bundle_url`.
pub struct HttpBundleFetcher {
    client: reqwest::blocking::Client,
}

impl HttpBundleFetcher {
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self {
            client: create_http_client()?,
        })
    }

    /// Fetcher using a preconfigured client.
    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl BundleFetcher for HttpBundleFetcher {
    fn fetch(&self, config: &ImagesConfig) -> Result<(), FetchError> {
        info!("Downloading default images from {}", config.bundle_url);
        fs::create_dir_all(&config.config_dir)?;

        let mut archive = tempfile::Builder::new()
            .prefix("img")
            .suffix(".zip")
            .tempfile_in(&config.config_dir)?;

        let mut response = self.client.get(&config.bundle_url).send()?;
        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: config.bundle_url.clone(),
                status: response.status().as_u16(),
            });
        }
        let bytes = response.copy_to(archive.as_file_mut())?;
        debug!("Downloaded {} bytes to {:?}", bytes, archive.path());

        archive.as_file_mut().seek(SeekFrom::Start(0))?;
        install_archive(archive.as_file_mut(), config)?;
        archive.close()?;

        Ok(())
    }
}

/// Extract a bundle archive and install its images folder as the
/// `default` subtree.
///
/// The archive is unpacked into a scratch directory under
/// `config.config_dir`; the previous `default` subtree is removed only
/// once extraction has succeeded. The scratch directory is removed on
/// every path.
pub fn install_archive<R: Read + Seek>(reader: R, config: &ImagesConfig) -> Result<(), FetchError> {
    fs::create_dir_all(&config.images_dir)?;

    let scratch = tempfile::Builder::new()
        .prefix("temp_images")
        .tempdir_in(&config.config_dir)?;

    let mut archive = zip::ZipArchive::new(reader)?;
    debug!("Extracting {} archive entries", archive.len());
    archive.extract(scratch.path())?;

    let images = locate_images(scratch.path())?;
    let target = config.default_dir();
    if target.exists() {
        fs::remove_dir_all(&target)?;
    }
    fs::rename(&images, &target)?;
    scratch.close()?;

    info!("Installed default images into {:?}", target);
    Ok(())
}

/// Find `<top-level dir>/images` (or a bare `images`) in an extracted archive.
fn locate_images(root: &Path) -> Result<PathBuf, FetchError> {
    let direct = root.join(ARCHIVE_IMAGES_DIR);
    if direct.is_dir() {
        return Ok(direct);
    }

    let mut tops = fs::read_dir(root)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    tops.sort();

    tops.into_iter()
        .map(|top| top.join(ARCHIVE_IMAGES_DIR))
        .find(|candidate| candidate.is_dir())
        .ok_or(FetchError::MissingImages)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Cursor, Write};
    use std::net::TcpListener;
    use std::thread;
    use std::time::Duration;
    use tempfile::tempdir;
    use zip::write::SimpleFileOptions;

    /// Build a zip laid out like a GitHub branch archive.
    pub(crate) fn archive_with(files: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        writer.add_directory("images-master/", options).unwrap();
        for (name, content) in files {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn leftovers(config_dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(config_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Answer a single HTTP request on localhost and return its URL.
    fn serve_once(status: &'static str, body: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
                line.clear();
            }
            write!(
                stream,
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                body.len()
            )
            .unwrap();
            stream.write_all(&body).unwrap();
        });
        format!("http://{}/images/archive/master.zip", addr)
    }

    fn http_fetcher() -> HttpBundleFetcher {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(5))
            .no_proxy()
            .build()
            .unwrap();
        HttpBundleFetcher::with_client(client)
    }

    #[test]
    fn test_http_fetch_installs_bundle() {
        let dir = tempdir().unwrap();
        let mut config = ImagesConfig::with_root(dir.path());
        let bytes = archive_with(&[("images-master/images/minecraft/vanilla.json", "{}")]);
        config.bundle_url = serve_once("200 OK", bytes);

        http_fetcher().fetch(&config).unwrap();

        assert!(config.default_dir().join("minecraft/vanilla.json").is_file());
        assert_eq!(leftovers(dir.path()), vec!["images"]);
    }

    #[test]
    fn test_http_error_status() {
        let dir = tempdir().unwrap();
        let mut config = ImagesConfig::with_root(dir.path());
        config.bundle_url = serve_once("404 Not Found", b"missing".to_vec());

        let err = http_fetcher().fetch(&config).unwrap_err();

        match err {
            FetchError::Status { url, status } => {
                assert_eq!(url, config.bundle_url);
                assert_eq!(status, 404);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(!config.default_dir().exists());
        assert!(leftovers(dir.path()).is_empty());
    }

    #[test]
    fn test_http_corrupt_download() {
        let dir = tempdir().unwrap();
        let mut config = ImagesConfig::with_root(dir.path());
        fs::create_dir_all(config.default_dir()).unwrap();
        fs::write(config.default_dir().join("vanilla.json"), "{}").unwrap();
        config.bundle_url = serve_once("200 OK", b"not a zip".to_vec());

        let err = http_fetcher().fetch(&config).unwrap_err();

        assert!(matches!(err, FetchError::Archive(_)));
        assert!(config.default_dir().join("vanilla.json").is_file());
        assert_eq!(leftovers(dir.path()), vec!["images"]);
    }

    #[test]
    fn test_install_replaces_default_subtree() {
        let dir = tempdir().unwrap();
        let config = ImagesConfig::with_root(dir.path());
        fs::create_dir_all(config.default_dir().join("stale")).unwrap();
        fs::write(config.default_dir().join("stale/old.json"), "{}").unwrap();

        let bytes = archive_with(&[
            ("images-master/README.md", "readme"),
            ("images-master/images/minecraft/vanilla.json", "{}"),
        ]);
        install_archive(Cursor::new(bytes), &config).unwrap();

        assert!(config.default_dir().join("minecraft/vanilla.json").is_file());
        assert!(!config.default_dir().join("stale").exists());
        assert_eq!(leftovers(dir.path()), vec!["images"]);
    }

    #[test]
    fn test_install_keeps_user_subtrees() {
        let dir = tempdir().unwrap();
        let config = ImagesConfig::with_root(dir.path());
        let custom = config.images_dir.join("custom/mine.json");
        fs::create_dir_all(custom.parent().unwrap()).unwrap();
        fs::write(&custom, "{}").unwrap();

        let bytes = archive_with(&[("images-master/images/vanilla.json", "{}")]);
        install_archive(Cursor::new(bytes), &config).unwrap();

        assert!(custom.is_file());
        assert!(config.default_dir().join("vanilla.json").is_file());
    }

    #[test]
    fn test_archive_without_images_folder() {
        let dir = tempdir().unwrap();
        let config = ImagesConfig::with_root(dir.path());
        fs::create_dir_all(config.default_dir()).unwrap();

        let bytes = archive_with(&[("images-master/other/vanilla.json", "{}")]);
        let err = install_archive(Cursor::new(bytes), &config).unwrap_err();

        assert!(matches!(err, FetchError::MissingImages));
        // The previous bundle survives a failed install and scratch space is gone
        assert!(config.default_dir().is_dir());
        assert_eq!(leftovers(dir.path()), vec!["images"]);
    }

    #[test]
    fn test_corrupt_archive() {
        let dir = tempdir().unwrap();
        let config = ImagesConfig::with_root(dir.path());

        let err = install_archive(Cursor::new(b"not a zip".to_vec()), &config).unwrap_err();

        assert!(matches!(err, FetchError::Archive(_)));
        assert_eq!(leftovers(dir.path()), vec!["images"]);
    }
}
